//! Collision resolution
//!
//! Two independent passes per tick, both iterating in reverse index order so
//! entities can be removed in place.

use super::state::{GameEvent, GameState};

/// Bullets against enemies. Each overlapping pair is removed and scores.
///
/// A bullet stops at its first hit, so it never takes out two enemies in the
/// same tick.
pub fn resolve_bullet_hits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for i in (0..state.bullets.len()).rev() {
        let bullet = state.bullets[i].bounds();
        for j in (0..state.enemies.len()).rev() {
            if bullet.overlaps(&state.enemies[j].bounds()) {
                state.bullets.remove(i);
                state.enemies.remove(j);
                state.score += state.tuning.score_per_kill;
                events.push(GameEvent::EnemyDestroyed);
                break;
            }
        }
    }
}

/// Enemies against the player. Damage applies sequentially; a depleted health
/// bar costs a life and refills unless that was the last life.
///
/// Returns true if the pass ended the run.
pub fn resolve_player_contacts(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    for i in (0..state.enemies.len()).rev() {
        if !state.player.bounds().overlaps(&state.enemies[i].bounds()) {
            continue;
        }

        state.enemies.remove(i);
        state.player.health -= state.tuning.contact_damage;
        events.push(GameEvent::PlayerHit);

        if state.player.health <= 0 {
            events.push(GameEvent::LifeLost);
            if state.lose_life() {
                state.player.health = 0;
                events.push(GameEvent::GameOver);
                return true;
            }
            state.player.health = state.tuning.full_health;
        }
    }
    false
}
