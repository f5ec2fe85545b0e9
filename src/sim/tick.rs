//! One simulation step
//!
//! Order within a tick: player, bullets, enemies (with escapes), then
//! collisions. Escapes are processed before contacts, so an enemy leaving the
//! bottom edge never also damages the player in the same tick.

use super::collision::{resolve_bullet_hits, resolve_player_contacts};
use super::state::{GameEvent, GameState};

/// Held input for a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
}

/// Advance the game state by one tick, appending what happened to `events`.
///
/// Does nothing unless the state is running. If the run ends partway through,
/// the rest of the tick is skipped.
pub fn tick(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    if !state.running {
        return;
    }

    state.time_ticks += 1;

    state.player.update(input, state.tuning.viewport_width);

    for i in (0..state.bullets.len()).rev() {
        state.bullets[i].update();
        if state.bullets[i].pos.y < 0.0 {
            state.bullets.remove(i);
        }
    }

    let floor = state.tuning.viewport_height;
    for i in (0..state.enemies.len()).rev() {
        state.enemies[i].update();
        if state.enemies[i].pos.y > floor {
            state.enemies.remove(i);
            events.push(GameEvent::EnemyEscaped);
            events.push(GameEvent::LifeLost);
            if state.lose_life() {
                events.push(GameEvent::GameOver);
                state.running = false;
                return;
            }
        }
    }

    resolve_bullet_hits(state, events);
    if resolve_player_contacts(state, events) {
        state.running = false;
    }
}
