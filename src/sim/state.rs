//! Game state and core simulation types
//!
//! Everything a running session mutates per tick lives here. Entities hold no
//! references back to the state.

use super::entity::{Bullet, Enemy, Player};
use crate::tuning::{Difficulty, DifficultyParams, Tuning};

/// Something that happened during a tick, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A bullet destroyed an enemy
    EnemyDestroyed,
    /// An enemy crossed the bottom edge
    EnemyEscaped,
    /// An enemy rammed the player
    PlayerHit,
    /// A life was consumed (health depleted or escape)
    LifeLost,
    /// Lives ran out
    GameOver,
}

/// Complete per-run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Gameplay tuning the run was started with
    pub tuning: Tuning,
    /// Active difficulty
    pub difficulty: Difficulty,
    /// Score, only ever increases
    pub score: u64,
    /// Simulation is advancing
    pub running: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Live bullets, in fire order
    pub bullets: Vec<Bullet>,
    /// Live enemies, in spawn order
    pub enemies: Vec<Enemy>,
}

impl GameState {
    /// A stopped state with a fresh player, as shown before the first run
    pub fn new(tuning: Tuning, difficulty: Difficulty) -> Self {
        Self {
            player: Player::new(&tuning),
            tuning,
            difficulty,
            score: 0,
            running: false,
            time_ticks: 0,
            bullets: Vec::new(),
            enemies: Vec::new(),
        }
    }

    /// Reset for a new run at `difficulty` and mark it running
    pub fn reset(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.score = 0;
        self.time_ticks = 0;
        self.bullets.clear();
        self.enemies.clear();
        self.player = Player::new(&self.tuning);
        self.running = true;
    }

    pub fn params(&self) -> DifficultyParams {
        self.tuning.difficulty(self.difficulty)
    }

    /// Push an enemy at horizontal position `x` with the active difficulty's speed
    pub fn spawn_enemy(&mut self, x: f32) {
        let speed = self.params().enemy_speed;
        self.enemies.push(Enemy::spawn_at(x, speed, &self.tuning));
    }

    /// Push a bullet from the player's muzzle
    pub fn fire_bullet(&mut self) {
        let bullet = Bullet::fired_by(&self.player, &self.tuning);
        self.bullets.push(bullet);
    }

    /// Largest valid enemy spawn x
    pub fn max_spawn_x(&self) -> f32 {
        (self.tuning.viewport_width - self.tuning.enemy_width).max(0.0)
    }

    /// Consume one life. Returns true when that was the last one.
    pub(crate) fn lose_life(&mut self) -> bool {
        self.player.lives = self.player.lives.saturating_sub(1);
        self.player.lives == 0
    }
}
