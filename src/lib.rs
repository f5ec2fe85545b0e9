//! Sky Shooter - a minimal vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, tick)
//! - `session`: Start / playing / game-over state machine that owns the sim
//! - `platform`: Clock and frame scheduling capabilities (manual, native, browser)
//! - `render`: Rendering collaborator and HUD overlay
//! - `audio`: Sound cue sinks
//! - `persistence`: High score storage backends
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use session::{GameOverSummary, Phase, Services, Session};
pub use settings::Settings;
pub use tuning::{Difficulty, DifficultyParams, Tuning};

/// Game configuration constants
pub mod consts {
    /// Key the high score is stored under
    pub const HIGH_SCORE_KEY: &str = "highScore";
    /// Maximum spawn timer firings handled in one service call
    pub const MAX_SPAWN_BURST: u32 = 8;
    /// Frame length used by fixed-step (headless) loops, ~60 Hz
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Viewport defaults
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Gap between the player's feet and the bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;
    pub const PLAYER_LIVES: u32 = 3;
    pub const FULL_HEALTH: i32 = 100;
    pub const CONTACT_DAMAGE: i32 = 20;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 15.0;
    pub const BULLET_SPEED: f32 = 10.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 40.0;

    /// Points per destroyed enemy
    pub const SCORE_PER_KILL: u64 = 10;
}
