//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay headless:
//! - One fixed step per tick, no frame-time scaling
//! - Seeded RNG only
//! - Time enters only as explicit milliseconds
//! - No rendering, audio or platform dependencies beyond the `Canvas` trait

pub mod collision;
pub mod entity;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{resolve_bullet_hits, resolve_player_contacts};
pub use entity::{Bullet, Enemy, Facing, Player, Rect};
pub use spawn::{SpawnScheduler, spawn_enemy};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, tick};
