//! Enemy spawn timer
//!
//! A wall-clock periodic timer, independent of the frame rate. It does not
//! own a clock: callers pass the current time in milliseconds, which lets a
//! manual clock drive it deterministically.

use rand::Rng;

use super::state::GameState;
use crate::consts::MAX_SPAWN_BURST;

/// Periodic deadline timer for enemy spawns
#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    interval_ms: f64,
    /// Next firing time; `None` when cancelled
    next_due_ms: Option<f64>,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin firing every `interval_ms`, first at `now_ms + interval_ms`.
    /// Replaces any schedule already running.
    pub fn start(&mut self, now_ms: f64, interval_ms: f64) {
        self.cancel();
        self.interval_ms = interval_ms;
        self.next_due_ms = Some(now_ms + interval_ms);
        log::debug!("Spawn timer started ({} ms)", interval_ms);
    }

    /// Stop firing. Safe to call when already stopped.
    pub fn cancel(&mut self) {
        if self.next_due_ms.take().is_some() {
            log::debug!("Spawn timer cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Count the firings due at `now_ms` and move the deadline past them.
    ///
    /// At most [`MAX_SPAWN_BURST`] firings are reported; beyond that the
    /// schedule re-syncs to `now_ms` instead of catching up.
    pub fn take_due(&mut self, now_ms: f64) -> u32 {
        let Some(mut due) = self.next_due_ms else {
            return 0;
        };

        let mut fired = 0;
        while due <= now_ms && fired < MAX_SPAWN_BURST {
            fired += 1;
            due += self.interval_ms;
        }
        if due <= now_ms {
            log::debug!("Spawn timer fell behind, dropping missed firings");
            due = now_ms + self.interval_ms;
        }

        self.next_due_ms = Some(due);
        fired
    }
}

/// Push one enemy at a uniformly random x in `[0, viewport - enemy width)`.
/// Stale firings after the run stopped do nothing.
pub fn spawn_enemy<R: Rng>(state: &mut GameState, rng: &mut R) -> bool {
    if !state.running {
        return false;
    }
    let x = rng.random::<f32>() * state.max_spawn_x();
    state.spawn_enemy(x);
    log::debug!("Enemy spawned at x={:.1} ({} live)", x, state.enemies.len());
    true
}
