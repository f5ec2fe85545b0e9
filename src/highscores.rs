//! High score record
//!
//! A single best score, loaded from and written back to a
//! [`HighScoreStore`]. Only a strictly better score replaces it.

use crate::persistence::HighScoreStore;

/// Outcome of submitting a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The run beat the stored best; the new value was persisted
    NewBest { previous: u64 },
    /// The stored best stands
    Kept,
}

/// Best score seen across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Read the best score from a store
    pub fn load(store: &dyn HighScoreStore) -> Self {
        let best = store.load();
        log::info!("Loaded high score {}", best);
        Self { best }
    }

    /// Check if a score would replace the best
    pub fn beats(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run, persisting it if it is a new best
    pub fn submit(&mut self, score: u64, store: &mut dyn HighScoreStore) -> Submission {
        if !self.beats(score) {
            return Submission::Kept;
        }
        let previous = self.best;
        self.best = score;
        store.save(score);
        log::info!("New high score {} (was {})", score, previous);
        Submission::NewBest { previous }
    }
}
