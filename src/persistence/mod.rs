//! High score persistence
//!
//! Backends:
//! - `MemoryStore`: in-process, shared between clones
//! - `JsonFileStore`: a small JSON document on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm)
//!
//! All backends store a single integer under [`HIGH_SCORE_KEY`]. Failures
//! are logged and swallowed; a store that cannot be read reports zero.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

pub use crate::consts::HIGH_SCORE_KEY;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

/// Persistence collaborator for the single high score value
pub trait HighScoreStore {
    /// Stored value, or 0 if nothing usable is stored
    fn load(&self) -> u64;
    /// Replace the stored value
    fn save(&mut self, score: u64);
}

/// Errors from storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt high score record: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}

/// In-memory store. Clones share the value, so a test can keep a handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<u64>>,
    saves: Rc<Cell<u32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(score: u64) -> Self {
        let store = Self::new();
        store.value.set(score);
        store
    }

    /// Number of writes so far
    pub fn saves(&self) -> u32 {
        self.saves.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u64 {
        self.value.get()
    }

    fn save(&mut self, score: u64) {
        self.value.set(score);
        self.saves.set(self.saves.get() + 1);
    }
}
