//! Browser LocalStorage backend

use super::{HIGH_SCORE_KEY, HighScoreStore, StoreError};

/// Stores the score as a decimal string under [`HIGH_SCORE_KEY`]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> u64 {
        let Ok(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, high score starts at 0");
            return 0;
        };
        match storage.get_item(HIGH_SCORE_KEY) {
            Ok(Some(value)) => value.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring unreadable high score {:?}", value);
                0
            }),
            _ => 0,
        }
    }

    fn save(&mut self, score: u64) {
        match Self::storage() {
            Ok(storage) => {
                if storage.set_item(HIGH_SCORE_KEY, &score.to_string()).is_ok() {
                    log::info!("High score {} saved", score);
                } else {
                    log::warn!("Failed to save high score");
                }
            }
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}
