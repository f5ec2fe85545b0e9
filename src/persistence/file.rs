//! JSON file backend (native only)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{HIGH_SCORE_KEY, HighScoreStore, StoreError};

/// Stores `{"highScore": n}` in a file, written via tmp + rename
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<u64, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: BTreeMap<String, u64> = serde_json::from_str(&json)?;
        Ok(record.get(HIGH_SCORE_KEY).copied().unwrap_or(0))
    }

    fn write(&self, score: u64) -> Result<(), StoreError> {
        let mut record = BTreeMap::new();
        record.insert(HIGH_SCORE_KEY.to_string(), score);
        let json = serde_json::to_string_pretty(&record)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> u64 {
        match self.read() {
            Ok(score) => score,
            Err(e) => {
                log::warn!("Could not read high score from {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn save(&mut self, score: u64) {
        match self.write(score) {
            Ok(()) => log::info!("High score {} saved to {}", score, self.path.display()),
            Err(e) => log::warn!("Could not save high score to {}: {}", self.path.display(), e),
        }
    }
}
