//! Data-driven game balance
//!
//! Every gameplay number lives in [`Tuning`]. The defaults reproduce the
//! classic feel; a JSON file can override any of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Difficulty presets, selectable when a run starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Per-difficulty enemy parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Pixels per tick, downward
    pub enemy_speed: f32,
    /// Milliseconds between enemy spawns
    pub spawn_rate_ms: f64,
}

/// Static difficulty table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: DifficultyParams,
    pub medium: DifficultyParams,
    pub hard: DifficultyParams,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyParams {
                enemy_speed: 2.0,
                spawn_rate_ms: 1500.0,
            },
            medium: DifficultyParams {
                enemy_speed: 4.0,
                spawn_rate_ms: 1000.0,
            },
            hard: DifficultyParams {
                enemy_speed: 6.0,
                spawn_rate_ms: 600.0,
            },
        }
    }
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> DifficultyParams {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value: {0}")]
    Invalid(String),
}

/// Complete gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub viewport_width: f32,
    pub viewport_height: f32,

    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub player_bottom_margin: f32,
    pub player_lives: u32,
    pub full_health: i32,
    pub contact_damage: i32,

    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,

    pub enemy_width: f32,
    pub enemy_height: f32,

    pub score_per_kill: u64,

    pub difficulties: DifficultyTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            player_width: PLAYER_SIZE,
            player_height: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            player_bottom_margin: PLAYER_BOTTOM_MARGIN,
            player_lives: PLAYER_LIVES,
            full_health: FULL_HEALTH,
            contact_damage: CONTACT_DAMAGE,

            bullet_width: BULLET_WIDTH,
            bullet_height: BULLET_HEIGHT,
            bullet_speed: BULLET_SPEED,

            enemy_width: ENEMY_SIZE,
            enemy_height: ENEMY_SIZE,

            score_per_kill: SCORE_PER_KILL,

            difficulties: DifficultyTable::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn difficulty(&self, difficulty: Difficulty) -> DifficultyParams {
        self.difficulties.get(difficulty)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        // Entities must have area and keep moving, or the collections never drain
        let positive = [
            ("viewport_height", self.viewport_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("bullet_speed", self.bullet_speed),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::Invalid(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.viewport_width < self.enemy_width || self.viewport_width < self.player_width {
            return Err(TuningError::Invalid(format!(
                "viewport width {} is narrower than an entity",
                self.viewport_width
            )));
        }
        if self.full_health <= 0 || self.contact_damage <= 0 {
            return Err(TuningError::Invalid(
                "health and contact damage must be positive".to_string(),
            ));
        }
        if self.player_lives == 0 {
            return Err(TuningError::Invalid("player needs at least one life".to_string()));
        }
        for difficulty in Difficulty::ALL {
            let params = self.difficulty(difficulty);
            if params.enemy_speed.is_nan() || params.enemy_speed <= 0.0 {
                return Err(TuningError::Invalid(format!(
                    "{} enemy speed must be positive",
                    difficulty.as_str()
                )));
            }
            if params.spawn_rate_ms.is_nan() || params.spawn_rate_ms <= 0.0 {
                return Err(TuningError::Invalid(format!(
                    "{} spawn rate must be positive",
                    difficulty.as_str()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let tuning = Tuning::default();
        let easy = tuning.difficulty(Difficulty::Easy);
        assert_eq!(easy.enemy_speed, 2.0);
        assert_eq!(easy.spawn_rate_ms, 1500.0);
        assert_eq!(tuning.difficulty(Difficulty::Medium).enemy_speed, 4.0);
        assert_eq!(tuning.difficulty(Difficulty::Hard).spawn_rate_ms, 600.0);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 8.0 }"#).unwrap();
        assert_eq!(tuning.player_speed, 8.0);
        assert_eq!(tuning.viewport_width, VIEWPORT_WIDTH);
        assert_eq!(tuning.difficulties, DifficultyTable::default());
    }

    #[test]
    fn test_rejects_zero_spawn_rate() {
        let json = r#"{ "difficulties": {
            "easy":   { "enemy_speed": 2.0, "spawn_rate_ms": 0.0 },
            "medium": { "enemy_speed": 4.0, "spawn_rate_ms": 1000.0 },
            "hard":   { "enemy_speed": 6.0, "spawn_rate_ms": 600.0 }
        } }"#;
        assert!(matches!(Tuning::from_json(json), Err(TuningError::Invalid(_))));
    }

    #[test]
    fn test_rejects_stalled_entities() {
        let json = r#"{ "bullet_speed": 0.0 }"#;
        assert!(matches!(Tuning::from_json(json), Err(TuningError::Invalid(_))));

        let json = r#"{ "difficulties": {
            "easy":   { "enemy_speed": 0.0, "spawn_rate_ms": 1500.0 },
            "medium": { "enemy_speed": -4.0, "spawn_rate_ms": 1000.0 },
            "hard":   { "enemy_speed": 6.0, "spawn_rate_ms": 600.0 }
        } }"#;
        assert!(matches!(Tuning::from_json(json), Err(TuningError::Invalid(_))));

        for field in ["viewport_height", "enemy_width", "bullet_height", "player_width"] {
            let json = format!(r#"{{ "{}": 0.0 }}"#, field);
            assert!(
                matches!(Tuning::from_json(&json), Err(TuningError::Invalid(_))),
                "{} = 0 accepted",
                field
            );
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(Tuning::from_json("not json"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }
}
