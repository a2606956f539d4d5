use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::symbol::Alphabet;

/// Upper bound on the number of levels in one game
pub const MAX_LEVELS: usize = 1_000;
/// Upper bound on the length of any single level's sequence
pub const MAX_SEQUENCE_LENGTH: usize = 10_000;

/// Game tunables. Times are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub note_duration_secs: f64,
    pub pause_between_notes_secs: f64,
    pub delay_before_input_secs: f64,
    pub delay_after_wrong_secs: f64,
    pub delay_after_correct_secs: f64,
    pub starting_length: usize,
    pub length_increase_per_level: usize,
    pub total_levels: usize,
    pub keys: String,
    pub time_limit_secs: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            note_duration_secs: 0.4,
            pause_between_notes_secs: 0.2,
            delay_before_input_secs: 0.5,
            delay_after_wrong_secs: 1.5,
            delay_after_correct_secs: 1.0,
            starting_length: 4,
            length_increase_per_level: 2,
            total_levels: 5,
            keys: "QWERT".to_string(),
            time_limit_secs: None,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Check every tunable and return the alphabet they describe
    pub fn validate(&self) -> Result<Alphabet, ConfigError> {
        let alphabet = Alphabet::from_keys(&self.keys)?;

        positive("note duration", self.note_duration_secs)?;
        non_negative("pause between notes", self.pause_between_notes_secs)?;
        non_negative("delay before input", self.delay_before_input_secs)?;
        non_negative("delay after wrong answer", self.delay_after_wrong_secs)?;
        non_negative("delay after correct level", self.delay_after_correct_secs)?;

        if self.starting_length == 0 {
            return Err(ConfigError::ZeroStartingLength);
        }
        if self.total_levels == 0 {
            return Err(ConfigError::ZeroLevels);
        }
        if self.total_levels > MAX_LEVELS {
            return Err(ConfigError::TooManyLevels {
                levels: self.total_levels,
                max: MAX_LEVELS,
            });
        }
        // lengths only grow, so the last level bounds them all
        let longest = (self.total_levels - 1)
            .checked_mul(self.length_increase_per_level)
            .and_then(|extra| extra.checked_add(self.starting_length));
        if !longest.is_some_and(|len| len <= MAX_SEQUENCE_LENGTH) {
            return Err(ConfigError::SequenceTooLong {
                max: MAX_SEQUENCE_LENGTH,
            });
        }
        if let Some(limit) = self.time_limit_secs {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(ConfigError::InvalidTimeLimit(limit));
            }
        }

        Ok(alphabet)
    }

    /// Length of the sequence played on `level_index`
    pub fn sequence_length(&self, level_index: usize) -> usize {
        level_index
            .saturating_mul(self.length_increase_per_level)
            .saturating_add(self.starting_length)
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveDuration { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeDelay { name, value })
    }
}

pub trait ConfigStore {
    fn load(&self) -> GameConfig;
    fn save(&self, cfg: &GameConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "refrain") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("refrain_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> GameConfig {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<GameConfig>(&bytes) {
                Ok(cfg) => return cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config")
                }
            }
        }
        GameConfig::default()
    }

    fn save(&self, cfg: &GameConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
