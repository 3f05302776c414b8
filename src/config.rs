//! Configuration loading.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.lexigrade/config.toml`)
//! 3. User config (`~/.lexigrade/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The engine runs with sensible
//! defaults when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// XP amounts for progression events.
    pub xp: XpConfig,
    /// Grading defaults.
    pub grading: GradingConfig,
    /// Storage location.
    pub storage: StorageConfig,
}

/// XP amounts for progression events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct XpConfig {
    /// XP granted for the first completion of a lesson.
    pub lesson_completed: u32,
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            lesson_completed: 10,
        }
    }
}

/// Grading defaults applied when an exercise doesn't override them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GradingConfig {
    /// Point ceiling for exercises created without one.
    pub default_max_points: u32,
    /// Word threshold for writing exercises without a `min_words`.
    pub default_min_words: u32,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            default_max_points: 10,
            default_min_words: 20,
        }
    }
}

/// Storage location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory. Defaults to the lexigrade home when unset.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration with the full precedence chain.
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }
        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }
        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.lexigrade/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = lexigrade_home()?;
        Self::load_from_file(&home.join("config.toml")).ok()
    }

    /// Load project config from `.lexigrade/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        Self::load_from_file(&cwd.join(".lexigrade").join("config.toml")).ok()
    }

    /// Load config from a specific file path.
    fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| EngineError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| EngineError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("LEXIGRADE_LESSON_XP") {
            match val.parse::<u32>() {
                Ok(n) => self.xp.lesson_completed = n,
                Err(_) => eprintln!(
                    "Warning: Invalid LEXIGRADE_LESSON_XP value '{}'. \
                    Expected a non-negative integer. Using '{}'.",
                    val, self.xp.lesson_completed
                ),
            }
        }

        if let Ok(val) = env::var("LEXIGRADE_MAX_POINTS") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => self.grading.default_max_points = n,
                _ => eprintln!(
                    "Warning: Invalid LEXIGRADE_MAX_POINTS value '{}'. \
                    Expected a positive integer. Using '{}'.",
                    val, self.grading.default_max_points
                ),
            }
        }

        if let Ok(val) = env::var("LEXIGRADE_MIN_WORDS") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => self.grading.default_min_words = n,
                _ => eprintln!(
                    "Warning: Invalid LEXIGRADE_MIN_WORDS value '{}'. \
                    Expected a positive integer. Using '{}'.",
                    val, self.grading.default_min_words
                ),
            }
        }

        if let Ok(val) = env::var("LEXIGRADE_DATA_DIR") {
            if !val.is_empty() {
                self.storage.data_dir = Some(PathBuf::from(val));
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// The `other` config takes precedence: each of its non-default
    /// fields is applied over `self`, so a layer only needs to name
    /// its customizations.
    fn merge(mut self, other: Config) -> Self {
        let default_xp = XpConfig::default();
        if other.xp.lesson_completed != default_xp.lesson_completed {
            self.xp.lesson_completed = other.xp.lesson_completed;
        }

        let default_grading = GradingConfig::default();
        if other.grading.default_max_points != default_grading.default_max_points {
            self.grading.default_max_points = other.grading.default_max_points;
        }
        if other.grading.default_min_words != default_grading.default_min_words {
            self.grading.default_min_words = other.grading.default_min_words;
        }

        if other.storage.data_dir.is_some() {
            self.storage.data_dir = other.storage.data_dir;
        }

        self
    }

    /// The data directory to open storage in.
    ///
    /// Uses `storage.data_dir` when set, otherwise the lexigrade home.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        lexigrade_home().ok_or_else(|| {
            EngineError::config("could not determine data directory (no home directory)")
        })
    }
}

/// Get the lexigrade home directory.
///
/// Checks the `LEXIGRADE_HOME` environment variable first, then falls
/// back to `~/.lexigrade`. An empty or invalid override is ignored.
pub fn lexigrade_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("LEXIGRADE_HOME") {
        if home.is_empty() {
            tracing::warn!("LEXIGRADE_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("LEXIGRADE_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    dirs::home_dir().map(|home| home.join(".lexigrade"))
}
