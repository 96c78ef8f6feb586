// Application configuration - RON file in the user's config directory

use crate::cue::CueSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "fitpace";
const CONFIG_FILE: &str = "config.ron";

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cues: CueSettings,

    /// Length of one logical second, in milliseconds
    pub tick_interval_ms: u64,

    pub default_breathing_pattern: String,
    pub default_meditation_script: String,

    pub command_capacity: usize,
    pub event_capacity: usize,

    /// Default `tracing` filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cues: CueSettings::default(),
            tick_interval_ms: 1000,
            default_breathing_pattern: "box".to_string(),
            default_meditation_script: "focus".to_string(),
            command_capacity: 64,
            event_capacity: 1024,
            log_filter: "fitpace=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Read and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = ron::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the config at `path`, or the defaults if the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Config for the CLI
    ///
    /// A path given explicitly must exist. Without one, the default location
    /// is read if present and the defaults are used otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match config_path() {
                Some(path) => Self::load_or_default(path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Write the config as pretty RON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if self.command_capacity == 0 || self.event_capacity == 0 {
            return Err(ConfigError::Invalid("channel capacities must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.cues.volume) {
            return Err(ConfigError::Invalid(format!(
                "cue volume must be within 0.0..=1.0, got {}",
                self.cues.volume
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Default config location (`<config_dir>/fitpace/config.ron`)
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
