//! User configuration
//!
//! Loaded from `$XDG_CONFIG_HOME/hackterm/config.toml`. A missing file means
//! defaults; every field falls back to its default when left out.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::screen::DEFAULT_MAX_ENTRIES;
use crate::theme::Theme;

/// Errors from loading or saving the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine the config directory")]
    NoConfigDir,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Text before every echoed command
    pub prompt: String,
    /// Command document (JSON)
    pub commands: PathBuf,
    /// Output entries kept once the session is interactive
    pub max_entries: usize,
    /// matrix | classic | ocean
    pub theme: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            prompt: "root@hacker-system:~# ".to_string(),
            commands: PathBuf::from("config.json"),
            max_entries: DEFAULT_MAX_ENTRIES,
            theme: "matrix".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub enabled: bool,
    /// 0.0 ..= 1.0
    pub volume: f64,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Glyph rain behind the transcript
    pub rain: bool,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self { rain: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub terminal: TerminalConfig,
    pub sound: SoundConfig,
    pub effects: EffectsConfig,
}

impl Config {
    /// Path of the user config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("hackterm").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load the user config, or defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to the user config file, creating its directory.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, content).map_err(write_err)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The configured theme; unknown names fall back to the default.
    pub fn theme(&self) -> Theme {
        Theme::by_name(&self.terminal.theme).unwrap_or_else(|| {
            tracing::warn!(
                "unknown theme '{}', expected one of {:?}",
                self.terminal.theme,
                Theme::NAMES
            );
            Theme::default()
        })
    }
}
