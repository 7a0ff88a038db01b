//! Application configuration management.
//!
//! This module handles the optional configuration file for deck, covering the
//! starting volume of the local player, the HTTP timeout of the stream player,
//! the seek step and where the player writes its log. Configuration is stored
//! in the user's config directory (typically ~/.config/deck/config.toml). A
//! missing file is not an error; every field falls back to its default.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SEEK_STEP_SECS, DEFAULT_VOLUME_PERCENT, LOG_FILE_NAME,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_volume")]
    pub default_volume: u8,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

fn default_volume() -> u8 {
    DEFAULT_VOLUME_PERCENT
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_seek_step_secs() -> u64 {
    DEFAULT_SEEK_STEP_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            default_volume: default_volume(),
            http_timeout_secs: default_http_timeout_secs(),
            seek_step_secs: default_seek_step_secs(),
            log_level: default_log_level(),
            log_file: None,
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("deck")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("deck")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    /// Reject values that would parse but make no sense at runtime.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.default_volume > 100 {
            return Err(format!(
                "default_volume must be between 0 and 100, got {}",
                self.default_volume
            )
            .into());
        }
        if self.http_timeout_secs == 0 {
            return Err("http_timeout_secs must be greater than 0".into());
        }
        if self.seek_step_secs == 0 {
            return Err("seek_step_secs must be greater than 0".into());
        }
        self.log_level_filter()?;
        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "default_volume" => {
                let volume = value
                    .parse::<u8>()
                    .map_err(|_| "Value must be a number between 0 and 100")?;
                if volume > 100 {
                    return Err("Value must be a number between 0 and 100".into());
                }
                self.default_volume = volume;
            }
            "http_timeout_secs" => {
                let secs = value
                    .parse::<u64>()
                    .map_err(|_| "Value must be a positive number of seconds")?;
                if secs == 0 {
                    return Err("Value must be a positive number of seconds".into());
                }
                self.http_timeout_secs = secs;
            }
            "seek_step_secs" => {
                let secs = value
                    .parse::<u64>()
                    .map_err(|_| "Value must be a positive number of seconds")?;
                if secs == 0 {
                    return Err("Value must be a positive number of seconds".into());
                }
                self.seek_step_secs = secs;
            }
            "log_level" => {
                LevelFilter::from_str(value).map_err(|_| {
                    "Value must be one of: off, error, warn, info, debug, trace"
                })?;
                self.log_level = value.to_lowercase();
            }
            "log_file" => {
                self.log_file = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn seek_step(&self) -> Duration {
        Duration::from_secs(self.seek_step_secs)
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, Box<dyn Error>> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| format!("Unknown log level: {}", self.log_level).into())
    }

    /// Log destination, with `~` expanded. Defaults to the system temp directory.
    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
            None => std::env::temp_dir().join(LOG_FILE_NAME),
        }
    }
}
