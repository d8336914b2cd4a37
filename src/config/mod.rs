//! Configuration management for twinterm.
//!
//! Handles loading of user preferences: which shell to spawn, the event-loop
//! poll interval, and where the keystroke capture and engine logs go.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shell spawned in both panes; defaults to `$SHELL`, then `/bin/sh`
    #[serde(default)]
    pub shell: Option<String>,

    /// Event-loop poll timeout in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Keystroke capture file, truncated at startup
    #[serde(default = "default_keystroke_log")]
    pub keystroke_log: PathBuf,

    /// Engine log file; set to null to disable logging
    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,
}

fn default_poll_interval_ms() -> u64 {
    50
}

fn default_keystroke_log() -> PathBuf {
    PathBuf::from("twinterm-input.bin")
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("twinterm.log"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shell: None,
            poll_interval_ms: default_poll_interval_ms(),
            keystroke_log: default_keystroke_log(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Clamp the poll interval to a sane range (10-500 ms)
    pub fn validate(&mut self) {
        self.poll_interval_ms = self.poll_interval_ms.clamp(10, 500);
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not find config directory")?;

        Ok(config_dir.join("twinterm").join("config.json"))
    }
}
