// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trade store configuration
//!
//! Loaded from a TOML file. Every field has a default, and a missing file
//! yields the default configuration.

use crate::schedule::{Schedule, ScheduleError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TRADESTORE_DATA_DIR";

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "TRADESTORE_CONFIG";

/// Default bus topic for trade events
pub const DEFAULT_TOPIC: &str = "trades";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid sweep schedule: {0}")]
    Schedule(#[from] ScheduleError),
    #[error("bus topic must not be empty")]
    EmptyTopic,
    #[error("bus queue capacity must be greater than zero")]
    ZeroQueueCapacity,
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the store WALs, lock file, and default log/event files
    pub data_dir: PathBuf,
    /// Daemon log file (defaults to `<data_dir>/tsd.log`)
    pub log_path: Option<PathBuf>,
    pub bus: BusConfig,
    pub sweep: SweepConfig,
}

/// Which bus transport the publisher hands events to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusKind {
    /// Append events as JSON lines to a file
    #[default]
    Jsonl,
    /// Discard events
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    pub kind: BusKind,
    pub topic: String,
    /// Event file for the `jsonl` transport (defaults to `<data_dir>/events.jsonl`)
    pub path: Option<PathBuf>,
    /// Events buffered between the coordinator and the transport
    pub queue_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            kind: BusKind::default(),
            topic: DEFAULT_TOPIC.to_string(),
            path: None,
            queue_capacity: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub enabled: bool,
    pub schedule: Schedule,
    /// Run one sweep immediately at startup, before the first scheduled tick
    pub run_on_startup: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: Schedule::default(),
            run_on_startup: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_path: None,
            bus: BusConfig::default(),
            sweep: SweepConfig::default(),
        }
    }
}

impl Config {
    /// Load from a TOML file, falling back to defaults when it does not exist.
    /// `TRADESTORE_DATA_DIR` overrides `data_dir` either way.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(ConfigError::Read(path.to_path_buf(), e)),
        };
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            config = config.with_data_dir(dir);
        }
        config.validate()?;
        Ok(config)
    }

    /// `TRADESTORE_CONFIG` when set, otherwise `tradestore/tsd.toml` under the
    /// platform config directory
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|dir| dir.join("tradestore"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tsd.toml")
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus.topic.trim().is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        if self.bus.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        self.sweep.schedule.validate()?;
        Ok(())
    }

    pub fn primary_wal_path(&self) -> PathBuf {
        self.data_dir.join("primary.wal")
    }

    pub fn secondary_wal_path(&self) -> PathBuf {
        self.data_dir.join("secondary.wal")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join("tsd.pid")
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("tsd.log"))
    }

    pub fn bus_path(&self) -> PathBuf {
        self.bus
            .path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("events.jsonl"))
    }
}

/// Default data directory
///
/// Uses XDG_STATE_HOME when set, then the platform state/data directory.
fn default_data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("tradestore");
    }
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("tradestore"))
        .unwrap_or_else(|| PathBuf::from(".tradestore"))
}
