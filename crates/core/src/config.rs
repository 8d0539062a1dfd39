// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run configuration for the task driver
//!
//! Loaded from TOML; every field is optional and falls back to the defaults
//! below. Durations use humantime syntax (`"250ms"`, `"1s"`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of reader tasks to spawn
    pub reader_count: u32,
    /// Number of writer tasks to spawn
    pub writer_count: u32,
    /// Upper bound of the random pause between spawning two tasks
    #[serde(with = "humantime_serde")]
    pub spawn_delay: Duration,
    /// Upper bound of the random time a task spends reading or writing
    #[serde(with = "humantime_serde")]
    pub work_delay: Duration,
    /// Amount each writer adds to the shared value
    pub write_delta: i64,
    pub initial_value: i64,
    /// Log every protocol step instead of only observed values
    pub verbose: bool,
    /// Give up on admission after this long; unbounded when absent
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            reader_count: 5,
            writer_count: 3,
            spawn_delay: Duration::from_secs(1),
            work_delay: Duration::from_secs(1),
            write_delta: 5,
            initial_value: 0,
            verbose: false,
            timeout: None,
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Configuration with no artificial delays, for tests
    pub fn immediate(reader_count: u32, writer_count: u32) -> Self {
        Self {
            reader_count,
            writer_count,
            spawn_delay: Duration::ZERO,
            work_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_write_delta(mut self, delta: i64) -> Self {
        self.write_delta = delta;
        self
    }

    pub fn with_initial_value(mut self, value: i64) -> Self {
        self.initial_value = value;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reader_count == 0 && self.writer_count == 0 {
            return Err(ConfigError::Invalid(
                "at least one reader or writer is required".to_string(),
            ));
        }
        if self.write_delta == 0 {
            return Err(ConfigError::Invalid(
                "write_delta must be non-zero".to_string(),
            ));
        }
        let total = i64::from(self.writer_count).checked_mul(self.write_delta);
        if total
            .and_then(|t| self.initial_value.checked_add(t))
            .is_none()
        {
            return Err(ConfigError::Invalid(
                "writers would overflow the shared value".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
