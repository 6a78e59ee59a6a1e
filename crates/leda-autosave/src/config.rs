//! Auto-save configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Shortest allowed auto-save interval, in seconds.
pub const MIN_INTERVAL_SECS: u64 = 5;

/// Longest allowed auto-save interval, in seconds.
pub const MAX_INTERVAL_SECS: u64 = 300;

/// Interval used until the user picks one.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Configuration for auto-save behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Whether auto-save is enabled.
    pub enabled: bool,

    /// Seconds between the end of one save and the start of the next.
    ///
    /// Must lie in `MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS`.
    pub interval_seconds: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: DEFAULT_INTERVAL_SECS,
        }
    }
}

impl AutoSaveConfig {
    /// Create a disabled auto-save config.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Create an enabled config saving every `seconds`.
    pub fn every(seconds: u64) -> Result<Self, ConfigError> {
        validate_interval(seconds)?;
        Ok(Self {
            enabled: true,
            interval_seconds: seconds,
        })
    }

    /// Check the interval bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_interval(self.interval_seconds).map(|_| ())
    }

    /// The interval as a [`Duration`].
    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

/// Validate an interval in seconds and convert it to a [`Duration`].
pub fn validate_interval(seconds: u64) -> Result<Duration, ConfigError> {
    if (MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&seconds) {
        Ok(Duration::from_secs(seconds))
    } else {
        Err(ConfigError::IntervalOutOfRange {
            seconds,
            min: MIN_INTERVAL_SECS,
            max: MAX_INTERVAL_SECS,
        })
    }
}
