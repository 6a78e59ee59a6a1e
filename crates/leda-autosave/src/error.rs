//! Auto-save error types.

use thiserror::Error;

/// Invalid auto-save configuration.
///
/// Returned synchronously by reconfiguration; the coordinator's state is left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Interval outside the supported range.
    #[error("Auto-save interval must be between {min} and {max} seconds (got {seconds})")]
    IntervalOutOfRange { seconds: u64, min: u64, max: u64 },
}

impl ConfigError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::IntervalOutOfRange { min, max, .. } => {
                format!("Please enter a number between {min} and {max}")
            }
        }
    }
}
