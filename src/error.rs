//! Arena error types.
//!
//! Nothing inside a tick can fail. These errors only surface at the edges:
//! malformed command arguments and settings files.

use std::fmt;

/// Top-level error enum for the arena.
#[derive(Debug)]
pub enum ArenaError {
    /// A numeric command argument was NaN or infinite.
    InvalidNumber {
        /// Which argument was rejected (for logging).
        field: &'static str,
        /// The value that was rejected.
        value: f32,
    },

    /// A settings value is outside its allowed range.
    InvalidSetting {
        /// Name of the setting.
        name: &'static str,
        /// The value that was rejected, formatted.
        value: String,
        /// Human-readable description of the allowed range.
        expected: &'static str,
    },

    /// Settings file could not be read.
    SettingsIo(std::io::Error),

    /// Settings file is not valid JSON for `ArenaSettings`.
    SettingsParse(serde_json::Error),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::InvalidNumber { field, value } => {
                write!(f, "invalid {field}: {value} is not a finite number")
            }
            ArenaError::InvalidSetting {
                name,
                value,
                expected,
            } => write!(f, "setting `{name}` = {value} is invalid (expected {expected})"),
            ArenaError::SettingsIo(e) => write!(f, "failed to read settings: {e}"),
            ArenaError::SettingsParse(e) => write!(f, "failed to parse settings: {e}"),
        }
    }
}

impl std::error::Error for ArenaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArenaError::SettingsIo(e) => Some(e),
            ArenaError::SettingsParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ArenaError {
    fn from(e: std::io::Error) -> Self {
        ArenaError::SettingsIo(e)
    }
}

impl From<serde_json::Error> for ArenaError {
    fn from(e: serde_json::Error) -> Self {
        ArenaError::SettingsParse(e)
    }
}

/// Reject NaN and infinities for a named command argument.
pub fn require_finite(field: &'static str, value: f32) -> Result<f32, ArenaError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ArenaError::InvalidNumber { field, value })
    }
}
