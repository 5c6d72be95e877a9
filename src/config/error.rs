//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing required field that must be provided on the command line.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// Invalid interface name.
    #[error("Invalid interface name '{name}': {reason}")]
    InvalidInterface {
        /// The rejected name
        name: String,
        /// Reason for invalidity
        reason: &'static str,
    },

    /// Threshold outside the accepted range.
    #[error("Invalid threshold {0}: must be greater than 0")]
    InvalidThreshold(u32),

    /// Invalid trigger event list.
    #[error("Invalid trigger events: {0}")]
    InvalidEvents(String),

    /// Empty address probe program.
    #[error("Invalid ip command: must not be empty")]
    InvalidIpCommand,
}

/// Well-known field names for `MissingRequired` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The interface positional argument.
    pub const INTERFACE: &str = "interface";
    /// The event positional argument.
    pub const EVENT: &str = "event";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
