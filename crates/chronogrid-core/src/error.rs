//! Core error types for chronogrid-core.
//!
//! This module defines the error hierarchy using thiserror. Layout
//! functions are infallible over validated input; errors only surface at
//! the windowing engine, the configuration layer, and upstream validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for chronogrid-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Windowing engine errors
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// IO errors while reading host-supplied files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed item or settings JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Config directory could not be resolved or created
    #[error("Config directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

/// Validation errors for data handed to the core by a host.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Item ends before it starts
    #[error("Invalid range for '{id}': end ({end}) is before start ({start})")]
    InvalidRange {
        id: String,
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    },

    /// A host-supplied setting is out of bounds
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Windowing engine errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WindowError {
    /// Capacity is a configuration invariant and may never be negative
    #[error("window capacity must be >= 0, got {capacity}")]
    NegativeCapacity { capacity: i64 },

    /// A buffer accessor was used before the first seed
    #[error("{what} is not initialized: derive a snapshot before reading it")]
    NotInitialized { what: &'static str },

    /// The base index moves the window past the representable dates
    #[error("base index {base_index} moves the window outside the supported date range")]
    OutOfRange { base_index: i64 },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_error_converts_into_core_error() {
        let err: CoreError = WindowError::NegativeCapacity { capacity: -3 }.into();
        assert!(matches!(
            err,
            CoreError::Window(WindowError::NegativeCapacity { capacity: -3 })
        ));
        assert_eq!(
            err.to_string(),
            "Window error: window capacity must be >= 0, got -3"
        );
    }

    #[test]
    fn malformed_json_converts_into_core_error() {
        let parsed: Result<Vec<crate::DisplayItem>> = serde_json::from_str("[{").map_err(Into::into);
        assert!(matches!(parsed, Err(CoreError::Json(_))));
    }

    #[test]
    fn not_initialized_names_the_accessor() {
        let err = WindowError::NotInitialized { what: "day buffer" };
        assert!(err.to_string().starts_with("day buffer is not initialized"));
    }
}
