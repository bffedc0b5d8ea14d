//! Typed error variants for the shader-deliver-config crate.
//!
//! Every variant is fatal to a run: the configuration is foundational, so a
//! failed read or a partial write is never retried or silently ignored.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading, migrating or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The backing file exists but could not be opened or read.
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not well-formed JSON.
    #[error("Config file '{}' is not valid JSON: {source}", .path.display())]
    Parse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but a canonical field has an unusable value.
    ///
    /// The inner string describes which field is invalid and why.
    #[error("Config validation error: {0}")]
    Invalid(String),

    /// The document could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The document could not be written to the backing file.
    #[error("Failed to write config file '{}': {source}", .path.display())]
    Write {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
