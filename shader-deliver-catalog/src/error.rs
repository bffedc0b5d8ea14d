//! Typed error variants for the shader-deliver-catalog crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while scanning, reading or writing the shader list.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A directory or file under the scan root could not be accessed.
    #[error("Failed to scan shader sources at '{}': {source}", .path.display())]
    Scan {
        /// Path that could not be accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The shader list file could not be read.
    #[error("Failed to read shader list '{}': {source}", .path.display())]
    Read {
        /// Path to the shader list.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The shader list file is not a valid catalog document.
    #[error("Shader list '{}' is malformed: {source}", .path.display())]
    Parse {
        /// Path to the shader list.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The catalog could not be serialized.
    #[error("Failed to serialize shader list: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The shader list file could not be written.
    #[error("Failed to write shader list '{}': {source}", .path.display())]
    Write {
        /// Path to the shader list.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
