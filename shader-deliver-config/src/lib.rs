//! Configuration system for shader-deliver.
//!
//! This crate owns the single JSON configuration document that drives a
//! shader build run. It includes:
//!
//! - The canonical schema and its default values
//! - An ordered, versioned migration table
//! - Loading, creating and atomically rewriting the backing file
//!
//! The loaded [`Configuration`] is an immutable value; callers pass it
//! explicitly to whatever needs it.

pub mod config;
pub mod defaults;
pub mod error;
pub mod persistence;
pub mod schema;

pub use config::{Configuration, resolve_compiler_path};
pub use error::ConfigError;
pub use persistence::{CONFIG_FILE_NAME, ConfigStore};
pub use schema::{CURRENT_VERSION, DEPRECATED_KEY, Document, MIGRATIONS, Migration};
