//! shader-deliver: compile the enabled shaders of a Source engine mod and
//! deploy the compiled artifacts into the mod tree.
//!
//! Configuration lives in `shader-deliver-config`, the shader list in
//! `shader-deliver-catalog`; this crate holds the build dispatcher, the
//! console logger and the command line.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod cli;
pub mod dispatch;
pub mod runner;

pub use shader_deliver_catalog as catalog;
pub use shader_deliver_config as config;
