//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! [`crate::Configuration`] fields and by the migration table when a key has
//! to be introduced into an older document.

use crate::schema::CURRENT_VERSION;

pub fn conf_version() -> f64 {
    CURRENT_VERSION
}

pub fn dir_src() -> String {
    "G:/vance-src".to_string()
}

pub fn dir_shaders() -> String {
    "G:/vance-src/shaders".to_string()
}

pub fn dir_mod() -> String {
    "G:/vance-game/vance".to_string()
}

pub fn threads() -> u32 {
    2
}

/// Relative to `dir-src`
pub fn shader_compiler() -> String {
    "devtools/bin/ShaderCompile.exe".to_string()
}

pub fn shader_force_dynamic() -> bool {
    false
}
