//! The typed, immutable view of the configuration document.

use crate::defaults;
use crate::error::ConfigError;
use crate::schema::{DEPRECATED_KEY, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Settings for one shader build run.
///
/// Field order matches the on-disk document, so serializing the default value
/// yields the canonical default file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Schema version the document was written with
    #[serde(rename = "conf-version", default = "defaults::conf_version")]
    pub version: f64,

    /// Root of the engine source tree; the compiler path is relative to it
    #[serde(rename = "dir-src", default = "defaults::dir_src")]
    pub dir_src: String,

    /// Root the compiler writes `shaders/fxc/*.vcs` artifacts under
    #[serde(rename = "dir-shaders", default = "defaults::dir_shaders")]
    pub dir_shaders: String,

    /// Root of the mod tree artifacts are deployed into
    #[serde(rename = "dir-mod", default = "defaults::dir_mod")]
    pub dir_mod: String,

    /// Thread count forwarded to the external compiler
    #[serde(default = "defaults::threads")]
    pub threads: u32,

    #[serde(rename = "shader-compiler", default = "defaults::shader_compiler")]
    pub shader_compiler: String,

    /// Compile every shader in dynamic-combo mode regardless of its own flag
    #[serde(rename = "shader-force-dynamic", default = "defaults::shader_force_dynamic")]
    pub force_dynamic: bool,

    /// Keys that left the canonical schema, kept for rollback inspection
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub deprecated: Document,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            version: defaults::conf_version(),
            dir_src: defaults::dir_src(),
            dir_shaders: defaults::dir_shaders(),
            dir_mod: defaults::dir_mod(),
            threads: defaults::threads(),
            shader_compiler: defaults::shader_compiler(),
            force_dynamic: defaults::shader_force_dynamic(),
            deprecated: Document::new(),
        }
    }
}

impl Configuration {
    /// Build a configuration from a parsed document and validate it.
    pub fn from_document(doc: Document) -> Result<Self, ConfigError> {
        if let Some(deprecated) = doc.get(DEPRECATED_KEY)
            && !deprecated.is_object()
        {
            return Err(ConfigError::Invalid(format!(
                "'{DEPRECATED_KEY}' must be an object, found {deprecated}"
            )));
        }

        let config: Configuration = serde_json::from_value(Value::Object(doc))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Convert back into the on-disk document shape.
    pub fn to_document(&self) -> Result<Document, ConfigError> {
        match serde_json::to_value(self).map_err(ConfigError::Serialize)? {
            Value::Object(doc) => Ok(doc),
            other => Err(ConfigError::Invalid(format!(
                "configuration serialized to a non-object value: {other}"
            ))),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.threads < 1 {
            return Err(ConfigError::Invalid(
                "'threads' must be a positive integer".to_string(),
            ));
        }
        if self.shader_compiler.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "'shader-compiler' must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Compiler executable: `dir-src + "/" + shader-compiler`
    pub fn compiler_path(&self) -> PathBuf {
        resolve_compiler_path(&self.dir_src, &self.shader_compiler)
    }

    pub fn shaders_root(&self) -> PathBuf {
        PathBuf::from(&self.dir_shaders)
    }

    pub fn mod_root(&self) -> PathBuf {
        PathBuf::from(&self.dir_mod)
    }
}

/// Join a source root and a compiler path relative to it with a `/`.
pub fn resolve_compiler_path(src_root: &str, compiler_rel_path: &str) -> PathBuf {
    PathBuf::from(format!("{src_root}/{compiler_rel_path}"))
}
