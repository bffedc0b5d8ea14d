//! Config persistence: load / create / migrate / atomic write.

use crate::config::Configuration;
use crate::error::ConfigError;
use crate::schema::{self, CURRENT_VERSION, Document};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default backing file, relative to the working directory.
pub const CONFIG_FILE_NAME: &str = "_shader_conf.json";

/// Owns the configuration backing file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(CONFIG_FILE_NAME)
    }
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load configuration from file or create the default one.
    ///
    /// A document whose version differs from [`CURRENT_VERSION`] is migrated
    /// and written back before it is returned.
    pub fn load(&self) -> Result<Configuration, ConfigError> {
        log::info!("Config path: {:?}", self.path);

        if !self.exists() {
            log::warn!("Config file was not found, creating {:?}", self.path);
            let config = Configuration::default();
            self.write(&schema::default_document())?;
            log::info!(
                "Created default config:\n{}",
                String::from_utf8_lossy(&to_pretty_json(&config).map_err(ConfigError::Serialize)?)
            );
            return Ok(config);
        }

        log::info!("Config file was found, loading...");
        let contents = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        let Value::Object(doc) = value else {
            return Err(ConfigError::Invalid(format!(
                "{:?} must contain a JSON object",
                self.path
            )));
        };

        let stored_version = schema::document_version(&doc);
        log::info!("Loaded config version: {}", stored_version);

        // A version stored as a string is rewritten as a number by migrating.
        let numeric_version = doc.get(schema::VERSION_KEY).is_some_and(Value::is_number);
        let doc = if numeric_version && schema::is_current(stored_version) {
            doc
        } else {
            log::warn!(
                "Config is outdated ({} != {}), updating...",
                stored_version,
                CURRENT_VERSION
            );
            self.migrate(doc, stored_version)?
        };

        Configuration::from_document(doc)
    }

    /// Migrate a document stored at `stored_version` and write it back immediately.
    pub fn migrate(&self, doc: Document, stored_version: f64) -> Result<Document, ConfigError> {
        let migrated = schema::migrate_document(doc, stored_version);
        self.write(&migrated)?;
        log::info!("Config updated to version {}", CURRENT_VERSION);
        Ok(migrated)
    }

    /// Save a document to the backing file.
    ///
    /// Writes to a temp file and renames it over the target so a crash never
    /// leaves a truncated config behind.
    pub fn write(&self, doc: &Document) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = to_pretty_json(doc).map_err(ConfigError::Serialize)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &json).map_err(write_err)?;
        fs::rename(&temp_path, &self.path).map_err(write_err)?;

        log::debug!("Wrote config to {:?}", self.path);
        Ok(())
    }
}

/// Pretty JSON with a four-space indent.
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}
