//! Persistence of the shader list file.

use crate::error::CatalogError;
use crate::model::CatalogDocument;
use crate::scan::scan;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default backing file, relative to the working directory.
pub const SHADER_LIST_FILE_NAME: &str = "_shaders_list.json";

/// Owns the shader list backing file.
#[derive(Debug, Clone)]
pub struct ShaderCatalog {
    path: PathBuf,
}

impl Default for ShaderCatalog {
    fn default() -> Self {
        Self::new(SHADER_LIST_FILE_NAME)
    }
}

impl ShaderCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Scan `root` and write the result, unless a shader list already exists.
    ///
    /// An existing list (with its hand-edited flags) is never overwritten.
    /// Returns `true` when a new file was written.
    pub fn create_if_absent(&self, root: &Path) -> Result<bool, CatalogError> {
        if self.exists() {
            log::debug!("Shader list {:?} already exists, not rescanning", self.path);
            return Ok(false);
        }

        log::info!("Creating shader list file {:?}", self.path);
        let doc = scan(root)?;
        self.write(&doc)?;
        log::info!("Shader list file created: {:?}", self.path);
        Ok(true)
    }

    /// Rescan `root` and overwrite the shader list, discarding edited flags.
    pub fn regenerate(&self, root: &Path) -> Result<CatalogDocument, CatalogError> {
        log::warn!("Regenerating shader list {:?}", self.path);
        let doc = scan(root)?;
        self.write(&doc)?;
        Ok(doc)
    }

    pub fn load(&self) -> Result<CatalogDocument, CatalogError> {
        log::info!("Loading shader list file {:?}", self.path);
        let contents = fs::read_to_string(&self.path).map_err(|source| CatalogError::Read {
            path: self.path.clone(),
            source,
        })?;
        let doc: CatalogDocument =
            serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
                path: self.path.clone(),
                source,
            })?;
        log::info!(
            "Shader list file loaded, includes {} shaders",
            doc.shaders_count
        );
        Ok(doc)
    }

    /// Save a document, writing to a temp file first and renaming it into place.
    pub fn write(&self, doc: &CatalogDocument) -> Result<(), CatalogError> {
        let write_err = |source| CatalogError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = to_pretty_json(doc).map_err(CatalogError::Serialize)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &json).map_err(write_err)?;
        fs::rename(&temp_path, &self.path).map_err(write_err)?;
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
