//! In-memory catalog document and its on-disk JSON shape.
//!
//! ```json
//! {
//!     "shaders_count": 2,
//!     "shaders": {
//!         "20b": { "water_ps20b": { "raw_name": "water_ps20b.fxc", "raw_dir": "...", "dynamic": false, "enabled": true } },
//!         "30":  { "water_ps30":  { "raw_name": "water_ps30.fxc",  "raw_dir": "...", "dynamic": false, "enabled": false } }
//!     }
//! }
//! ```
//!
//! Bucket and record order is whatever the file says; it survives a
//! load / save round trip unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

/// One discovered shader source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShaderRecord {
    /// Canonical name: the catalog key, not stored inside the record
    #[serde(skip)]
    pub name: String,
    /// File name including extension
    pub raw_name: String,
    /// Directory that contains the source file
    pub raw_dir: String,
    /// Compile this shader in dynamic-combo mode
    #[serde(default)]
    pub dynamic: bool,
    /// Include this shader in build runs
    #[serde(default)]
    pub enabled: bool,
}

impl ShaderRecord {
    /// A freshly discovered shader: disabled and static.
    pub fn new(
        name: impl Into<String>,
        raw_name: impl Into<String>,
        raw_dir: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            raw_name: raw_name.into(),
            raw_dir: raw_dir.into(),
            dynamic: false,
            enabled: false,
        }
    }

    pub fn source_path(&self) -> PathBuf {
        PathBuf::from(&self.raw_dir).join(&self.raw_name)
    }

    fn to_value(&self) -> Value {
        json!({
            "raw_name": self.raw_name,
            "raw_dir": self.raw_dir,
            "dynamic": self.dynamic,
            "enabled": self.enabled,
        })
    }
}

/// All shaders sharing one shader-model bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBucket {
    /// Bucket key, e.g. `"20b"`, `"30"` or `"other"`
    pub version: String,
    pub shaders: Vec<ShaderRecord>,
}

impl VersionBucket {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            shaders: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ShaderRecord> {
        self.shaders.iter().find(|s| s.name == name)
    }
}

/// The persisted shader list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogFile", into = "CatalogFile")]
pub struct CatalogDocument {
    /// Number of source files found by the scan that produced this document
    pub shaders_count: usize,
    pub buckets: Vec<VersionBucket>,
}

impl CatalogDocument {
    pub fn bucket(&self, version: &str) -> Option<&VersionBucket> {
        self.buckets.iter().find(|b| b.version == version)
    }

    pub fn get(&self, version: &str, name: &str) -> Option<&ShaderRecord> {
        self.bucket(version)?.get(name)
    }

    /// Insert a record under `version`, creating the bucket at the end if needed.
    ///
    /// A record with the same name in the same bucket is replaced in place and
    /// returned.
    pub fn insert(&mut self, version: &str, record: ShaderRecord) -> Option<ShaderRecord> {
        let index = match self.buckets.iter().position(|b| b.version == version) {
            Some(index) => index,
            None => {
                self.buckets.push(VersionBucket::new(version));
                self.buckets.len() - 1
            }
        };
        let bucket = &mut self.buckets[index];
        match bucket.shaders.iter_mut().find(|s| s.name == record.name) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                bucket.shaders.push(record);
                None
            }
        }
    }

    /// Every record paired with its bucket key, in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ShaderRecord)> {
        self.buckets
            .iter()
            .flat_map(|b| b.shaders.iter().map(move |s| (b.version.as_str(), s)))
    }

    pub fn record_count(&self) -> usize {
        self.buckets.iter().map(|b| b.shaders.len()).sum()
    }

    pub fn enabled_count(&self) -> usize {
        self.iter().filter(|(_, s)| s.enabled).count()
    }
}

/// On-disk shape of [`CatalogDocument`].
///
/// Buckets are kept as ordered JSON maps so the order written by hand or by
/// the scan is the order the dispatcher walks.
#[derive(Serialize, Deserialize)]
struct CatalogFile {
    shaders_count: usize,
    #[serde(default)]
    shaders: Map<String, Value>,
}

impl TryFrom<CatalogFile> for CatalogDocument {
    type Error = serde_json::Error;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        let mut buckets = Vec::with_capacity(file.shaders.len());
        for (version, records) in file.shaders {
            let records: Map<String, Value> = serde_json::from_value(records)?;
            let mut bucket = VersionBucket::new(version);
            for (name, record) in records {
                let mut record: ShaderRecord = serde_json::from_value(record)?;
                record.name = name;
                bucket.shaders.push(record);
            }
            buckets.push(bucket);
        }
        Ok(Self {
            shaders_count: file.shaders_count,
            buckets,
        })
    }
}

impl From<CatalogDocument> for CatalogFile {
    fn from(doc: CatalogDocument) -> Self {
        let shaders = doc
            .buckets
            .into_iter()
            .map(|bucket| {
                let records: Map<String, Value> = bucket
                    .shaders
                    .iter()
                    .map(|s| (s.name.clone(), s.to_value()))
                    .collect();
                (bucket.version, Value::Object(records))
            })
            .collect();
        Self {
            shaders_count: doc.shaders_count,
            shaders,
        }
    }
}
