//! Canonical schema and versioned migration table.
//!
//! A document is migrated by running every [`Migration`] whose target version
//! is newer than the stored one, in table order, and then reconciling it with
//! the canonical schema:
//!
//! ```text
//! stored version ──(gap > 5? drop `deprecated`)──► steps (to > stored) ──► reconcile ──► stamp CURRENT_VERSION
//! ```
//!
//! Reconciling inserts defaults for missing canonical keys and moves every
//! non-canonical key under [`DEPRECATED_KEY`]. Values of canonical keys that
//! are already present are never touched.

use crate::defaults;
use serde_json::{Value, json};

/// A raw configuration document. Key order follows the file.
pub type Document = serde_json::Map<String, Value>;

/// Version written into every document this build produces.
pub const CURRENT_VERSION: f64 = 2.1;

pub const VERSION_KEY: &str = "conf-version";

/// Reserved sub-object holding keys that left the canonical schema.
pub const DEPRECATED_KEY: &str = "deprecated";

/// A stored document older than this many versions loses its deprecated bucket.
pub const PRUNE_VERSION_GAP: f64 = 5.0;

/// Every top-level key of the current schema, in file order.
pub const CANONICAL_KEYS: [&str; 7] = [
    VERSION_KEY,
    "dir-src",
    "dir-shaders",
    "dir-mod",
    "threads",
    "shader-compiler",
    "shader-force-dynamic",
];

/// One step of schema history: transforms a `from` document into a `to` document.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub from: f64,
    pub to: f64,
    pub apply: fn(&mut Document),
}

/// Schema history, oldest first.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        from: 0.0,
        to: 1.0,
        apply: introduce_paths,
    },
    Migration {
        from: 1.0,
        to: 2.0,
        apply: introduce_threads,
    },
    Migration {
        from: 2.0,
        to: 2.1,
        apply: introduce_force_dynamic,
    },
];

fn introduce_paths(doc: &mut Document) {
    for key in ["dir-src", "dir-shaders", "dir-mod", "shader-compiler"] {
        insert_default(doc, key);
    }
}

fn introduce_threads(doc: &mut Document) {
    insert_default(doc, "threads");
}

fn introduce_force_dynamic(doc: &mut Document) {
    insert_default(doc, "shader-force-dynamic");
}

/// Insert the canonical default for `key` unless the document already has it.
fn insert_default(doc: &mut Document, key: &str) {
    if doc.contains_key(key) {
        return;
    }
    if let Some(value) = default_value(key) {
        log::debug!("Adding missing config key '{}' = {}", key, value);
        doc.insert(key.to_string(), value);
    }
}

/// The canonical default document.
pub fn default_document() -> Document {
    let mut doc = Document::new();
    doc.insert(VERSION_KEY.to_string(), json!(defaults::conf_version()));
    doc.insert("dir-src".to_string(), json!(defaults::dir_src()));
    doc.insert("dir-shaders".to_string(), json!(defaults::dir_shaders()));
    doc.insert("dir-mod".to_string(), json!(defaults::dir_mod()));
    doc.insert("threads".to_string(), json!(defaults::threads()));
    doc.insert(
        "shader-compiler".to_string(),
        json!(defaults::shader_compiler()),
    );
    doc.insert(
        "shader-force-dynamic".to_string(),
        json!(defaults::shader_force_dynamic()),
    );
    doc
}

pub fn default_value(key: &str) -> Option<Value> {
    default_document().get(key).cloned()
}

pub fn is_canonical(key: &str) -> bool {
    CANONICAL_KEYS.contains(&key)
}

/// Version stored in a document; an absent or unreadable version counts as `0`.
pub fn document_version(doc: &Document) -> f64 {
    doc.get(VERSION_KEY)
        .and_then(|v| v.as_f64().or_else(|| v.as_str()?.trim().parse().ok()))
        .unwrap_or(0.0)
}

pub fn is_current(version: f64) -> bool {
    (version - CURRENT_VERSION).abs() < 1e-9
}

/// Bring a document stored at `stored_version` up to [`CURRENT_VERSION`].
///
/// Pure: the caller is responsible for persisting the result.
pub fn migrate_document(doc: Document, stored_version: f64) -> Document {
    migrate_to(doc, stored_version, CURRENT_VERSION)
}

/// Bring a document stored at `stored_version` up to `target_version`,
/// running only the steps that land at or below the target.
pub fn migrate_to(mut doc: Document, stored_version: f64, target_version: f64) -> Document {
    let gap = target_version - stored_version;
    if gap > PRUNE_VERSION_GAP && doc.contains_key(DEPRECATED_KEY) {
        log::info!(
            "Config is {} versions behind, dropping the old '{}' bucket",
            gap,
            DEPRECATED_KEY
        );
        doc = doc
            .into_iter()
            .filter(|(key, _)| key != DEPRECATED_KEY)
            .collect();
    }

    for step in MIGRATIONS
        .iter()
        .filter(|m| m.to > stored_version && m.to <= target_version)
    {
        log::debug!("Applying config migration {} -> {}", step.from, step.to);
        (step.apply)(&mut doc);
        doc.insert(VERSION_KEY.to_string(), json!(step.to));
    }

    let mut doc = reconcile(doc);
    doc.insert(VERSION_KEY.to_string(), json!(target_version));
    doc
}

/// Fill in missing canonical keys and move the rest under [`DEPRECATED_KEY`].
fn reconcile(doc: Document) -> Document {
    let mut kept = Document::new();
    let mut stale = Vec::new();
    for (key, value) in doc {
        if key == DEPRECATED_KEY || is_canonical(&key) {
            kept.insert(key, value);
        } else {
            stale.push((key, value));
        }
    }

    for key in CANONICAL_KEYS {
        insert_default(&mut kept, key);
    }

    if stale.is_empty() {
        return kept;
    }

    let bucket = kept
        .entry(DEPRECATED_KEY)
        .or_insert_with(|| Value::Object(Document::new()));
    if !bucket.is_object() {
        // Keep a malformed bucket's value instead of overwriting it.
        let previous = std::mem::take(bucket);
        let mut wrapped = Document::new();
        wrapped.insert(DEPRECATED_KEY.to_string(), previous);
        *bucket = Value::Object(wrapped);
    }
    if let Value::Object(bucket) = bucket {
        for (key, value) in stale {
            log::info!(
                "Config key '{}' is no longer used, moved to '{}'",
                key,
                DEPRECATED_KEY
            );
            bucket.insert(key, value);
        }
    }
    kept
}
