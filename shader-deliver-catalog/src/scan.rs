//! Recursive discovery of shader sources.

use crate::classify::ShaderModel;
use crate::error::CatalogError;
use crate::model::{CatalogDocument, ShaderRecord};
use std::path::Path;
use walkdir::WalkDir;

/// Extension of shader source files, matched case-insensitively.
pub const SHADER_SOURCE_EXTENSION: &str = "fxc";

/// Walk `root` and build a catalog of every shader source under it.
///
/// Entries are visited in file-name order so the same tree always produces
/// the same document. Every record starts disabled and static. Any directory
/// that cannot be read aborts the scan.
pub fn scan(root: &Path) -> Result<CatalogDocument, CatalogError> {
    let root = std::path::absolute(root).map_err(|source| CatalogError::Scan {
        path: root.to_path_buf(),
        source,
    })?;
    log::info!("Scanning {:?} for *.{} shaders", root, SHADER_SOURCE_EXTENSION);

    let mut doc = CatalogDocument::default();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(|e| CatalogError::Scan {
            path: e.path().unwrap_or(&root).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || !is_shader_source(entry.path()) {
            continue;
        }

        let raw_name = entry.file_name().to_string_lossy().into_owned();
        let name = canonical_name(&raw_name).to_string();
        let raw_dir = entry
            .path()
            .parent()
            .unwrap_or(&root)
            .to_string_lossy()
            .into_owned();
        let model = ShaderModel::classify(&name);

        log::debug!("Found {} shader {} in {}", model, raw_name, raw_dir);
        doc.shaders_count += 1;
        let record = ShaderRecord::new(name, raw_name, raw_dir);
        if let Some(previous) = doc.insert(model.bucket(), record) {
            log::warn!(
                "Duplicate shader name '{}' in bucket {}: {} replaced by a later file",
                previous.name,
                model,
                previous.source_path().display()
            );
        }
    }

    log::info!("Shaders found: {}", doc.shaders_count);
    Ok(doc)
}

fn is_shader_source(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SHADER_SOURCE_EXTENSION))
}

/// Everything before the first `.` of a file name.
pub fn canonical_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name_strips_all_extensions() {
        assert_eq!(canonical_name("water_ps20b.fxc"), "water_ps20b");
        assert_eq!(canonical_name("water_ps20b.backup.fxc"), "water_ps20b");
        assert_eq!(canonical_name("plain"), "plain");
    }

    #[test]
    fn test_is_shader_source() {
        assert!(is_shader_source(Path::new("a/b/water_ps30.fxc")));
        assert!(is_shader_source(Path::new("a/b/WATER_PS30.FXC")));
        assert!(!is_shader_source(Path::new("a/b/water_ps30.vcs")));
        assert!(!is_shader_source(Path::new("a/b/fxc")));
    }
}
