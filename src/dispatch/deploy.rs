//! Copying compiled artifacts into the mod tree.

use super::error::DispatchError;
use std::fs;
use std::io;
use std::path::Path;

/// Copy `from` to `to`, creating the destination directory when needed.
pub fn deploy_artifact(from: &Path, to: &Path) -> Result<(), DispatchError> {
    let copy_err = |source| DispatchError::DeployCopy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if !from.is_file() {
        return Err(copy_err(io::Error::new(
            io::ErrorKind::NotFound,
            "compiled artifact not found",
        )));
    }

    if let Some(parent) = to.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(copy_err)?;
    }

    fs::copy(from, to).map_err(copy_err)?;
    log::debug!("Copied {} -> {}", from.display(), to.display());
    Ok(())
}
