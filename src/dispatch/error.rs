//! Typed error variants for a dispatch run.

use shader_deliver_catalog::CatalogError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The shader list could not be created or loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The external compiler process could not be started.
    #[error("Failed to start shader compiler '{}': {source}", .compiler.display())]
    Spawn {
        compiler: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compiler reported failure and exit-status checking is enabled.
    #[error("Shader compiler failed for '{shader}' ({})", describe_exit(.exit_code))]
    CompilerExit {
        shader: String,
        /// `None` when the process was terminated by a signal
        exit_code: Option<i32>,
    },

    /// The compiled artifact is missing or could not be copied into the mod tree.
    #[error("Failed to deploy '{}' to '{}': {source}", .from.display(), .to.display())]
    DeployCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DispatchError {
    /// Failures scoped to one shader; everything else affects the whole run.
    pub fn is_job_failure(&self) -> bool {
        matches!(
            self,
            DispatchError::CompilerExit { .. } | DispatchError::DeployCopy { .. }
        )
    }
}

pub(crate) fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
