//! Invocation of the external shader compiler.

use super::error::{DispatchError, describe_exit};
use super::job::BuildJob;
use std::process::Command;

/// Result of one compiler invocation that did start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOutcome {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CompileOutcome {
    pub fn success() -> Self {
        Self { exit_code: Some(0) }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn describe(&self) -> String {
        describe_exit(&self.exit_code)
    }
}

/// Runs a build job to completion.
///
/// Implementations must block until the compiler exits. Only a failure to
/// start the compiler is an error here; exit-status policy belongs to the
/// dispatcher.
pub trait ShaderCompiler {
    fn compile(&mut self, job: &BuildJob) -> Result<CompileOutcome, DispatchError>;
}

/// Spawns the configured compiler executable as a child process.
///
/// Standard output and error are inherited so the compiler's own progress
/// reaches the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCompiler;

impl ShaderCompiler for ProcessCompiler {
    fn compile(&mut self, job: &BuildJob) -> Result<CompileOutcome, DispatchError> {
        log::debug!("Running: {}", job.command_line());
        let status = Command::new(&job.compiler)
            .args(&job.args)
            .status()
            .map_err(|source| DispatchError::Spawn {
                compiler: job.compiler.clone(),
                source,
            })?;
        Ok(CompileOutcome {
            exit_code: status.code(),
        })
    }
}
