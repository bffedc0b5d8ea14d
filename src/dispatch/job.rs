//! Per-shader build jobs and the settings they are derived from.

use shader_deliver_catalog::ShaderRecord;
use shader_deliver_config::{Configuration, resolve_compiler_path};
use std::path::{Path, PathBuf};

/// Directory, relative to the shader and mod roots, holding compiled artifacts.
const ARTIFACT_DIR: [&str; 2] = ["shaders", "fxc"];

/// What to do when one shader fails to compile or deploy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run at the first failing shader
    #[default]
    Abort,
    /// Record the failure, continue with the next shader, fail the run at the end
    KeepGoing,
}

/// Everything the dispatcher needs from the configuration, plus run options.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub src_root: String,
    pub shaders_root: PathBuf,
    pub mod_root: PathBuf,
    /// Compiler executable relative to `src_root`
    pub compiler_rel_path: String,
    /// Forwarded to the compiler as `-threads`
    pub threads: u32,
    pub force_dynamic: bool,
    pub failure_policy: FailurePolicy,
    /// Treat a non-zero compiler exit as a failed shader
    pub check_exit_status: bool,
}

impl DispatchSettings {
    pub fn from_config(config: &Configuration) -> Self {
        Self {
            src_root: config.dir_src.clone(),
            shaders_root: config.shaders_root(),
            mod_root: config.mod_root(),
            compiler_rel_path: config.shader_compiler.clone(),
            threads: config.threads,
            force_dynamic: config.force_dynamic,
            failure_policy: FailurePolicy::default(),
            check_exit_status: false,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_exit_status_check(mut self, enabled: bool) -> Self {
        self.check_exit_status = enabled;
        self
    }

    /// `src_root + "/" + compiler_rel_path`
    pub fn compiler_path(&self) -> PathBuf {
        resolve_compiler_path(&self.src_root, &self.compiler_rel_path)
    }
}

/// Location of `<name>.vcs` under a shader or mod root.
pub fn artifact_path(root: &Path, name: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    path.extend(ARTIFACT_DIR);
    path.push(format!("{name}.vcs"));
    path
}

/// One compile-and-deploy unit. Built at dispatch time, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildJob {
    pub name: String,
    pub version: String,
    /// Global force-dynamic OR the shader's own flag
    pub dynamic: bool,
    /// Forwarded to the compiler as `-threads`
    pub threads: u32,
    pub compiler: PathBuf,
    pub args: Vec<String>,
    pub source_artifact: PathBuf,
    pub destination_artifact: PathBuf,
}

impl BuildJob {
    pub fn new(settings: &DispatchSettings, version: &str, record: &ShaderRecord) -> Self {
        let dynamic = settings.force_dynamic || record.dynamic;

        let mut args = vec![
            "-threads".to_string(),
            settings.threads.to_string(),
            "-ver".to_string(),
            version.to_string(),
        ];
        if dynamic {
            args.push("-dynamic".to_string());
        }
        args.extend([
            "-shaderpath".to_string(),
            record.raw_dir.clone(),
            record.raw_name.clone(),
        ]);

        Self {
            name: record.name.clone(),
            version: version.to_string(),
            dynamic,
            threads: settings.threads,
            compiler: settings.compiler_path(),
            args,
            source_artifact: artifact_path(&settings.shaders_root, &record.name),
            destination_artifact: artifact_path(&settings.mod_root, &record.name),
        }
    }

    /// One-line summary of what is about to be built, for the console.
    pub fn banner(&self) -> String {
        format!(
            "Building shader {} (ver {}, threads {}, {}) with {}",
            self.name,
            self.version,
            self.threads,
            if self.dynamic { "dynamic" } else { "static" },
            self.compiler.display()
        )
    }

    /// The invocation as a single display string, for logs.
    pub fn command_line(&self) -> String {
        let mut line = self.compiler.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}
