//! Build dispatch: filters the shader list, runs the compiler for every
//! enabled shader and deploys the compiled artifacts into the mod tree.
//!
//! Buckets are visited in stored order. Only the `20b` and `30` buckets are
//! buildable; the first bucket outside that set ends the run, and the
//! buckets after it are not visited.

mod compiler;
mod deploy;
mod error;
mod job;

pub use compiler::{CompileOutcome, ProcessCompiler, ShaderCompiler};
pub use deploy::deploy_artifact;
pub use error::DispatchError;
pub use job::{BuildJob, DispatchSettings, FailurePolicy, artifact_path};

use shader_deliver_catalog::{CatalogDocument, ShaderCatalog};
use std::path::Path;

/// Buckets the compiler can build, in no particular order.
pub const SUPPORTED_VERSIONS: [&str; 2] = ["20b", "30"];

pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}

/// A shader whose job failed under [`FailurePolicy::KeepGoing`].
#[derive(Debug)]
pub struct JobFailure {
    pub version: String,
    pub name: String,
    pub error: DispatchError,
}

/// Summary of a completed dispatch run.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// `(version, name)` of every deployed shader, in dispatch order
    pub deployed: Vec<(String, String)>,
    /// Disabled records that were passed over
    pub skipped: usize,
    pub failures: Vec<JobFailure>,
    /// The unsupported bucket that ended the run early, if any
    pub stopped_at: Option<String>,
}

impl DispatchReport {
    /// True when no job failed. An early stop is not a failure.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives compilation and deployment of the enabled shaders.
pub struct BuildDispatcher<C: ShaderCompiler> {
    settings: DispatchSettings,
    compiler: C,
}

impl<C: ShaderCompiler> BuildDispatcher<C> {
    pub fn new(settings: DispatchSettings, compiler: C) -> Self {
        Self { settings, compiler }
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Load the shader list (scanning `scan_root` first if there is none)
    /// and dispatch it.
    pub fn run(
        &mut self,
        catalog: &ShaderCatalog,
        scan_root: &Path,
    ) -> Result<DispatchReport, DispatchError> {
        catalog.create_if_absent(scan_root)?;
        let doc = catalog.load()?;
        self.dispatch(&doc)
    }

    /// Build and deploy every enabled shader in `doc`.
    ///
    /// Under [`FailurePolicy::Abort`] the first failing job is returned as the
    /// error. Under [`FailurePolicy::KeepGoing`] per-shader failures are
    /// collected in the report; a compiler that cannot be started still ends
    /// the run.
    pub fn dispatch(&mut self, doc: &CatalogDocument) -> Result<DispatchReport, DispatchError> {
        let mut report = DispatchReport::default();

        for bucket in &doc.buckets {
            if !is_supported_version(&bucket.version) {
                log::warn!(
                    "Unsupported shader version {:?}, stopping shader dispatch",
                    bucket.version
                );
                report.stopped_at = Some(bucket.version.clone());
                break;
            }

            for record in &bucket.shaders {
                if !record.enabled {
                    log::debug!("Skipping disabled shader {}", record.name);
                    report.skipped += 1;
                    continue;
                }

                let job = BuildJob::new(&self.settings, &bucket.version, record);
                match self.build(&job) {
                    Ok(()) => report
                        .deployed
                        .push((bucket.version.clone(), record.name.clone())),
                    Err(error)
                        if error.is_job_failure()
                            && self.settings.failure_policy == FailurePolicy::KeepGoing =>
                    {
                        log::error!("{error}");
                        report.failures.push(JobFailure {
                            version: bucket.version.clone(),
                            name: record.name.clone(),
                            error,
                        });
                    }
                    Err(error) => return Err(error),
                }
            }
        }

        log::info!(
            "Dispatch finished: {} deployed, {} skipped, {} failed",
            report.deployed.len(),
            report.skipped,
            report.failures.len()
        );
        Ok(report)
    }

    fn build(&mut self, job: &BuildJob) -> Result<(), DispatchError> {
        log::info!("{}", job.banner());
        let outcome = self.compiler.compile(job)?;
        if outcome.succeeded() {
            log::debug!("Compiler finished for {}", job.name);
        } else if self.settings.check_exit_status {
            return Err(DispatchError::CompilerExit {
                shader: job.name.clone(),
                exit_code: outcome.exit_code,
            });
        } else {
            log::warn!("Compiler {} for {}", outcome.describe(), job.name);
        }

        log::info!(
            "Copy shader {} to game dir {}",
            job.name,
            job.destination_artifact.display()
        );
        deploy_artifact(&job.source_artifact, &job.destination_artifact)?;
        success!("Shader {} deployed", job.name);
        Ok(())
    }
}
