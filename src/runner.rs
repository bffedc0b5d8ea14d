//! Top-level run: loads the configuration, executes the chosen command and
//! decides the process exit code.

use crate::cli::{BuildArgs, Cli, Commands};
use crate::dispatch::{
    BuildDispatcher, DispatchReport, DispatchSettings, FailurePolicy, ProcessCompiler,
    ShaderCompiler, is_supported_version,
};
use anyhow::Context;
use shader_deliver_catalog::{CatalogDocument, ShaderCatalog};
use shader_deliver_config::{ConfigStore, Configuration};
use std::io::{self, Write};

/// How a run that did not hit a fatal error ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// At least one shader failed under `--keep-going`
    JobsFailed,
}

/// Run the command line with the real compiler process.
pub fn run(cli: &Cli) -> anyhow::Result<RunStatus> {
    run_with(cli, ProcessCompiler)
}

/// Run the command line with the given compiler.
pub fn run_with<C: ShaderCompiler>(cli: &Cli, compiler: C) -> anyhow::Result<RunStatus> {
    let store = ConfigStore::new(&cli.config);
    let config = store
        .load()
        .with_context(|| format!("Unable to load configuration {:?}", store.path()))?;
    let catalog = ShaderCatalog::new(&cli.catalog);

    match cli.command_or_default() {
        Commands::Build(args) => build(cli, &config, &catalog, &args, compiler),
        Commands::Scan { force } => {
            if force {
                catalog.regenerate(&cli.scan_root)?;
                success!("Shader list regenerated: {:?}", catalog.path());
            } else if !catalog.create_if_absent(&cli.scan_root)? {
                log::info!(
                    "Shader list {:?} already exists, use --force to rescan",
                    catalog.path()
                );
            }
            Ok(RunStatus::Completed)
        }
        Commands::List => {
            let doc = catalog.load()?;
            write_listing(&doc, &mut io::stdout().lock())?;
            Ok(RunStatus::Completed)
        }
    }
}

fn build<C: ShaderCompiler>(
    cli: &Cli,
    config: &Configuration,
    catalog: &ShaderCatalog,
    args: &BuildArgs,
    compiler: C,
) -> anyhow::Result<RunStatus> {
    let policy = if args.keep_going {
        FailurePolicy::KeepGoing
    } else {
        FailurePolicy::Abort
    };
    let settings = DispatchSettings::from_config(config)
        .with_failure_policy(policy)
        .with_exit_status_check(args.check_exit_status);

    log::info!("Shader compiler: {}", config.compiler_path().display());
    let mut dispatcher = BuildDispatcher::new(settings, compiler);
    let report = dispatcher.run(catalog, &cli.scan_root)?;
    Ok(summarize(&report))
}

fn summarize(report: &DispatchReport) -> RunStatus {
    if report.is_success() {
        success!("Done, {} shaders deployed", report.deployed.len());
        return RunStatus::Completed;
    }

    for failure in &report.failures {
        log::error!("{} ({}): {}", failure.name, failure.version, failure.error);
    }
    log::error!(
        "{} of {} shaders failed",
        report.failures.len(),
        report.failures.len() + report.deployed.len()
    );
    RunStatus::JobsFailed
}

/// Exit code for a finished run: `0` only when everything succeeded.
pub fn exit_code(result: &anyhow::Result<RunStatus>) -> i32 {
    match result {
        Ok(RunStatus::Completed) => 0,
        Ok(RunStatus::JobsFailed) => 1,
        Err(e) => {
            log::error!("{e:#}");
            1
        }
    }
}

/// Human-readable dump of the shader list.
pub fn write_listing(doc: &CatalogDocument, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{} shaders, {} enabled",
        doc.shaders_count,
        doc.enabled_count()
    )?;
    for bucket in &doc.buckets {
        let note = if is_supported_version(&bucket.version) {
            ""
        } else {
            " (not buildable)"
        };
        writeln!(out, "[{}]{note}", bucket.version)?;
        for record in &bucket.shaders {
            writeln!(
                out,
                "  {:<48} enabled={:<5} dynamic={}",
                record.name, record.enabled, record.dynamic
            )?;
        }
    }
    Ok(())
}
