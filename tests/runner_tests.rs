//! End-to-end runs of the command line against temp directories.

use clap::Parser;
use serde_json::json;
use shader_deliver::cli::Cli;
use shader_deliver::dispatch::{BuildJob, CompileOutcome, DispatchError, ShaderCompiler};
use shader_deliver::runner::{self, RunStatus};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Writes the expected artifact for every job except `skip`.
struct FakeCompiler {
    skip: Option<&'static str>,
}

impl ShaderCompiler for FakeCompiler {
    fn compile(&mut self, job: &BuildJob) -> Result<CompileOutcome, DispatchError> {
        if self.skip != Some(job.name.as_str()) {
            fs::create_dir_all(job.source_artifact.parent().unwrap()).unwrap();
            fs::write(&job.source_artifact, b"vcs").unwrap();
        }
        Ok(CompileOutcome::success())
    }
}

fn write_config(dir: &Path) {
    let config = json!({
        "conf-version": 2.1,
        "dir-src": dir.join("src").to_string_lossy(),
        "dir-shaders": dir.join("src/shaders").to_string_lossy(),
        "dir-mod": dir.join("mod").to_string_lossy(),
        "threads": 2,
        "shader-compiler": "devtools/bin/ShaderCompile.exe",
        "shader-force-dynamic": false,
    });
    fs::write(
        dir.join("_shader_conf.json"),
        serde_json::to_string_pretty(&config).unwrap(),
    )
    .unwrap();
}

fn write_catalog(dir: &Path) {
    let catalog = json!({
        "shaders_count": 2,
        "shaders": {
            "30": {
                "broken_ps30": { "raw_name": "broken_ps30.fxc", "raw_dir": "/s", "dynamic": false, "enabled": true },
                "water_ps30": { "raw_name": "water_ps30.fxc", "raw_dir": "/s", "dynamic": false, "enabled": true }
            }
        }
    });
    fs::write(
        dir.join("_shaders_list.json"),
        serde_json::to_string_pretty(&catalog).unwrap(),
    )
    .unwrap();
}

fn cli(dir: &Path, extra: &[&str]) -> Cli {
    let config = dir.join("_shader_conf.json");
    let catalog = dir.join("_shaders_list.json");
    let mut args = vec![
        "shader-deliver".to_string(),
        "--config".to_string(),
        config.to_string_lossy().into_owned(),
        "--catalog".to_string(),
        catalog.to_string_lossy().into_owned(),
        "--scan-root".to_string(),
        dir.to_string_lossy().into_owned(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::parse_from(args)
}

#[test]
fn test_build_deploys_and_exits_zero() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_config(temp_dir.path());
    write_catalog(temp_dir.path());
    let compiler = FakeCompiler { skip: None };

    let result = runner::run_with(&cli(temp_dir.path(), &[]), compiler);
    assert_eq!(result.as_ref().unwrap(), &RunStatus::Completed);
    assert_eq!(runner::exit_code(&result), 0);
    assert!(temp_dir.path().join("mod/shaders/fxc/water_ps30.vcs").exists());
}

#[test]
fn test_keep_going_failure_exits_non_zero() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_config(temp_dir.path());
    write_catalog(temp_dir.path());
    let compiler = FakeCompiler { skip: Some("broken_ps30") };

    let result = runner::run_with(
        &cli(temp_dir.path(), &["build", "--keep-going"]),
        compiler,
    );
    assert_eq!(result.as_ref().unwrap(), &RunStatus::JobsFailed);
    assert_eq!(runner::exit_code(&result), 1);
    assert!(temp_dir.path().join("mod/shaders/fxc/water_ps30.vcs").exists());
}

#[test]
fn test_abort_failure_is_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_config(temp_dir.path());
    write_catalog(temp_dir.path());
    let compiler = FakeCompiler { skip: Some("broken_ps30") };

    let result = runner::run_with(&cli(temp_dir.path(), &["build"]), compiler);
    assert!(result.is_err());
    assert_eq!(runner::exit_code(&result), 1);
    assert!(!temp_dir.path().join("mod/shaders/fxc/water_ps30.vcs").exists());
}

#[test]
fn test_first_run_creates_config_and_catalog() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(temp_dir.path().join("stdshaders")).unwrap();
    fs::write(temp_dir.path().join("stdshaders/water_ps30.fxc"), "").unwrap();
    let compiler = FakeCompiler { skip: None };

    let result = runner::run_with(&cli(temp_dir.path(), &["scan"]), compiler);
    assert_eq!(result.unwrap(), RunStatus::Completed);

    let config = fs::read_to_string(temp_dir.path().join("_shader_conf.json")).unwrap();
    assert!(config.contains("\"conf-version\": 2.1"));
    let catalog = fs::read_to_string(temp_dir.path().join("_shaders_list.json")).unwrap();
    assert!(catalog.contains("water_ps30.fxc"));
}

#[test]
fn test_invalid_config_is_fatal() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("_shader_conf.json"), "{ not json").unwrap();
    let compiler = FakeCompiler { skip: None };

    let result = runner::run_with(&cli(temp_dir.path(), &["list"]), compiler);
    let err = result.as_ref().unwrap_err();
    assert!(format!("{err:#}").contains("not valid JSON"));
    assert_eq!(runner::exit_code(&result), 1);
}
