//! Tests for the build dispatcher, driven through a recording compiler.

use shader_deliver::dispatch::{
    BuildDispatcher, BuildJob, CompileOutcome, DispatchError, DispatchSettings, FailurePolicy,
    ShaderCompiler,
};
use shader_deliver_catalog::{CatalogDocument, ShaderCatalog, ShaderRecord};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Captures every job and writes the artifact the real compiler would.
#[derive(Default)]
struct RecordingCompiler {
    jobs: Vec<BuildJob>,
    /// Shaders that "compile" without producing an artifact
    no_artifact: HashSet<String>,
    exit_code: Option<i32>,
    fail_to_start: bool,
}

impl RecordingCompiler {
    fn new() -> Self {
        Self {
            exit_code: Some(0),
            ..Default::default()
        }
    }

    fn names(&self) -> Vec<&str> {
        self.jobs.iter().map(|j| j.name.as_str()).collect()
    }
}

impl ShaderCompiler for RecordingCompiler {
    fn compile(&mut self, job: &BuildJob) -> Result<CompileOutcome, DispatchError> {
        if self.fail_to_start {
            return Err(DispatchError::Spawn {
                compiler: job.compiler.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no compiler"),
            });
        }
        self.jobs.push(job.clone());
        if !self.no_artifact.contains(&job.name) {
            fs::create_dir_all(job.source_artifact.parent().unwrap()).unwrap();
            fs::write(&job.source_artifact, format!("compiled {}", job.name)).unwrap();
        }
        Ok(CompileOutcome {
            exit_code: self.exit_code,
        })
    }
}

struct Workspace {
    _temp_dir: TempDir,
    shaders_root: PathBuf,
    mod_root: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let shaders_root = temp_dir.path().join("src/shaders");
        let mod_root = temp_dir.path().join("game/mod");
        Self {
            _temp_dir: temp_dir,
            shaders_root,
            mod_root,
        }
    }

    fn settings(&self) -> DispatchSettings {
        DispatchSettings {
            src_root: "/opt/src".to_string(),
            shaders_root: self.shaders_root.clone(),
            mod_root: self.mod_root.clone(),
            compiler_rel_path: "devtools/bin/ShaderCompile.exe".to_string(),
            threads: 4,
            force_dynamic: false,
            failure_policy: FailurePolicy::Abort,
            check_exit_status: false,
        }
    }

    fn deployed(&self, name: &str) -> PathBuf {
        self.mod_root
            .join("shaders")
            .join("fxc")
            .join(format!("{name}.vcs"))
    }
}

fn record(name: &str, enabled: bool) -> ShaderRecord {
    let mut record = ShaderRecord::new(name, format!("{name}.fxc"), "/opt/src/stdshaders");
    record.enabled = enabled;
    record
}

fn document(entries: &[(&str, &str, bool)]) -> CatalogDocument {
    let mut doc = CatalogDocument::default();
    for (version, name, enabled) in entries {
        doc.insert(version, record(name, *enabled));
    }
    doc.shaders_count = doc.record_count();
    doc
}

#[test]
fn test_no_enabled_records_means_no_invocations() {
    let ws = Workspace::new();
    let doc = document(&[
        ("20b", "water_ps20b", false),
        ("30", "water_ps30", false),
    ]);

    let mut dispatcher = BuildDispatcher::new(ws.settings(), RecordingCompiler::new());
    let report = dispatcher.dispatch(&doc).unwrap();

    assert!(dispatcher.compiler().jobs.is_empty());
    assert_eq!(report.skipped, 2);
    assert!(report.deployed.is_empty());
    assert!(report.is_success());
}

#[test]
fn test_builds_and_deploys_enabled_records_in_order() {
    let ws = Workspace::new();
    let doc = document(&[
        ("30", "skin_ps30", true),
        ("30", "disabled_ps30", false),
        ("20b", "skin_vs20b", true),
    ]);

    let mut dispatcher = BuildDispatcher::new(ws.settings(), RecordingCompiler::new());
    let report = dispatcher.dispatch(&doc).unwrap();

    assert_eq!(dispatcher.compiler().names(), vec!["skin_ps30", "skin_vs20b"]);
    assert_eq!(
        report.deployed,
        vec![
            ("30".to_string(), "skin_ps30".to_string()),
            ("20b".to_string(), "skin_vs20b".to_string()),
        ]
    );
    assert_eq!(report.skipped, 1);
    assert_eq!(
        fs::read_to_string(ws.deployed("skin_ps30")).unwrap(),
        "compiled skin_ps30"
    );
    assert!(ws.deployed("skin_vs20b").exists());
    assert!(!ws.deployed("disabled_ps30").exists());

    let job = &dispatcher.compiler().jobs[0];
    assert_eq!(job.threads, 4);
    assert_eq!(
        job.compiler,
        PathBuf::from("/opt/src/devtools/bin/ShaderCompile.exe")
    );
    assert_eq!(
        job.args,
        vec![
            "-threads",
            "4",
            "-ver",
            "30",
            "-shaderpath",
            "/opt/src/stdshaders",
            "skin_ps30.fxc",
        ]
    );
}

#[test]
fn test_unsupported_bucket_stops_the_run() {
    let ws = Workspace::new();
    let doc = document(&[
        ("30", "first_ps30", true),
        ("other", "debug_overlay", true),
        ("20b", "late_vs20b", true),
    ]);

    let mut dispatcher = BuildDispatcher::new(ws.settings(), RecordingCompiler::new());
    let report = dispatcher.dispatch(&doc).unwrap();

    assert_eq!(dispatcher.compiler().names(), vec!["first_ps30"]);
    assert_eq!(report.stopped_at.as_deref(), Some("other"));
    assert!(report.is_success());
    assert!(!ws.deployed("late_vs20b").exists());
}

#[test]
fn test_force_dynamic_applies_to_static_records() {
    let ws = Workspace::new();
    let doc = document(&[("30", "skin_ps30", true)]);
    let settings = DispatchSettings {
        force_dynamic: true,
        ..ws.settings()
    };

    let mut dispatcher = BuildDispatcher::new(settings, RecordingCompiler::new());
    dispatcher.dispatch(&doc).unwrap();

    let job = &dispatcher.compiler().jobs[0];
    assert!(job.dynamic);
    assert!(job.args.iter().any(|a| a == "-dynamic"));
}

#[test]
fn test_missing_artifact_aborts_by_default() {
    let ws = Workspace::new();
    let doc = document(&[("30", "broken_ps30", true), ("30", "fine_ps30", true)]);
    let mut compiler = RecordingCompiler::new();
    compiler.no_artifact.insert("broken_ps30".to_string());

    let mut dispatcher = BuildDispatcher::new(ws.settings(), compiler);
    let err = dispatcher.dispatch(&doc).unwrap_err();

    assert!(matches!(err, DispatchError::DeployCopy { .. }), "got {err:?}");
    assert_eq!(dispatcher.compiler().names(), vec!["broken_ps30"]);
    assert!(!ws.deployed("fine_ps30").exists());
}

#[test]
fn test_keep_going_collects_failures() {
    let ws = Workspace::new();
    let doc = document(&[("30", "broken_ps30", true), ("30", "fine_ps30", true)]);
    let mut compiler = RecordingCompiler::new();
    compiler.no_artifact.insert("broken_ps30".to_string());
    let settings = ws.settings().with_failure_policy(FailurePolicy::KeepGoing);

    let mut dispatcher = BuildDispatcher::new(settings, compiler);
    let report = dispatcher.dispatch(&doc).unwrap();

    assert_eq!(dispatcher.compiler().names(), vec!["broken_ps30", "fine_ps30"]);
    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "broken_ps30");
    assert!(matches!(
        report.failures[0].error,
        DispatchError::DeployCopy { .. }
    ));
    assert!(ws.deployed("fine_ps30").exists());
}

#[test]
fn test_exit_status_is_ignored_unless_checked() {
    let ws = Workspace::new();
    let doc = document(&[("30", "skin_ps30", true)]);
    let mut compiler = RecordingCompiler::new();
    compiler.exit_code = Some(1);

    let mut dispatcher = BuildDispatcher::new(ws.settings(), compiler);
    let report = dispatcher.dispatch(&doc).unwrap();
    assert!(report.is_success());
    assert!(ws.deployed("skin_ps30").exists());
}

#[test]
fn test_checked_exit_status_fails_the_job() {
    let ws = Workspace::new();
    let doc = document(&[("30", "skin_ps30", true)]);
    let mut compiler = RecordingCompiler::new();
    compiler.exit_code = Some(2);
    let settings = ws.settings().with_exit_status_check(true);

    let mut dispatcher = BuildDispatcher::new(settings, compiler);
    let err = dispatcher.dispatch(&doc).unwrap_err();

    match err {
        DispatchError::CompilerExit { shader, exit_code } => {
            assert_eq!(shader, "skin_ps30");
            assert_eq!(exit_code, Some(2));
        }
        other => panic!("expected CompilerExit, got {other:?}"),
    }
    assert!(!ws.deployed("skin_ps30").exists());
}

#[test]
fn test_spawn_failure_is_fatal_even_when_keeping_going() {
    let ws = Workspace::new();
    let doc = document(&[("30", "a_ps30", true), ("30", "b_ps30", true)]);
    let compiler = RecordingCompiler {
        fail_to_start: true,
        ..RecordingCompiler::new()
    };
    let settings = ws.settings().with_failure_policy(FailurePolicy::KeepGoing);

    let mut dispatcher = BuildDispatcher::new(settings, compiler);
    let err = dispatcher.dispatch(&doc).unwrap_err();
    assert!(matches!(err, DispatchError::Spawn { .. }), "got {err:?}");
}

#[test]
fn test_run_scans_when_catalog_is_missing() {
    let ws = Workspace::new();
    let sources = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(sources.path().join("stdshaders")).unwrap();
    fs::write(sources.path().join("stdshaders/water_ps30.fxc"), "").unwrap();
    let out = TempDir::new().expect("Failed to create temp dir");
    let catalog = ShaderCatalog::new(out.path().join("_shaders_list.json"));

    let mut dispatcher = BuildDispatcher::new(ws.settings(), RecordingCompiler::new());
    let report = dispatcher.run(&catalog, sources.path()).unwrap();

    assert!(catalog.exists());
    // Freshly scanned shaders are disabled.
    assert!(dispatcher.compiler().jobs.is_empty());
    assert_eq!(report.skipped, 1);
}
