//! Command-line interface for shader-deliver.

use clap::{Args, Parser, Subcommand};
use shader_deliver_catalog::SHADER_LIST_FILE_NAME;
use shader_deliver_config::CONFIG_FILE_NAME;
use std::path::PathBuf;

/// shader-deliver - build enabled shaders and deploy them into a mod tree
#[derive(Debug, Parser)]
#[command(name = "shader-deliver")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (created with defaults when missing)
    #[arg(long, value_name = "PATH", default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Shader list file (created by scanning when missing)
    #[arg(long, value_name = "PATH", default_value = SHADER_LIST_FILE_NAME)]
    pub catalog: PathBuf,

    /// Directory searched recursively for shader sources
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub scan_root: PathBuf,

    /// Log level (overrides RUST_LOG)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Also write log lines, with timestamps, to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// The subcommand to run; `build` when none was given.
    pub fn command_or_default(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Build(BuildArgs::default()))
    }
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Compile every enabled shader and deploy it (default)
    Build(BuildArgs),

    /// Create the shader list by scanning for sources
    Scan {
        /// Rescan and overwrite an existing list, discarding edited flags
        #[arg(short, long)]
        force: bool,
    },

    /// Print the shader list with its enabled/dynamic flags
    List,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct BuildArgs {
    /// Continue with the next shader when one fails; exit non-zero at the end
    #[arg(long)]
    pub keep_going: bool,

    /// Treat a non-zero compiler exit status as a failed shader
    #[arg(long)]
    pub check_exit_status: bool,
}
