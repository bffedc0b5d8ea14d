//! Console logger for shader-deliver.
//!
//! Installs a `log::Log` implementation that writes one colored line per
//! record to stderr:
//! - error: red
//! - warn: yellow
//! - info with the `success` target (see [`success!`]): green
//! - info: plain
//! - debug/trace: bright white
//!
//! Color is turned off when `NO_COLOR` is set or stderr is not a terminal.
//! When a log file is given, every record is mirrored there with a timestamp.

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::OnceLock;

/// Target used by [`success!`] to mark a record for green output.
pub const SUCCESS_TARGET: &str = "success";

const RED: &str = "\x1b[91m";
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const BRIGHT_WHITE: &str = "\x1b[97m";
const RESET: &str = "\x1b[0m";

struct ConsoleLogger {
    level: LevelFilter,
    color: bool,
    file: Option<Mutex<File>>,
}

static LOGGER: OnceLock<ConsoleLogger> = OnceLock::new();

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        let line = match color_for(record.level(), record.target()) {
            Some(color) if self.color => format!("{color}{message}{RESET}"),
            _ => message.clone(),
        };
        eprintln!("{line}");

        if let Some(file) = &self.file {
            let mut file = file.lock();
            let _ = writeln!(
                file,
                "[{}] [{:<5}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            );
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            let _ = file.lock().flush();
        }
    }
}

fn color_for(level: Level, target: &str) -> Option<&'static str> {
    match level {
        Level::Error => Some(RED),
        Level::Warn => Some(YELLOW),
        Level::Info if target == SUCCESS_TARGET => Some(GREEN),
        Level::Info => None,
        Level::Debug | Level::Trace => Some(BRIGHT_WHITE),
    }
}

/// Level from `RUST_LOG`, read as a plain level name such as `debug`.
pub fn level_from_env() -> Option<LevelFilter> {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.trim().parse::<LevelFilter>().ok())
}

/// Whether stderr output should carry ANSI color codes.
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

/// Install the global logger.
///
/// `level` wins over `RUST_LOG`, which wins over `info`. Calling this more than
/// once keeps the first logger.
pub fn init(level: Option<LevelFilter>, log_file: Option<&Path>) -> std::io::Result<()> {
    let level = level.or_else(level_from_env).unwrap_or(LevelFilter::Info);

    let file = match log_file {
        Some(path) => Some(Mutex::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        )),
        None => None,
    };

    let logger = LOGGER.get_or_init(|| ConsoleLogger {
        level,
        color: color_enabled(),
        file,
    });

    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }
    Ok(())
}

/// Log a success message: info level, painted green on the console.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        log::info!(target: $crate::debug::SUCCESS_TARGET, $($arg)*)
    };
}
