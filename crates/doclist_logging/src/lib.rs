#![deny(missing_docs)]
//! Logging for the doclist workspace.
//!
//! Every crate logs through the `doclist_*` macros, which forward to the
//! `log` facade. Binaries pick where records go with [`LogDestination`] and
//! call [`initialize`] once; tests call [`initialize_for_tests`].

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    TestLogger, WriteLogger,
};

/// Default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE: &str = "./doclist.log";

/// Environment variable holding a level name (`error` … `trace`, or `off`).
pub const LEVEL_ENV: &str = "DOCLIST_LOG";

/// Trace-level record through the `log` facade.
#[macro_export]
macro_rules! doclist_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Debug-level record through the `log` facade.
#[macro_export]
macro_rules! doclist_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Info-level record through the `log` facade.
#[macro_export]
macro_rules! doclist_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Warn-level record through the `log` facade.
#[macro_export]
macro_rules! doclist_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Error-level record through the `log` facade.
#[macro_export]
macro_rules! doclist_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// A file, truncated on start.
    File(PathBuf),
    /// Stderr, so stdout stays free for program output.
    Terminal,
    /// A file and stderr.
    Both(PathBuf),
}

impl Default for LogDestination {
    fn default() -> Self {
        LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE))
    }
}

impl LogDestination {
    /// The default log file, optionally mirrored on stderr.
    pub fn default_file(mirror_to_terminal: bool) -> Self {
        let path = PathBuf::from(DEFAULT_LOG_FILE);
        if mirror_to_terminal {
            LogDestination::Both(path)
        } else {
            LogDestination::File(path)
        }
    }

    /// The log file, if any.
    pub fn file(&self) -> Option<&Path> {
        match self {
            LogDestination::File(path) | LogDestination::Both(path) => Some(path),
            LogDestination::Terminal => None,
        }
    }

    /// Whether records also go to stderr.
    pub fn writes_to_terminal(&self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both(_))
    }
}

/// Level named by [`LEVEL_ENV`], or `default` when unset or unrecognised.
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    parse_level(std::env::var(LEVEL_ENV).ok().as_deref(), default)
}

fn parse_level(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    value
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .unwrap_or(default)
}

/// Installs the global logger.
///
/// A log file that cannot be created is reported on stderr and left out.
/// Does nothing if a logger is already installed.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = record_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.writes_to_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if let Some(path) = destination.file() {
        match open_log_file(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("Warning: could not create log file {:?}: {}", path, err),
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

/// Routes records through the test harness's captured output.
///
/// Safe to call from every test; only the first call installs a logger.
pub fn initialize_for_tests() {
    let level = level_from_env(LevelFilter::Debug);
    let _ = TestLogger::init(level, Config::default());
}

fn record_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}
