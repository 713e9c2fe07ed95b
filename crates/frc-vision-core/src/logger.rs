//! Run logger for the vision processes.
//!
//! Records are formatted as `[elapsed LEVEL target] message`, where `elapsed`
//! counts seconds since the logger was installed. [`init_to_dir`] sends every
//! record to a per-run log file and repeats warnings and errors on stderr.

use std::fs::{self, File};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read by [`init_from_env`].
pub const LOG_ENV_VAR: &str = "FRC_VISION_LOG";

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("cannot create log file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("a logger is already installed")]
    AlreadyInstalled,
    #[error(transparent)]
    SetLogger(#[from] log::SetLoggerError),
}

enum Sink {
    Stderr,
    File(Mutex<LineWriter<File>>),
}

struct RunLogger {
    level: LevelFilter,
    started: Instant,
    sink: Sink,
}

impl RunLogger {
    fn new(level: LevelFilter, sink: Sink) -> Self {
        Self {
            level,
            started: Instant::now(),
            sink,
        }
    }

    fn line(&self, record: &Record) -> String {
        format!(
            "[{:8.3}s {:>5} {}] {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for RunLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.line(record);
        match &self.sink {
            Sink::Stderr => {
                let _ = writeln!(std::io::stderr().lock(), "{line}");
            }
            Sink::File(file) => {
                let _ = writeln!(file.lock(), "{line}");
                if record.level() <= Level::Warn {
                    let _ = writeln!(std::io::stderr().lock(), "{line}");
                }
            }
        }
    }

    fn flush(&self) {
        if let Sink::File(file) = &self.sink {
            let _ = file.lock().flush();
        }
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<RunLogger> = OnceLock::new();

/// Returns `false` when another logger got there first.
fn install(logger: RunLogger) -> Result<bool, log::SetLoggerError> {
    let mut fresh = false;
    let installed = LOGGER.get_or_init(|| {
        fresh = true;
        logger
    });
    if !fresh {
        return Ok(false);
    }
    log::set_logger(installed)?;
    log::set_max_level(installed.level);
    Ok(true)
}

/// Install the stderr logger with the given level filter.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    install(RunLogger::new(level, Sink::Stderr)).map(|_| ())
}

/// Install the stderr logger using the level named in `FRC_VISION_LOG`,
/// falling back to `default` when unset or unparsable.
pub fn init_from_env(default: LevelFilter) -> Result<(), log::SetLoggerError> {
    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|raw| LevelFilter::from_str(raw.trim()).ok())
        .unwrap_or(default);
    init_with_level(level)
}

/// `<dir>/<prefix>_<unix seconds>.txt`.
pub fn run_log_path(dir: &Path, prefix: &str, at: SystemTime) -> PathBuf {
    let secs = at.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    dir.join(format!("{prefix}_{secs}.txt"))
}

fn open_run_log(dir: &Path, prefix: &str) -> Result<(PathBuf, File), LoggerError> {
    let path = run_log_path(dir, prefix, SystemTime::now());
    let file = fs::create_dir_all(dir)
        .and_then(|()| File::create(&path))
        .map_err(|source| LoggerError::CreateFile {
            path: path.clone(),
            source,
        })?;
    Ok((path, file))
}

/// Open a fresh log file under `dir` and install the logger on it. Returns
/// the file's path. Fails if any logger is already installed.
pub fn init_to_dir(
    dir: impl AsRef<Path>,
    prefix: &str,
    level: LevelFilter,
) -> Result<PathBuf, LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInstalled);
    }
    let (path, file) = open_run_log(dir.as_ref(), prefix)?;
    if !install(RunLogger::new(level, Sink::File(Mutex::new(LineWriter::new(file)))))? {
        return Err(LoggerError::AlreadyInstalled);
    }
    log::info!("logging to {}", path.display());
    Ok(path)
}

/// Install a `tracing` subscriber honoring `RUST_LOG` (default `info`).
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
