//! Process-wide `tracing` setup: a log file under the XDG state dir, or
//! stderr when that file cannot be opened.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,artifetch=debug,artifetch_core=debug";

/// Where log lines ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Writer that is either a clone of the log file or stderr (when the clone fails).
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct LogFile(fs::File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Path of the log file: `~/.local/state/artifetch/artifetch.log`.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("artifetch")?;
    Ok(xdg_dirs.place_state_file("artifetch.log")?)
}

/// Initialize structured logging to the XDG log file.
/// Returns Err (without installing a subscriber) if the file cannot be opened.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_path()?;
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(LogFile(file)))
        .with_ansi(false)
        .init();

    tracing::info!("artifetch logging initialized at {}", path.display());
    Ok(path)
}

/// Initialize logging to stderr only.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

/// Log to the file when possible, otherwise to stderr. Never fails.
pub fn init() -> LogTarget {
    match init_logging() {
        Ok(path) => LogTarget::File(path),
        Err(e) => {
            init_logging_stderr();
            tracing::warn!("log file unavailable ({:#}), logging to stderr", e);
            LogTarget::Stderr
        }
    }
}
