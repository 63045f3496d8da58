//! Tracing setup. The terminal belongs to the UI, so log lines go to a file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Default log location (~/.cache/autoname/autoname.log)
pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("autoname").join("autoname.log"))
}

/// Level used when `RUST_LOG` is not set
pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn open_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber writing to [`log_path`].
///
/// Returns the log file path, or `None` if logging could not be set up; the
/// application runs without logs in that case.
pub fn init(verbose: bool) -> Option<PathBuf> {
    let path = log_path()?;
    let file = open_log(&path).ok()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok()?;

    Some(path)
}
