//! Adapter for the external archiver used by the `rar` command

use crate::domain::Book;
use crate::error::{AutonameError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Runs the configured archiver executable
#[derive(Debug, Clone)]
pub struct Archiver {
    executable: PathBuf,
    extension: String,
}

impl Archiver {
    /// `extension` is the archive extension with the dot, e.g. `.rar`
    pub fn new(executable: &Path, extension: &str) -> Self {
        Self {
            executable: executable.to_path_buf(),
            extension: extension.to_lowercase(),
        }
    }

    /// Where the archive for `book` is written: its directory, current name
    pub fn destination(&self, book: &Book) -> PathBuf {
        book.directory()
            .join(format!("{}{}", book.name(), self.extension))
    }

    /// Moves the book's file into a new archive.
    ///
    /// Runs `ARCHIVER m -m5 -ep DEST SOURCE`. Succeeds only if the tool exits
    /// with status 0 and the archive exists afterwards. An existing archive
    /// at DEST is never touched. Returns the archive path.
    pub fn compress(&self, book: &Book) -> Result<PathBuf> {
        if book.extension() == self.extension {
            return Err(AutonameError::AlreadyCompressed);
        }

        let dest = self.destination(book);
        if dest.exists() {
            return Err(AutonameError::DestinationExists(dest));
        }
        debug!(
            archiver = %self.executable.display(),
            dest = %dest.display(),
            "Running archiver"
        );

        let output = Command::new(&self.executable)
            .args(["m", "-m5", "-ep"])
            .arg(&dest)
            .arg(book.path())
            .output()
            .map_err(|e| {
                AutonameError::Archiver(format!(
                    "could not run {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(AutonameError::Archiver(message));
        }
        if !dest.exists() {
            return Err(AutonameError::Archiver(format!(
                "{} was not created",
                dest.display()
            )));
        }

        info!(from = %book.path().display(), to = %dest.display(), "Compressed book");
        Ok(dest)
    }
}
