//! Background listing of the output directory to warm the filesystem cache

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Owns a small tokio runtime that lists a directory once in the background.
///
/// The result is only logged. Dropping or [`CacheWarmer::abandon`]ing the
/// warmer does not wait for the listing to finish.
pub struct CacheWarmer {
    runtime: tokio::runtime::Runtime,
    task: Option<JoinHandle<io::Result<usize>>>,
}

fn count_entries(dir: &Path) -> io::Result<usize> {
    Ok(fs::read_dir(dir)?.filter_map(|entry| entry.ok()).count())
}

impl CacheWarmer {
    /// Starts listing `dir` on the runtime's blocking pool
    pub fn start(dir: &Path) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("autoname-prewarm")
            .build()?;

        let dir: PathBuf = dir.to_path_buf();
        let task = runtime.spawn_blocking(move || {
            let result = count_entries(&dir);
            match &result {
                Ok(count) => debug!(dir = %dir.display(), count, "Output directory listed"),
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Output directory listing failed")
                }
            }
            result
        });

        Ok(Self {
            runtime,
            task: Some(task),
        })
    }

    /// Blocks until the listing is done and returns the entry count
    #[cfg(test)]
    fn wait(mut self) -> io::Result<usize> {
        let task = self
            .task
            .take()
            .ok_or_else(|| io::Error::other("listing already collected"))?;
        self.runtime
            .block_on(task)
            .map_err(|e| io::Error::other(format!("listing task failed: {}", e)))?
    }

    /// Leaves the listing running and releases the runtime without waiting
    pub fn abandon(self) {
        self.runtime.shutdown_background();
    }
}
