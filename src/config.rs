//! Directories and tool paths loaded from the JSON configuration file

use crate::error::{AutonameError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_move_size_limit_kb() -> u64 {
    5000
}

fn default_archive_extension() -> String {
    ".rar".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the books still to be named
    pub scan_dir: PathBuf,
    /// Directory finished books are moved into
    pub output_dir: PathBuf,
    /// External archiver executable
    pub archiver_path: PathBuf,
    /// Largest book, in KB, that may be moved to the output directory
    #[serde(default = "default_move_size_limit_kb")]
    pub move_size_limit_kb: u64,
    /// Extension of archives in the output directory, with the dot
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,
    /// Send deleted books to the OS trash instead of removing them
    #[serde(default)]
    pub use_trash: bool,
}

impl Settings {
    /// Get the default config file path (~/.config/autoname/config.json)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("autoname").join("config.json"))
    }

    /// Loads and validates the configuration.
    ///
    /// Uses `path` if given, otherwise [`Settings::default_path`]. Every
    /// failure is a [`AutonameError::ConfigError`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path().ok_or_else(|| {
                AutonameError::ConfigError("Could not determine config directory".to_string())
            })?,
        };

        let contents = fs::read_to_string(&path).map_err(|e| {
            AutonameError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let settings = Self::from_json(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|e| {
            AutonameError::ConfigError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Checks that both working directories exist
    pub fn validate(&self) -> Result<()> {
        for (key, dir) in [("scan_dir", &self.scan_dir), ("output_dir", &self.output_dir)] {
            if !dir.is_dir() {
                return Err(AutonameError::ConfigError(format!(
                    "{} is not a directory: {}",
                    key,
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}
