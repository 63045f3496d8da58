// CLI module for argument parsing

use crate::domain::{DiscoveryOptions, SortBy};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Autoname - interactive ebook filename normalizer
///
/// Walks through the books in the configured scan directory and turns each
/// file name into "Author - Title - [Tags]" form with short edit commands.
#[derive(Parser, Debug, Clone)]
#[command(name = "autoname")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON configuration file
    ///
    /// Defaults to <config dir>/autoname/config.json.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Order of the candidate list
    #[arg(short = 's', long = "sort", value_enum, default_value = "newest")]
    pub sort_by: SortOrder,

    /// Hide files larger than 5 MB from the candidate list
    #[arg(long = "hide-large", action = ArgAction::SetTrue)]
    pub hide_large: bool,

    /// Log at debug level
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    /// Most recently modified first
    #[default]
    Newest,
    /// Least recently modified first
    Oldest,
    /// Shuffled
    Random,
    /// By file name
    Alpha,
}

impl From<SortOrder> for SortBy {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Newest => SortBy::NewestFirst,
            SortOrder::Oldest => SortBy::OldestFirst,
            SortOrder::Random => SortBy::Random,
            SortOrder::Alpha => SortBy::Alphabetical,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.config {
            if !path.is_file() {
                return Err(format!("Config file does not exist: {}", path.display()));
            }
        }
        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config_path: Option<PathBuf>,
    pub sort_by: SortOrder,
    pub show_large: bool,
    pub verbose: bool,
}

impl AppConfig {
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            show_large: self.show_large,
            sort_by: self.sort_by.into(),
        }
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            config_path: args.config,
            sort_by: args.sort_by,
            show_large: !args.hide_large,
            verbose: args.verbose,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            config_path: None,
            sort_by: SortOrder::Newest,
            show_large: true,
            verbose: false,
        }
    }
}
