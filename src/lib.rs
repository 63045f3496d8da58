//! Autoname - interactive ebook filename normalizer
//!
//! This crate provides the segment model, the command language and the
//! checks behind the `autoname` terminal application, so books can also be
//! renamed programmatically through [`interpreter::run_command`].

pub mod archiver;
pub mod cli;
pub mod command;
pub mod config;
pub mod domain;
pub mod dupes;
pub mod error;
pub mod interpreter;
pub mod logging;
pub mod normalize;
pub mod prewarm;
pub mod tui;
pub mod validate;

// Re-export primary types for convenience
pub use command::Command;
pub use config::Settings;
pub use domain::{
    discover_candidates, Advance, Book, CandidateEntry, DiscoveryOptions, Session, SortBy,
};
pub use error::{AutonameError, Result};
pub use interpreter::{run_command, Outcome, PromptSurface};
pub use normalize::format_name;
