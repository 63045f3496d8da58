//! Error types shared across the crate

use crate::normalize::NameError;
use crate::validate::ValidationError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a failure, used to decide how the front end reacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad command syntax, out-of-range segment, unusable text
    UserInput,
    /// A pre-commit naming check blocked a finalize
    Validation,
    /// Permission denied, missing file, rename collision
    Filesystem,
    /// Archiver or default-handler launch failure
    ExternalTool,
    /// Configuration problems; fatal before the interactive loop starts
    Startup,
}

#[derive(Debug, Error)]
pub enum AutonameError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Command not recognised: '{0}'")]
    UnknownCommand(String),

    #[error("Invalid segment number: '{0}'")]
    InvalidSegmentNumber(String),

    #[error("Segment {0} does not exist")]
    SegmentOutOfRange(usize),

    #[error("Only one segment remaining, cannot delete")]
    LastSegment,

    #[error("No book is currently selected")]
    NoBook,

    #[error(transparent)]
    Name(#[from] NameError),

    #[error("No author keyword to search with")]
    NoAuthorKeyword,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{} has been moved, deleted or renamed", .0.display())]
    FileVanished(PathBuf),

    #[error("A file named {} already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("Trash error: {0}")]
    Trash(String),

    #[error("File is already compressed")]
    AlreadyCompressed,

    #[error("Archiver failed: {0}")]
    Archiver(String),

    #[error("Could not open file: {0}")]
    Open(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AutonameError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AutonameError::ConfigError(_) => ErrorClass::Startup,
            AutonameError::UnknownCommand(_)
            | AutonameError::InvalidSegmentNumber(_)
            | AutonameError::SegmentOutOfRange(_)
            | AutonameError::LastSegment
            | AutonameError::NoBook
            | AutonameError::Name(_)
            | AutonameError::NoAuthorKeyword
            | AutonameError::AlreadyCompressed => ErrorClass::UserInput,
            AutonameError::Validation(_) => ErrorClass::Validation,
            AutonameError::FileVanished(_)
            | AutonameError::DestinationExists(_)
            | AutonameError::Trash(_)
            | AutonameError::Io(_) => ErrorClass::Filesystem,
            AutonameError::Archiver(_) | AutonameError::Open(_) => ErrorClass::ExternalTool,
        }
    }
}

pub type Result<T> = std::result::Result<T, AutonameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(
            AutonameError::ConfigError("x".into()).class(),
            ErrorClass::Startup
        );
        assert_eq!(AutonameError::LastSegment.class(), ErrorClass::UserInput);
        assert_eq!(
            AutonameError::Validation(ValidationError::UnbalancedBrackets).class(),
            ErrorClass::Validation
        );
        assert_eq!(
            AutonameError::DestinationExists(PathBuf::from("a.rar")).class(),
            ErrorClass::Filesystem
        );
        assert_eq!(
            AutonameError::Archiver("boom".into()).class(),
            ErrorClass::ExternalTool
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AutonameError::SegmentOutOfRange(4).to_string(),
            "Segment 4 does not exist"
        );
        let vanished = AutonameError::FileVanished(PathBuf::from("/books/a.pdf"));
        assert_eq!(
            vanished.to_string(),
            "/books/a.pdf has been moved, deleted or renamed"
        );
    }
}
