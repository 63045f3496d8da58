//! Pre-commit checks run before a book is renamed or moved

use crate::domain::Book;
use crate::error::{AutonameError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// A naming problem that blocks the rename
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Book is still in PDF format, move halted.")]
    StillPdf,

    #[error("\"40k\" still in book name.")]
    LeftoverTag,

    #[error("Book size is {size_kb} KB, over the {limit_kb} KB limit, move halted.")]
    Oversize { size_kb: u64, limit_kb: u64 },

    #[error("Rename stopped, brackets don't match.")]
    UnbalancedBrackets,
}

/// Something that looks wrong but may be overridden by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    AuthorNotReversed,
}

impl Advisory {
    pub fn question(self) -> &'static str {
        match self {
            Advisory::AuthorNotReversed => {
                "The author does not seem to have their name reversed. Proceed anyway?"
            }
        }
    }
}

/// Where a finalized book ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeTarget {
    /// Rename inside the book's own directory
    InPlace,
    /// Rename into the output directory
    Move,
}

/// Replaces every run of spaces with a single space
pub fn collapse_spaces(name: &str) -> String {
    let mut collapsed = name.to_string();
    while collapsed.contains("  ") {
        collapsed = collapsed.replace("  ", " ");
    }
    collapsed
}

/// The file name a finalize would write
pub fn final_file_name(book: &Book) -> String {
    collapse_spaces(&book.file_name())
}

/// Full destination path for a finalize
pub fn target_path(book: &Book, target: FinalizeTarget, output_dir: &Path) -> PathBuf {
    let dir = match target {
        FinalizeTarget::InPlace => book.directory(),
        FinalizeTarget::Move => output_dir,
    };
    dir.join(final_file_name(book))
}

fn brackets_balanced(name: &str) -> bool {
    let count = |c: char| name.matches(c).count();
    count('[') == count(']') && count('(') == count(')')
}

/// Runs the blocking checks in order, then reports any advisory.
///
/// Size is only read for moves, so a vanished file surfaces as
/// [`AutonameError::FileVanished`] there.
pub fn check(book: &Book, target: FinalizeTarget, size_limit_kb: u64) -> Result<Option<Advisory>> {
    let is_move = target == FinalizeTarget::Move;
    let name = final_file_name(book);

    if is_move && book.extension() == ".pdf" {
        return Err(ValidationError::StillPdf.into());
    }
    if name.contains("40k") || name.contains("40K") {
        return Err(ValidationError::LeftoverTag.into());
    }
    if is_move {
        let size_kb = book.size_kb()?;
        if size_kb > size_limit_kb {
            return Err(ValidationError::Oversize {
                size_kb,
                limit_kb: size_limit_kb,
            }
            .into());
        }
    }
    if !brackets_balanced(&name) {
        return Err(ValidationError::UnbalancedBrackets.into());
    }

    let author = book.segments().first().map(String::as_str).unwrap_or_default();
    if !author.contains(',') && !author.contains("Various") {
        return Ok(Some(Advisory::AuthorNotReversed));
    }
    Ok(None)
}

/// Whether `a` and `b` name the same file on disk.
///
/// Case-only renames on case-insensitive filesystems resolve `dest` to the
/// source itself.
fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if let (Ok(left), Ok(right)) = (fs::metadata(a), fs::metadata(b)) {
            return left.dev() == right.dev() && left.ino() == right.ino();
        }
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

/// Renames the book's file to `dest`.
///
/// Refuses to overwrite a different existing file; the rename is never
/// attempted in that case.
pub fn commit(book: &Book, dest: &Path) -> Result<PathBuf> {
    if dest.exists() && !is_same_file(dest, book.path()) {
        return Err(AutonameError::DestinationExists(dest.to_path_buf()));
    }
    if !book.exists() {
        return Err(AutonameError::FileVanished(book.path().to_path_buf()));
    }

    fs::rename(book.path(), dest)?;
    info!(from = %book.path().display(), to = %dest.display(), "Renamed book");
    Ok(dest.to_path_buf())
}
