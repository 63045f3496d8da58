//! Executes parsed commands against the session

use crate::archiver::Archiver;
use crate::command::Command;
use crate::config::Settings;
use crate::domain::book::{format_size_kb, sanitize_edit};
use crate::domain::{Advance, Book, Session};
use crate::dupes::{self, DuplicateReport};
use crate::error::{AutonameError, Result};
use crate::validate::{self, FinalizeTarget};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub const VANISHED_MESSAGE: &str =
    "Selected book has been moved, deleted or renamed. Refreshing file list.";

/// Blocking questions the interpreter can put to the user
pub trait PromptSurface {
    /// Asks for one line of text; `None` when cancelled
    fn ask_text(&mut self, title: &str, initial: &str) -> Option<String>;

    /// Asks a yes/no question
    fn confirm(&mut self, question: &str) -> bool;
}

/// What the front end should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Show a status line
    Status(String),
    /// Nothing to report
    Quiet,
    Quit,
    Help,
    Duplicates(DuplicateReport),
}

fn current_book(session: &mut Session) -> Result<&mut Book> {
    session.current_mut().ok_or(AutonameError::NoBook)
}

/// Parses and runs one command line, turning any error into a status
/// message. Bracket repair runs after every command that succeeds.
pub fn run_command(
    session: &mut Session,
    settings: &Settings,
    prompt: &mut dyn PromptSurface,
    line: &str,
) -> Outcome {
    let line = line.trim();
    let result = Command::parse(line).and_then(|command| {
        debug!(?command, "Dispatching command");
        if !command.skips_presence_check() {
            if let Some(book) = session.current() {
                if !book.exists() {
                    warn!(path = %book.path().display(), "Current book vanished");
                    session.refresh()?;
                    return Ok(Outcome::Status(VANISHED_MESSAGE.to_string()));
                }
            }
        }
        execute(session, settings, prompt, command)
    });

    match result {
        Ok(outcome) => {
            if let Some(book) = session.current_mut() {
                if let Some(index) = book.bracket_match() {
                    debug!(segment = index + 1, "Removed stale closing bracket");
                }
            }
            outcome
        }
        Err(e) => {
            warn!(command = line, error = %e, class = ?e.class(), "Command failed");
            Outcome::Status(format!(
                "Command '{}' not recognised or invalid - {}",
                line, e
            ))
        }
    }
}

/// Runs a parsed command. Errors leave earlier mutations in place.
pub fn execute(
    session: &mut Session,
    settings: &Settings,
    prompt: &mut dyn PromptSurface,
    command: Command,
) -> Result<Outcome> {
    let outcome = match command {
        Command::Quit => Outcome::Quit,
        Command::Help => Outcome::Help,
        Command::Noop => Outcome::Quiet,
        Command::FindDuplicates => {
            let book = current_book(session)?;
            let report =
                dupes::find_duplicates(book, &settings.output_dir, &settings.archive_extension)?;
            if report.matches.is_empty() {
                Outcome::Status(format!("{}. No matches found.", report.summary()))
            } else {
                Outcome::Duplicates(report)
            }
        }
        Command::SplitBy => {
            if current_book(session)?.split_by() {
                Outcome::Quiet
            } else {
                Outcome::Status("No \" by \" found in the name.".to_string())
            }
        }
        Command::Compress => compress(session, settings)?,
        Command::Reverse(index) => {
            let book = current_book(session)?;
            let old = book
                .segments()
                .get(index)
                .cloned()
                .ok_or(AutonameError::SegmentOutOfRange(index + 1))?;
            let new = book.reverse(index)?;
            Outcome::Status(format!("Reversing {} to {}.", old, new))
        }
        Command::Open => {
            let book = current_book(session)?;
            open::that_detached(book.path())
                .map_err(|e| AutonameError::Open(e.to_string()))?;
            Outcome::Status(format!("Opening {}", book.file_name()))
        }
        Command::Capitalize => {
            current_book(session)?.capitalize();
            Outcome::Quiet
        }
        Command::Split(index) => {
            let book = current_book(session)?;
            if index >= book.segment_count() {
                return Err(AutonameError::SegmentOutOfRange(index + 1));
            }
            let delimiter = match prompt.ask_text("Split at text:", "") {
                Some(text) if !text.is_empty() => text,
                _ => return Ok(Outcome::Quiet),
            };
            if book.split(index, &delimiter)? {
                Outcome::Quiet
            } else {
                Outcome::Status(format!(
                    "'{}' not found in segment {}.",
                    delimiter,
                    index + 1
                ))
            }
        }
        Command::Swap(first, second) => {
            current_book(session)?.swap(first, second)?;
            Outcome::Status("Segments swapped.".to_string())
        }
        Command::FinalizeMove => finalize(session, settings, prompt, FinalizeTarget::Move)?,
        Command::FinalizeInPlace => finalize(session, settings, prompt, FinalizeTarget::InPlace)?,
        Command::AddSegment => {
            let book = current_book(session)?;
            if let Some(text) = prompt.ask_text("Text to add:", "") {
                if book.insert(&text, None)? {
                    book.capitalize();
                }
            }
            Outcome::Quiet
        }
        Command::Warhammer40k => insert_tag(session, "[Warhammer 40,000", Some(1))?,
        Command::ShortStoryCollection => insert_tag(session, "[SSC]", Some(1))?,
        Command::Translated => insert_tag(session, "translated by ", None)?,
        Command::Editor => {
            current_book(session)?.append_to(0, " (ed.)")?;
            Outcome::Quiet
        }
        Command::Bracket(side, index) => {
            current_book(session)?.wrap(index, side)?;
            Outcome::Quiet
        }
        Command::Undo => {
            if !session.revert() {
                return Err(AutonameError::NoBook);
            }
            Outcome::Status("All changes undone.".to_string())
        }
        Command::Delete => delete(session, settings, prompt)?,
        Command::Strip(kind, index) => {
            current_book(session)?.strip(index, kind)?;
            Outcome::Quiet
        }
    };
    Ok(outcome)
}

/// Retypes one segment from the segment panel. The answer is filtered to the
/// edit character set; cancelling leaves the segment alone.
pub fn edit_segment(
    session: &mut Session,
    prompt: &mut dyn PromptSurface,
    index: usize,
) -> Outcome {
    let result = current_book(session).and_then(|book| {
        let current = book
            .segments()
            .get(index)
            .cloned()
            .ok_or(AutonameError::SegmentOutOfRange(index + 1))?;
        if let Some(text) = prompt.ask_text(&format!("Segment {}:", index + 1), &current) {
            book.edit(index, &sanitize_edit(&text))?;
            book.bracket_match();
        }
        Ok(Outcome::Quiet)
    });
    result.unwrap_or_else(|e| {
        warn!(segment = index + 1, error = %e, "Segment edit failed");
        Outcome::Status(e.to_string())
    })
}

/// Removes one segment from the segment panel
pub fn delete_segment(session: &mut Session, index: usize) -> Outcome {
    let result = current_book(session).and_then(|book| {
        book.delete(index)?;
        book.bracket_match();
        Ok(Outcome::Quiet)
    });
    result.unwrap_or_else(|e| {
        warn!(segment = index + 1, error = %e, "Segment delete failed");
        Outcome::Status(e.to_string())
    })
}

fn insert_tag(session: &mut Session, text: &str, position: Option<usize>) -> Result<Outcome> {
    let book = current_book(session)?;
    if book.insert(text, position)? {
        book.capitalize();
    }
    Ok(Outcome::Quiet)
}

fn finalize(
    session: &mut Session,
    settings: &Settings,
    prompt: &mut dyn PromptSurface,
    target: FinalizeTarget,
) -> Result<Outcome> {
    let book = session.current().ok_or(AutonameError::NoBook)?;

    if let Some(advisory) = validate::check(book, target, settings.move_size_limit_kb)? {
        if !prompt.confirm(advisory.question()) {
            return Ok(Outcome::Status("Rename cancelled.".to_string()));
        }
    }

    let dest = validate::target_path(book, target, &settings.output_dir);
    let renamed = validate::commit(book, &dest)?;
    let status = format!("Renaming book to {}.", renamed.display());

    match target {
        FinalizeTarget::Move => session.advance(Advance::Remove),
        FinalizeTarget::InPlace => session.advance(Advance::Retain(renamed)),
    }
    Ok(Outcome::Status(status))
}

fn delete(
    session: &mut Session,
    settings: &Settings,
    prompt: &mut dyn PromptSurface,
) -> Result<Outcome> {
    let book = session.current().ok_or(AutonameError::NoBook)?;
    let question = format!("About to delete {}. Are you sure?", book.path().display());
    if !prompt.confirm(&question) {
        return Ok(Outcome::Quiet);
    }

    if settings.use_trash {
        trash::delete(book.path()).map_err(|e| AutonameError::Trash(e.to_string()))?;
    } else {
        fs::remove_file(book.path())?;
    }
    info!(path = %book.path().display(), trash = settings.use_trash, "Deleted book");

    session.advance(Advance::Remove);
    Ok(Outcome::Status("File deleted successfully.".to_string()))
}

fn compress(session: &mut Session, settings: &Settings) -> Result<Outcome> {
    let book = session.current().ok_or(AutonameError::NoBook)?;
    let archiver = Archiver::new(&settings.archiver_path, &settings.archive_extension);
    let archive = archiver.compress(book)?;
    Ok(after_compression(session, &archive))
}

/// Re-lists and selects the new archive. A failed re-list is reported on its
/// own; the archive already exists at that point.
fn after_compression(session: &mut Session, archive: &Path) -> Outcome {
    if let Err(e) = session.refresh() {
        warn!(archive = %archive.display(), error = %e, "Re-list after compression failed");
        return Outcome::Status(format!(
            "File compressed successfully, but the book list could not be refreshed - {}",
            e
        ));
    }
    session.select_path(archive);

    let size = Book::from_path(&archive)
        .size_kb()
        .map(format_size_kb)
        .unwrap_or_else(|_| "unknown".to_string());
    Outcome::Status(format!(
        "File compressed successfully. New size is {}",
        size
    ))
}
