use super::book::Book;
use super::{discover_candidates, CandidateEntry, DiscoveryOptions, SortBy};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How the candidate list moves on after a book is finished with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The file left the scan directory (moved or deleted); drop its entry
    /// and count it as completed
    Remove,
    /// The file was renamed in place; keep the entry under its new path and
    /// step to the next one
    Retain(PathBuf),
}

/// The working set: candidate list, current selection and progress counter
#[derive(Debug)]
pub struct Session {
    scan_dir: PathBuf,
    options: DiscoveryOptions,
    candidates: Vec<CandidateEntry>,
    current_index: usize,
    current: Option<Book>,
    completed: usize,
}

impl Session {
    /// Lists the scan directory and selects the first candidate
    pub fn open(scan_dir: &Path, options: DiscoveryOptions) -> io::Result<Self> {
        let mut session = Self {
            scan_dir: scan_dir.to_path_buf(),
            options,
            candidates: Vec::new(),
            current_index: 0,
            current: None,
            completed: 0,
        };
        session.refresh()?;
        Ok(session)
    }

    pub fn scan_dir(&self) -> &Path {
        &self.scan_dir
    }

    pub fn candidates(&self) -> &[CandidateEntry] {
        &self.candidates
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&Book> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Book> {
        self.current.as_mut()
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Derived from the candidate list, so `completed + remaining` stays
    /// equal to the number of files seen this session
    pub fn remaining(&self) -> usize {
        self.candidates.len()
    }

    pub fn sort_by(&self) -> SortBy {
        self.options.sort_by
    }

    pub fn show_large(&self) -> bool {
        self.options.show_large
    }

    /// Re-lists the scan directory.
    ///
    /// The current file stays selected if it is still listed (its edits are
    /// kept); otherwise the entry at the current index is selected.
    pub fn refresh(&mut self) -> io::Result<()> {
        self.candidates = discover_candidates(&self.scan_dir, &self.options)?;
        debug!(count = self.candidates.len(), "Candidate list refreshed");

        let still_listed = self
            .current
            .as_ref()
            .and_then(|book| self.position_of(book.path()));

        match still_listed {
            Some(index) => self.current_index = index,
            None => {
                self.clamp_index();
                self.select_current();
            }
        }
        Ok(())
    }

    /// Changes the sort order and re-lists
    pub fn set_sort(&mut self, sort_by: SortBy) -> io::Result<()> {
        self.options.sort_by = sort_by;
        self.refresh()
    }

    /// Flips whether large files are listed, then re-lists
    pub fn toggle_large(&mut self) -> io::Result<()> {
        self.options.show_large = !self.options.show_large;
        self.refresh()
    }

    /// Selects the candidate at `index`, discarding edits to the previous one
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.candidates.len() {
            return false;
        }
        self.current_index = index;
        self.select_current();
        true
    }

    /// Selects the candidate with the given path, if listed
    pub fn select_path(&mut self, path: &Path) -> bool {
        match self.position_of(path) {
            Some(index) => self.select(index),
            None => false,
        }
    }

    /// Moves past the current book after it has been finalized or deleted
    pub fn advance(&mut self, advance: Advance) {
        if self.candidates.is_empty() {
            self.current = None;
            return;
        }

        match advance {
            Advance::Remove => {
                if self.current_index < self.candidates.len() {
                    self.candidates.remove(self.current_index);
                }
                self.completed += 1;
            }
            Advance::Retain(new_path) => {
                if let Some(entry) = self.candidates.get_mut(self.current_index) {
                    entry.name = new_path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown")
                        .to_string();
                    entry.path = new_path;
                }
                self.current_index += 1;
            }
        }

        self.clamp_index();
        self.select_current();
    }

    /// Throws away every edit by rebuilding the book from its path
    pub fn revert(&mut self) -> bool {
        match self.current.as_ref().map(|book| Book::from_path(book.path())) {
            Some(fresh) => {
                self.current = Some(fresh);
                true
            }
            None => false,
        }
    }

    fn position_of(&self, path: &Path) -> Option<usize> {
        self.candidates.iter().position(|c| c.path == path)
    }

    fn clamp_index(&mut self) {
        if self.current_index >= self.candidates.len() {
            self.current_index = self.candidates.len().saturating_sub(1);
        }
    }

    fn select_current(&mut self) {
        self.current = self
            .candidates
            .get(self.current_index)
            .map(|c| Book::from_path(&c.path));
    }
}
