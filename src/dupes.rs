//! Keyword search of the output directory for books already processed

use crate::domain::Book;
use crate::error::{AutonameError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Title words too common to search on
const IGNORED_WORDS: &[&str] = &["The", "And", "To", "Of", "By", "With", "We", "As"];

/// Characters dropped from search keywords
const KEYWORD_STRIP: &str = ",.&()-[]0123456789";

const SERIES_PHRASE: &str = "A Very Short Introduction";

/// Reports with more entries than this are shown as a scrollable listing
pub const POPUP_LIMIT: usize = 10;

/// Keywords chosen for a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKeywords {
    pub author: String,
    /// `None` when searching on the author alone
    pub title: Option<String>,
}

/// Result of a duplicate search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateReport {
    pub keywords: SearchKeywords,
    /// Matching names, without extension
    pub matches: Vec<String>,
}

impl DuplicateReport {
    /// Too many matches for a popup
    pub fn is_long(&self) -> bool {
        self.matches.len() > POPUP_LIMIT
    }

    /// One-line description of what was searched for
    pub fn summary(&self) -> String {
        match &self.keywords.title {
            Some(title) => format!(
                "Searching on keywords \"{}\" and \"{}\": {} found",
                self.keywords.author,
                title,
                self.matches.len()
            ),
            None => format!(
                "Searching for author only (\"{}\"): {} found",
                self.keywords.author,
                self.matches.len()
            ),
        }
    }
}

fn strip_keyword(word: &str) -> String {
    word.chars().filter(|c| !KEYWORD_STRIP.contains(*c)).collect()
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Picks the segment most likely to hold the title
fn title_segment(segments: &[String]) -> usize {
    let second = &segments[1];
    if segments.len() <= 2 || (!second.contains(']') && second != SERIES_PHRASE) {
        return 1;
    }
    match segments.iter().position(|s| s.contains(']')) {
        Some(series) => (series + 1).min(segments.len() - 1),
        None => segments.len() - 1,
    }
}

/// Chooses the author and title keywords for `segments`
pub fn search_keywords(segments: &[String]) -> Result<SearchKeywords> {
    let author = segments
        .first()
        .and_then(|s| s.split_whitespace().next())
        .map(strip_keyword)
        .unwrap_or_default();
    if author.is_empty() {
        return Err(AutonameError::NoAuthorKeyword);
    }

    if segments.len() < 2 {
        return Ok(SearchKeywords {
            author,
            title: None,
        });
    }

    let segment = &segments[title_segment(segments)];
    let word = segment
        .split_whitespace()
        .find(|w| w.chars().count() > 2 && !IGNORED_WORDS.contains(&capitalize_word(w).as_str()))
        .or_else(|| segment.split_whitespace().next())
        .unwrap_or_default();
    let title = strip_keyword(word);

    Ok(SearchKeywords {
        author,
        title: (!title.is_empty()).then_some(title),
    })
}

/// Filters `names` (with extension) down to those matching `keywords`
pub fn match_names<I, S>(names: I, keywords: &SearchKeywords, extension: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let author = keywords.author.to_lowercase();
    let title = keywords.title.as_ref().map(|t| t.to_lowercase());

    let mut matches: Vec<String> = names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            name.strip_suffix(extension).map(str::to_string)
        })
        .filter(|stem| stem.to_lowercase().contains(&author))
        .filter(|stem| match &title {
            Some(title) => stem.to_lowercase().contains(title),
            None => true,
        })
        .collect();
    matches.sort();
    matches
}

/// Searches `output_dir` for archives that look like `book`
pub fn find_duplicates(book: &Book, output_dir: &Path, extension: &str) -> Result<DuplicateReport> {
    let keywords = search_keywords(book.segments())?;

    let names = fs::read_dir(output_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok());
    let matches = match_names(names, &keywords, extension);

    debug!(?keywords, found = matches.len(), "Duplicate search finished");
    Ok(DuplicateReport { keywords, matches })
}
