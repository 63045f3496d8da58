pub mod book;
pub mod session;

pub use book::{BracketSide, Book, StripKind};
pub use session::{Advance, Session};

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions (lowercase, without dot) that are offered for renaming
pub const CANDIDATE_EXTENSIONS: &[&str] = &["rar", "pdf", "txt"];

/// Files above this size are hidden unless large files are shown
pub const LARGE_FILE_BYTES: u64 = 5_000_000;

/// A file in the scan directory that can be picked for renaming
#[derive(Debug, Clone)]
pub struct CandidateEntry {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub modified_date: DateTime<Utc>,
}

impl CandidateEntry {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let modified_date: DateTime<Utc> = metadata.modified()?.into();

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(CandidateEntry {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            modified_date,
        })
    }

    pub fn is_large(&self) -> bool {
        self.size > LARGE_FILE_BYTES
    }
}

/// Returns true when the path carries one of the candidate extensions
pub fn is_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| CANDIDATE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Sort order for the candidate list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Most recently modified first
    #[default]
    NewestFirst,
    OldestFirst,
    Random,
    /// By file name, case-insensitive
    Alphabetical,
}

impl SortBy {
    /// The next order in the cycle used by the file list's sort key
    pub fn cycle(self) -> Self {
        match self {
            SortBy::NewestFirst => SortBy::OldestFirst,
            SortBy::OldestFirst => SortBy::Random,
            SortBy::Random => SortBy::Alphabetical,
            SortBy::Alphabetical => SortBy::NewestFirst,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortBy::NewestFirst => "newest",
            SortBy::OldestFirst => "oldest",
            SortBy::Random => "random",
            SortBy::Alphabetical => "alphabetical",
        }
    }
}

/// Options for candidate discovery
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryOptions {
    /// List files above [`LARGE_FILE_BYTES`]
    pub show_large: bool,
    pub sort_by: SortBy,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            show_large: true,
            sort_by: SortBy::default(),
        }
    }
}

/// Lists candidate files directly inside `dir_path`.
///
/// Directories, hidden files and entries that cannot be read are skipped.
/// Only `.rar`, `.pdf` and `.txt` files (any case) are returned.
pub fn discover_candidates(
    dir_path: &Path,
    options: &DiscoveryOptions,
) -> io::Result<Vec<CandidateEntry>> {
    let mut files = Vec::new();

    for entry_result in fs::read_dir(dir_path)? {
        let entry = match entry_result {
            Ok(e) => e,
            Err(_) => continue,
        };
        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if file_name.starts_with('.') || !is_candidate(&path) {
            continue;
        }

        let candidate = match CandidateEntry::from_path(&path) {
            Ok(c) => c,
            Err(_) => continue,
        };
        if !fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
            continue;
        }
        if !options.show_large && candidate.is_large() {
            continue;
        }

        files.push(candidate);
    }

    sort_candidates(&mut files, options.sort_by);
    Ok(files)
}

pub fn sort_candidates(files: &mut [CandidateEntry], sort_by: SortBy) {
    match sort_by {
        SortBy::NewestFirst => files.sort_by(|a, b| b.modified_date.cmp(&a.modified_date)),
        SortBy::OldestFirst => files.sort_by(|a, b| a.modified_date.cmp(&b.modified_date)),
        SortBy::Random => files.shuffle(&mut rand::thread_rng()),
        SortBy::Alphabetical => {
            files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod candidate_entry_tests {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn test_candidate_from_path() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("Smith, John - Title.rar");
            fs::write(&path, b"test content").unwrap();

            let entry = CandidateEntry::from_path(&path).unwrap();

            assert_eq!(entry.path, path);
            assert_eq!(entry.name, "Smith, John - Title.rar");
            assert_eq!(entry.size, 12);
            assert!(!entry.is_large());
        }

        #[test]
        fn test_candidate_nonexistent_file() {
            let result = CandidateEntry::from_path(Path::new("/nonexistent/file.rar"));
            assert!(result.is_err());
        }

        #[test]
        fn test_is_candidate_extensions() {
            assert!(is_candidate(Path::new("a.rar")));
            assert!(is_candidate(Path::new("a.PDF")));
            assert!(is_candidate(Path::new("a.Txt")));
            assert!(!is_candidate(Path::new("a.epub")));
            assert!(!is_candidate(Path::new("rar")));
        }
    }

    mod sort_tests {
        use super::*;

        #[test]
        fn test_sort_cycle_visits_every_order() {
            let mut order = SortBy::NewestFirst;
            let mut seen = vec![order];
            for _ in 0..3 {
                order = order.cycle();
                seen.push(order);
            }
            assert_eq!(
                seen,
                vec![
                    SortBy::NewestFirst,
                    SortBy::OldestFirst,
                    SortBy::Random,
                    SortBy::Alphabetical
                ]
            );
            assert_eq!(order.cycle(), SortBy::NewestFirst);
        }
    }

    mod discovery_tests {
        use super::*;
        use std::thread;
        use std::time::Duration;
        use tempfile::TempDir;

        fn names(files: &[CandidateEntry]) -> Vec<&str> {
            files.iter().map(|f| f.name.as_str()).collect()
        }

        #[test]
        fn test_discover_filters_by_extension() {
            let temp_dir = TempDir::new().unwrap();
            let dir_path = temp_dir.path();

            fs::write(dir_path.join("a.rar"), b"a").unwrap();
            fs::write(dir_path.join("b.PDF"), b"b").unwrap();
            fs::write(dir_path.join("c.txt"), b"c").unwrap();
            fs::write(dir_path.join("d.epub"), b"d").unwrap();
            fs::write(dir_path.join(".hidden.rar"), b"e").unwrap();
            fs::create_dir(dir_path.join("folder.rar")).unwrap();

            let options = DiscoveryOptions {
                sort_by: SortBy::Alphabetical,
                ..Default::default()
            };
            let files = discover_candidates(dir_path, &options).unwrap();

            assert_eq!(names(&files), vec!["a.rar", "b.PDF", "c.txt"]);
        }

        #[test]
        fn test_discover_sorts_by_modification_date() {
            let temp_dir = TempDir::new().unwrap();
            let dir_path = temp_dir.path();

            fs::write(dir_path.join("oldest.rar"), b"first").unwrap();
            thread::sleep(Duration::from_millis(20));
            fs::write(dir_path.join("middle.rar"), b"second").unwrap();
            thread::sleep(Duration::from_millis(20));
            fs::write(dir_path.join("newest.rar"), b"third").unwrap();

            let newest = discover_candidates(dir_path, &DiscoveryOptions::default()).unwrap();
            assert_eq!(names(&newest), vec!["newest.rar", "middle.rar", "oldest.rar"]);

            let options = DiscoveryOptions {
                sort_by: SortBy::OldestFirst,
                ..Default::default()
            };
            let oldest = discover_candidates(dir_path, &options).unwrap();
            assert_eq!(names(&oldest), vec!["oldest.rar", "middle.rar", "newest.rar"]);
        }

        #[test]
        fn test_discover_random_keeps_all_entries() {
            let temp_dir = TempDir::new().unwrap();
            for i in 0..8 {
                fs::write(temp_dir.path().join(format!("{}.txt", i)), b"x").unwrap();
            }

            let options = DiscoveryOptions {
                sort_by: SortBy::Random,
                ..Default::default()
            };
            let mut found = names(&discover_candidates(temp_dir.path(), &options).unwrap())
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>();
            found.sort();

            let expected: Vec<String> = (0..8).map(|i| format!("{}.txt", i)).collect();
            assert_eq!(found, expected);
        }

        #[test]
        fn test_discover_hides_large_files() {
            let temp_dir = TempDir::new().unwrap();
            let dir_path = temp_dir.path();

            fs::write(dir_path.join("small.rar"), b"s").unwrap();
            let big = fs::File::create(dir_path.join("big.rar")).unwrap();
            big.set_len(LARGE_FILE_BYTES + 1).unwrap();

            let all = discover_candidates(dir_path, &DiscoveryOptions::default()).unwrap();
            assert_eq!(all.len(), 2);

            let options = DiscoveryOptions {
                show_large: false,
                ..Default::default()
            };
            let small_only = discover_candidates(dir_path, &options).unwrap();
            assert_eq!(names(&small_only), vec!["small.rar"]);
        }

        #[test]
        fn test_discover_empty_directory() {
            let temp_dir = TempDir::new().unwrap();
            let files = discover_candidates(temp_dir.path(), &DiscoveryOptions::default()).unwrap();
            assert!(files.is_empty());
        }

        #[test]
        fn test_discover_nonexistent_directory() {
            let options = DiscoveryOptions::default();
            let result = discover_candidates(Path::new("/nonexistent/directory"), &options);
            assert!(result.is_err());
        }
    }
}
