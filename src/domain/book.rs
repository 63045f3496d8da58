use crate::error::{AutonameError, Result};
use crate::normalize::{self, capitalize};
use std::fs;
use std::path::{Path, PathBuf};

/// Separator between segments in a finished file name
pub const SEGMENT_SEPARATOR: &str = " - ";

/// Punctuation allowed in text added as a new segment
const INSERT_PUNCTUATION: &str = "![] ,'.;";

/// Punctuation allowed when a segment is retyped directly
const EDIT_PUNCTUATION: &str = " []()-&,.;'";

/// Characters removed by the `d`-family strip commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripKind {
    /// `-` becomes a space
    Hyphens,
    /// `[` and `]` are removed
    SquareBrackets,
    /// `.` becomes a space
    Periods,
    /// `_` becomes a space
    Underscores,
    /// `(` and `)` become spaces
    Parens,
}

impl StripKind {
    fn apply(self, text: &str) -> String {
        match self {
            StripKind::Hyphens => text.replace('-', " "),
            StripKind::SquareBrackets => text.replace(['[', ']'], ""),
            StripKind::Periods => text.replace('.', " "),
            StripKind::Underscores => text.replace('_', " "),
            StripKind::Parens => text.replace(['(', ')'], " "),
        }
    }
}

/// Which bracket to attach to a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketSide {
    /// Prepend `[`
    Open,
    /// Append `]`
    Close,
}

/// A candidate file, decomposed into editable name segments.
///
/// The displayed and committed name is always `segments.join(" - ")`; it is
/// never stored separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    path: PathBuf,
    extension: String,
    segments: Vec<String>,
}

impl Book {
    /// Builds a book from a path. The stem is split on `" - "` and every
    /// piece trimmed; the extension is lowercased.
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();

        let segments = stem
            .split(SEGMENT_SEPARATOR)
            .map(|s| s.trim().to_string())
            .collect();

        Self {
            path: path.to_path_buf(),
            extension,
            segments,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the file
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Lowercase extension including the dot, or empty
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The reassembled name, without extension
    pub fn name(&self) -> String {
        self.segments.join(SEGMENT_SEPARATOR)
    }

    /// The reassembled name plus extension
    pub fn file_name(&self) -> String {
        format!("{}{}", self.name(), self.extension)
    }

    /// Current size on disk; reads the filesystem every time
    pub fn size_bytes(&self) -> Result<u64> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(metadata.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AutonameError::FileVanished(self.path.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Size rounded to whole kilobytes
    pub fn size_kb(&self) -> Result<u64> {
        Ok(kilobytes(self.size_bytes()?))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.segments.len() {
            Ok(())
        } else {
            Err(AutonameError::SegmentOutOfRange(index + 1))
        }
    }

    /// Replaces the segment at `index` (0-based)
    pub fn edit(&mut self, index: usize, text: &str) -> Result<()> {
        self.check_index(index)?;
        self.segments[index] = text.to_string();
        Ok(())
    }

    /// Adds a segment after filtering `text` to the insert allow-list.
    ///
    /// Appends (trimmed) when `position` is `None`, otherwise inserts before
    /// `position`. Returns `false` when nothing survived the filter.
    pub fn insert(&mut self, text: &str, position: Option<usize>) -> Result<bool> {
        let text = sanitize_insert(text);
        if text.is_empty() {
            return Ok(false);
        }

        match position {
            None => self.segments.push(text.trim().to_string()),
            Some(position) if position <= self.segments.len() => {
                self.segments.insert(position, text)
            }
            Some(position) => return Err(AutonameError::SegmentOutOfRange(position + 1)),
        }
        Ok(true)
    }

    /// Removes the segment at `index` (0-based); the last one never goes
    pub fn delete(&mut self, index: usize) -> Result<()> {
        if self.segments.len() == 1 {
            return Err(AutonameError::LastSegment);
        }
        self.check_index(index)?;
        self.segments.remove(index);
        Ok(())
    }

    /// Swaps two segments by their 1-based numbers
    pub fn swap(&mut self, first: usize, second: usize) -> Result<()> {
        for number in [first, second] {
            if number == 0 || number > self.segments.len() {
                return Err(AutonameError::SegmentOutOfRange(number));
            }
        }
        self.segments.swap(first - 1, second - 1);
        Ok(())
    }

    /// Splits the segment at `index` before the first `delimiter`.
    ///
    /// The text before becomes its own segment; the delimiter stays with the
    /// text after it. Returns `false` if the delimiter was not found.
    pub fn split(&mut self, index: usize, delimiter: &str) -> Result<bool> {
        self.check_index(index)?;
        if delimiter.is_empty() {
            return Ok(false);
        }

        let Some(at) = self.segments[index].find(delimiter) else {
            return Ok(false);
        };
        let after = self.segments[index].split_off(at);
        let before = self.segments[index].trim().to_string();
        self.segments[index] = after;
        self.segments.insert(index, before);
        Ok(true)
    }

    /// Moves the text after the first `" by "` to the front as the author.
    ///
    /// `" By "` counts too. Returns `false` if no segment contains it.
    pub fn split_by(&mut self) -> bool {
        let found = self.segments.iter().enumerate().find_map(|(index, segment)| {
            let segment = segment.replace(" By ", " by ");
            segment
                .split_once(" by ")
                .map(|(before, after)| (index, trim_author_punct(before), trim_author_punct(after)))
        });

        match found {
            Some((index, before, after)) => {
                self.segments[index] = before;
                self.segments.insert(0, after);
                true
            }
            None => false,
        }
    }

    /// Reverses the name in segment `index` (0-based); returns the new text
    pub fn reverse(&mut self, index: usize) -> Result<String> {
        self.check_index(index)?;
        let reversed = normalize::format_name(&self.segments[index])?;
        self.segments[index] = reversed.clone();
        Ok(reversed)
    }

    /// Title-cases every segment
    pub fn capitalize(&mut self) {
        for segment in &mut self.segments {
            *segment = capitalize(segment);
        }
    }

    /// Drops a stale `]` when the name carries more than one
    pub fn bracket_match(&mut self) -> Option<usize> {
        normalize::repair_brackets(&mut self.segments)
    }

    /// Appends text to the end of segment `index` (0-based)
    pub fn append_to(&mut self, index: usize, text: &str) -> Result<()> {
        self.check_index(index)?;
        self.segments[index].push_str(text);
        Ok(())
    }

    /// Adds `[` to the start or `]` to the end of segment `index`
    pub fn wrap(&mut self, index: usize, side: BracketSide) -> Result<()> {
        self.check_index(index)?;
        match side {
            BracketSide::Open => self.segments[index].insert(0, '['),
            BracketSide::Close => self.segments[index].push(']'),
        }
        Ok(())
    }

    /// Applies one of the strip commands to segment `index`
    pub fn strip(&mut self, index: usize, kind: StripKind) -> Result<()> {
        self.check_index(index)?;
        self.segments[index] = kind.apply(&self.segments[index]);
        Ok(())
    }
}

fn trim_author_punct(text: &str) -> String {
    text.trim_matches(|c: char| " ,-.".contains(c)).to_string()
}

/// Bytes rounded to the nearest kilobyte, ties to even
pub fn kilobytes(bytes: u64) -> u64 {
    let (whole, rest) = (bytes / 1024, bytes % 1024);
    if rest > 512 || (rest == 512 && whole % 2 == 1) {
        whole + 1
    } else {
        whole
    }
}

/// `"N KB"` below 1024 KB, otherwise megabytes to two decimals
pub fn format_size_kb(kb: u64) -> String {
    if kb < 1024 {
        format!("{} KB", kb)
    } else {
        let mb = (kb as f64 / 1024.0 * 100.0).round() / 100.0;
        format!("{} MB", mb)
    }
}

/// Keeps ASCII letters, digits and `! [ ] , ' . ;` and space
pub fn sanitize_insert(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || INSERT_PUNCTUATION.contains(*c))
        .collect()
}

/// Keeps ASCII letters, digits, space and `[ ] ( ) - & , . ; '`
pub fn sanitize_edit(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || EDIT_PUNCTUATION.contains(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(name: &str) -> Book {
        Book::from_path(&PathBuf::from("/books").join(name))
    }

    fn assert_reassembled(book: &Book) {
        assert_eq!(book.name(), book.segments().join(" - "));
        assert_eq!(book.file_name(), format!("{}{}", book.name(), book.extension()));
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn test_from_path_splits_segments() {
            let book = book("John Smith - Some Title - [40k].rar");
            assert_eq!(book.segments(), ["John Smith", "Some Title", "[40k]"]);
            assert_eq!(book.extension(), ".rar");
            assert_eq!(book.name(), "John Smith - Some Title - [40k]");
            assert_eq!(book.directory(), Path::new("/books"));
        }

        #[test]
        fn test_from_path_trims_and_lowercases() {
            let book = book("Smith, John -  Title .PDF");
            assert_eq!(book.segments(), ["Smith, John", "Title"]);
            assert_eq!(book.extension(), ".pdf");
        }

        #[test]
        fn test_from_path_single_segment() {
            let book = book("Untitled.txt");
            assert_eq!(book.segments(), ["Untitled"]);
            assert_eq!(book.segment_count(), 1);
        }

        #[test]
        fn test_from_path_without_extension() {
            let book = book("Smith, John - Title");
            assert_eq!(book.extension(), "");
            assert_eq!(book.file_name(), "Smith, John - Title");
        }

        #[test]
        fn test_size_of_missing_file_is_vanished() {
            let book = book("nope.rar");
            assert!(matches!(
                book.size_bytes(),
                Err(AutonameError::FileVanished(_))
            ));
        }

        #[test]
        fn test_size_kb_rounds() {
            let temp_dir = tempfile::TempDir::new().unwrap();
            let path = temp_dir.path().join("A - B.txt");
            fs::write(&path, vec![b'x'; 1536]).unwrap();

            let book = Book::from_path(&path);
            assert_eq!(book.size_bytes().unwrap(), 1536);
            assert_eq!(book.size_kb().unwrap(), 2);
        }
    }

    mod segment_operation_tests {
        use super::*;

        #[test]
        fn test_edit() {
            let mut book = book("A - B.rar");
            book.edit(1, "C").unwrap();
            assert_eq!(book.name(), "A - C");
            assert!(matches!(
                book.edit(2, "D"),
                Err(AutonameError::SegmentOutOfRange(3))
            ));
            assert_reassembled(&book);
        }

        #[test]
        fn test_insert_appends_and_sanitizes() {
            let mut book = book("A - B.rar");
            assert!(book.insert("  Extra/Text:?  ", None).unwrap());
            assert_eq!(book.segments(), ["A", "B", "ExtraText"]);
            assert_reassembled(&book);
        }

        #[test]
        fn test_insert_at_position() {
            let mut book = book("A - B.rar");
            book.insert("[Warhammer 40,000", Some(1)).unwrap();
            assert_eq!(book.segments(), ["A", "[Warhammer 40,000", "B"]);
        }

        #[test]
        fn test_insert_nothing_left_is_noop() {
            let mut book = book("A - B.rar");
            assert!(!book.insert("/\\:*?", None).unwrap());
            assert_eq!(book.segment_count(), 2);
        }

        #[test]
        fn test_insert_past_end_fails() {
            let mut book = book("A - B.rar");
            assert!(book.insert("C", Some(5)).is_err());
            assert_eq!(book.segment_count(), 2);
        }

        #[test]
        fn test_delete() {
            let mut book = book("A - B - C.rar");
            book.delete(1).unwrap();
            assert_eq!(book.name(), "A - C");
            assert!(book.delete(7).is_err());
        }

        #[test]
        fn test_delete_last_segment_refused() {
            let mut book = book("Only.rar");
            assert!(matches!(book.delete(0), Err(AutonameError::LastSegment)));
            assert_eq!(book.segments(), ["Only"]);
        }

        #[test]
        fn test_swap() {
            let mut book = book("Title - Author.rar");
            book.swap(1, 2).unwrap();
            assert_eq!(book.name(), "Author - Title");
        }

        #[test]
        fn test_swap_out_of_range_leaves_segments() {
            let mut book = book("A - B.rar");
            assert!(book.swap(1, 3).is_err());
            assert!(book.swap(0, 1).is_err());
            assert_eq!(book.segments(), ["A", "B"]);
        }

        #[test]
        fn test_split() {
            let mut book = book("Smith, John Some Title.rar");
            assert!(book.split(0, "Some").unwrap());
            assert_eq!(book.segments(), ["Smith, John", "Some Title"]);
            assert_reassembled(&book);
        }

        #[test]
        fn test_split_missing_delimiter_is_noop() {
            let mut book = book("A - B.rar");
            assert!(!book.split(0, "zzz").unwrap());
            assert!(!book.split(0, "").unwrap());
            assert_eq!(book.segments(), ["A", "B"]);
            assert!(book.split(4, "A").is_err());
        }

        #[test]
        fn test_split_by() {
            let mut book = book("Some Title By John Smith.pdf");
            assert!(book.split_by());
            assert_eq!(book.segments(), ["John Smith", "Some Title"]);
        }

        #[test]
        fn test_split_by_trims_punctuation() {
            let mut book = book("Great Book, by Jane Doe..pdf");
            assert!(book.split_by());
            assert_eq!(book.segments(), ["Jane Doe", "Great Book"]);
        }

        #[test]
        fn test_split_by_without_marker() {
            let mut book = book("Standby Mode.pdf");
            assert!(!book.split_by());
            assert_eq!(book.segments(), ["Standby Mode"]);
        }

        #[test]
        fn test_reverse() {
            let mut book = book("John Smith - Title.rar");
            assert_eq!(book.reverse(0).unwrap(), "Smith, John");
            assert_eq!(book.name(), "Smith, John - Title");
            assert!(book.reverse(3).is_err());
        }

        #[test]
        fn test_bracket_match() {
            let mut book = book("A - [Tag1] - [Tag2].rar");
            assert_eq!(book.bracket_match(), Some(1));
            assert_eq!(book.segments(), ["A", "[Tag1", "[Tag2]"]);
            assert_eq!(book.bracket_match(), None);
        }

        #[test]
        fn test_wrap_and_append() {
            let mut book = book("Smith, John - Series 3 - Title.rar");
            book.wrap(1, BracketSide::Open).unwrap();
            book.wrap(1, BracketSide::Close).unwrap();
            book.append_to(0, " (ed.)").unwrap();
            assert_eq!(book.name(), "Smith, John (ed.) - [Series 3] - Title");
        }

        #[test]
        fn test_strip_kinds() {
            let mut book = book("a-b [c] d.e f_g (h).rar");
            book.strip(0, StripKind::Hyphens).unwrap();
            assert_eq!(book.segments()[0], "a b [c] d.e f_g (h)");
            book.strip(0, StripKind::SquareBrackets).unwrap();
            assert_eq!(book.segments()[0], "a b c d.e f_g (h)");
            book.strip(0, StripKind::Periods).unwrap();
            assert_eq!(book.segments()[0], "a b c d e f_g (h)");
            book.strip(0, StripKind::Underscores).unwrap();
            assert_eq!(book.segments()[0], "a b c d e f g (h)");
            book.strip(0, StripKind::Parens).unwrap();
            assert_eq!(book.segments()[0], "a b c d e f g  h ");
        }
    }

    mod size_tests {
        use super::*;

        #[test]
        fn test_format_size_kb() {
            assert_eq!(format_size_kb(0), "0 KB");
            assert_eq!(format_size_kb(1023), "1023 KB");
            assert_eq!(format_size_kb(1024), "1 MB");
            assert_eq!(format_size_kb(1536), "1.5 MB");
            assert_eq!(format_size_kb(5000), "4.88 MB");
        }

        #[test]
        fn test_kilobytes_rounds_to_nearest() {
            assert_eq!(kilobytes(511), 0);
            assert_eq!(kilobytes(513), 1);
            assert_eq!(kilobytes(5_000_000), 4883);
        }

        #[test]
        fn test_kilobytes_ties_go_to_even() {
            assert_eq!(kilobytes(512), 0);
            assert_eq!(kilobytes(1536), 2);
            assert_eq!(kilobytes(2560), 2);
            assert_eq!(kilobytes(5000 * 1024 + 512), 5000);
            assert_eq!(kilobytes(5001 * 1024 + 512), 5002);
        }
    }

    mod sanitize_tests {
        use super::*;

        #[test]
        fn test_sanitize_insert() {
            assert_eq!(sanitize_insert("Tom's [Best]; ok!"), "Tom's [Best]; ok!");
            assert_eq!(sanitize_insert("a/b\\c:d(e)-f&g"), "abcdefg");
        }

        #[test]
        fn test_sanitize_edit() {
            assert_eq!(sanitize_edit("Smith & Jones (ed.) - x"), "Smith & Jones (ed.) - x");
            assert_eq!(sanitize_edit("a/b:c!?"), "abc");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Edit(usize, String),
            Insert(String, Option<usize>),
            Delete(usize),
            Swap(usize, usize),
            Split(usize, String),
            Capitalize,
            Bracket,
        }

        fn op() -> impl Strategy<Value = Op> {
            let text = "[a-zA-Z \\[\\],.]{0,12}";
            prop_oneof![
                (0usize..6, text).prop_map(|(i, t)| Op::Edit(i, t)),
                (text, proptest::option::of(0usize..6)).prop_map(|(t, p)| Op::Insert(t, p)),
                (0usize..6).prop_map(Op::Delete),
                (0usize..7, 0usize..7).prop_map(|(a, b)| Op::Swap(a, b)),
                (0usize..6, "[a-z ]{0,2}").prop_map(|(i, d)| Op::Split(i, d)),
                Just(Op::Capitalize),
                Just(Op::Bracket),
            ]
        }

        proptest! {
            /// The name is the join of the segments after every operation
            #[test]
            fn prop_name_is_join_of_segments(
                start in "[A-Za-z ,\\[\\]]{0,20}( - [A-Za-z ,\\[\\]]{0,20}){0,3}",
                ops in proptest::collection::vec(op(), 0..20)
            ) {
                let mut book = Book::from_path(&PathBuf::from(format!("/books/{}.rar", start)));
                for op in ops {
                    let before = book.segment_count();
                    match op {
                        Op::Edit(i, t) => { let _ = book.edit(i, &t); }
                        Op::Insert(t, p) => { let _ = book.insert(&t, p); }
                        Op::Delete(i) => { let _ = book.delete(i); }
                        Op::Swap(a, b) => {
                            let snapshot = book.segments().to_vec();
                            if book.swap(a, b).is_err() {
                                prop_assert_eq!(book.segments(), snapshot.as_slice());
                            }
                        }
                        Op::Split(i, d) => { let _ = book.split(i, &d); }
                        Op::Capitalize => book.capitalize(),
                        Op::Bracket => { book.bracket_match(); }
                    }
                    prop_assert!(book.segment_count() >= 1);
                    prop_assert!(book.segment_count() + 1 >= before);
                    prop_assert_eq!(book.name(), book.segments().join(" - "));
                }
            }

            /// Deleting never drops below one segment
            #[test]
            fn prop_delete_keeps_one_segment(
                count in 1usize..6,
                deletes in proptest::collection::vec(0usize..6, 0..12)
            ) {
                let names: Vec<String> = (0..count).map(|i| format!("S{}", i)).collect();
                let path = PathBuf::from(format!("/b/{}.rar", names.join(" - ")));
                let mut book = Book::from_path(&path);
                for index in deletes {
                    let _ = book.delete(index);
                    prop_assert!(book.segment_count() >= 1);
                }
            }
        }
    }
}
