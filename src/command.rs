//! Parsing of the one-line command language

use crate::domain::{BracketSide, StripKind};
use crate::error::{AutonameError, Result};

/// A parsed command. Segment indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Empty input
    Noop,
    FindDuplicates,
    SplitBy,
    Compress,
    Reverse(usize),
    Open,
    Help,
    Capitalize,
    /// Split the segment on a delimiter asked for interactively
    Split(usize),
    /// Swap two segments, by their 1-based numbers
    Swap(usize, usize),
    FinalizeMove,
    FinalizeInPlace,
    /// Append a segment asked for interactively
    AddSegment,
    Warhammer40k,
    ShortStoryCollection,
    Translated,
    Editor,
    Bracket(BracketSide, usize),
    Undo,
    Delete,
    Strip(StripKind, usize),
}

/// Command reference shown by `h`
pub const HELP: &[(&str, &str)] = &[
    ("q", "Quit"),
    ("(empty)", "Do nothing"),
    ("fd", "Search the output directory for duplicates"),
    ("by", "Split at \" by \" and move the author to the front"),
    ("rar", "Compress the file with the external archiver"),
    ("rX", "Reverse the name in segment X (default 1)"),
    ("o", "Open the file with the default application"),
    ("h", "Show this help"),
    ("c", "Title-case every segment"),
    ("splX", "Split segment X (default 1) on a prompted delimiter"),
    ("XY", "Swap segments X and Y"),
    ("f", "Check and rename in place"),
    ("fff", "Check, rename and move to the output directory"),
    ("as", "Add a segment"),
    ("40k", "Insert [Warhammer 40,000 as segment 2"),
    ("ssc", "Insert [SSC] as segment 2"),
    ("trans", "Append \"translated by\""),
    ("ed", "Append (ed.) to the author"),
    ("[X / ]X", "Add [ to the start / ] to the end of segment X (default 1)"),
    ("undo", "Discard all edits"),
    ("ddd", "Delete the file"),
    ("d-X", "Hyphens to spaces in segment X (default 1)"),
    ("d[X", "Remove square brackets from segment X"),
    ("d.X", "Full stops to spaces in segment X"),
    ("d_X", "Underscores to spaces in segment X"),
    ("d(X", "Parentheses to spaces in segment X"),
];

/// Converts a 1-based segment number to an index. Empty means segment 1.
fn segment_index(text: &str) -> Result<usize> {
    if text.is_empty() {
        return Ok(0);
    }
    match text.parse::<usize>() {
        Ok(number) if number > 0 => Ok(number - 1),
        _ => Err(AutonameError::InvalidSegmentNumber(text.to_string())),
    }
}

fn strip_kind(marker: char) -> Option<StripKind> {
    match marker {
        '-' => Some(StripKind::Hyphens),
        '[' => Some(StripKind::SquareBrackets),
        '.' => Some(StripKind::Periods),
        '_' => Some(StripKind::Underscores),
        '(' => Some(StripKind::Parens),
        _ => None,
    }
}

impl Command {
    /// Parses one command line. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Command> {
        let cmd = input.trim();

        let command = match cmd {
            "q" => Command::Quit,
            "" => Command::Noop,
            "fd" => Command::FindDuplicates,
            "by" => Command::SplitBy,
            "rar" => Command::Compress,
            "o" => Command::Open,
            "h" => Command::Help,
            "fff" => Command::FinalizeMove,
            "f" => Command::FinalizeInPlace,
            "as" => Command::AddSegment,
            "40k" => Command::Warhammer40k,
            "ssc" => Command::ShortStoryCollection,
            "trans" => Command::Translated,
            "ed" => Command::Editor,
            "undo" => Command::Undo,
            "ddd" => Command::Delete,
            _ => return Self::parse_numbered(cmd),
        };
        Ok(command)
    }

    fn parse_numbered(cmd: &str) -> Result<Command> {
        let unknown = || AutonameError::UnknownCommand(cmd.to_string());

        if cmd.len() == 2 && cmd.chars().all(|c| c.is_ascii_digit()) {
            let mut digits = cmd.chars().filter_map(|c| c.to_digit(10));
            return match (digits.next(), digits.next()) {
                (Some(a), Some(b)) => Ok(Command::Swap(a as usize, b as usize)),
                _ => Err(unknown()),
            };
        }
        if let Some(rest) = cmd.strip_prefix("spl") {
            return Ok(Command::Split(segment_index(rest)?));
        }
        if let Some(rest) = cmd.strip_prefix('r') {
            return Ok(Command::Reverse(segment_index(rest)?));
        }
        if let Some(rest) = cmd.strip_prefix('c') {
            if rest.chars().all(|c| c.is_ascii_digit()) {
                return Ok(Command::Capitalize);
            }
            return Err(unknown());
        }
        if let Some(rest) = cmd.strip_prefix('[') {
            return Ok(Command::Bracket(BracketSide::Open, segment_index(rest)?));
        }
        if let Some(rest) = cmd.strip_prefix(']') {
            return Ok(Command::Bracket(BracketSide::Close, segment_index(rest)?));
        }
        if let Some(rest) = cmd.strip_prefix('d') {
            let mut chars = rest.chars();
            if let Some(kind) = chars.next().and_then(strip_kind) {
                return Ok(Command::Strip(kind, segment_index(chars.as_str())?));
            }
        }
        Err(unknown())
    }

    /// Whether the command may run after the current file disappeared
    pub fn skips_presence_check(&self) -> bool {
        matches!(self, Command::Quit | Command::Help)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Command {
        Command::parse(input).unwrap()
    }

    #[test]
    fn test_plain_commands() {
        assert_eq!(parse("q"), Command::Quit);
        assert_eq!(parse(""), Command::Noop);
        assert_eq!(parse("   "), Command::Noop);
        assert_eq!(parse("fd"), Command::FindDuplicates);
        assert_eq!(parse("by"), Command::SplitBy);
        assert_eq!(parse("rar"), Command::Compress);
        assert_eq!(parse("o"), Command::Open);
        assert_eq!(parse("h"), Command::Help);
        assert_eq!(parse("fff"), Command::FinalizeMove);
        assert_eq!(parse("f"), Command::FinalizeInPlace);
        assert_eq!(parse("as"), Command::AddSegment);
        assert_eq!(parse("40k"), Command::Warhammer40k);
        assert_eq!(parse("ssc"), Command::ShortStoryCollection);
        assert_eq!(parse("trans"), Command::Translated);
        assert_eq!(parse("ed"), Command::Editor);
        assert_eq!(parse("undo"), Command::Undo);
        assert_eq!(parse("ddd"), Command::Delete);
    }

    #[test]
    fn test_reverse_defaults_to_first_segment() {
        assert_eq!(parse("r"), Command::Reverse(0));
        assert_eq!(parse("r3"), Command::Reverse(2));
        assert_eq!(parse(" r2 "), Command::Reverse(1));
    }

    #[test]
    fn test_capitalize_ignores_number() {
        assert_eq!(parse("c"), Command::Capitalize);
        assert_eq!(parse("c2"), Command::Capitalize);
        assert!(Command::parse("cat").is_err());
    }

    #[test]
    fn test_split() {
        assert_eq!(parse("spl"), Command::Split(0));
        assert_eq!(parse("spl2"), Command::Split(1));
    }

    #[test]
    fn test_swap() {
        assert_eq!(parse("12"), Command::Swap(1, 2));
        assert_eq!(parse("31"), Command::Swap(3, 1));
        assert_eq!(parse("10"), Command::Swap(1, 0));
    }

    #[test]
    fn test_brackets() {
        assert_eq!(parse("["), Command::Bracket(BracketSide::Open, 0));
        assert_eq!(parse("[2"), Command::Bracket(BracketSide::Open, 1));
        assert_eq!(parse("]3"), Command::Bracket(BracketSide::Close, 2));
    }

    #[test]
    fn test_strip_family() {
        assert_eq!(parse("d-"), Command::Strip(StripKind::Hyphens, 0));
        assert_eq!(parse("d[2"), Command::Strip(StripKind::SquareBrackets, 1));
        assert_eq!(parse("d.1"), Command::Strip(StripKind::Periods, 0));
        assert_eq!(parse("d_3"), Command::Strip(StripKind::Underscores, 2));
        assert_eq!(parse("d(2"), Command::Strip(StripKind::Parens, 1));
    }

    #[test]
    fn test_segment_zero_rejected() {
        for input in ["r0", "spl0", "[0", "d-0"] {
            assert!(matches!(
                Command::parse(input),
                Err(AutonameError::InvalidSegmentNumber(_))
            ));
        }
    }

    #[test]
    fn test_bad_numbers_rejected() {
        for input in ["rx", "splat", "]a", "d.-"] {
            assert!(matches!(
                Command::parse(input),
                Err(AutonameError::InvalidSegmentNumber(_))
            ));
        }
    }

    #[test]
    fn test_unknown_commands() {
        for input in ["x", "123", "dd", "d", "quit", "F"] {
            assert!(
                matches!(Command::parse(input), Err(AutonameError::UnknownCommand(_))),
                "{} should be unknown",
                input
            );
        }
    }

    #[test]
    fn test_presence_check_exemptions() {
        assert!(Command::Quit.skips_presence_check());
        assert!(Command::Help.skips_presence_check());
        assert!(!Command::FinalizeInPlace.skips_presence_check());
    }

    #[test]
    fn test_help_covers_commands() {
        let keys: Vec<&str> = HELP.iter().map(|(k, _)| *k).collect();
        for key in ["q", "fd", "rar", "fff", "ddd", "d(X"] {
            assert!(keys.contains(&key));
        }
    }
}
