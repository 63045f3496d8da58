//! Text transforms applied to filename segments
//!
//! Everything here is a pure function over strings. The segment model in
//! [`crate::domain::book`] calls into these and reassembles afterwards.

use thiserror::Error;

/// Deepest conjunction nesting accepted by [`format_name`]
pub const MAX_NAME_DEPTH: usize = 16;

const CONJUNCTIONS: [&str; 3] = ["and", "with", "With"];

/// Literal fixups applied after title-casing, in this exact order.
///
/// Later entries rely on earlier ones: `Ii -> II` turns `Iii` into `IIi`,
/// which `IIi -> III` then finishes.
pub const TITLE_FIXUPS: &[(&str, &str)] = &[
    ("Ii", "II"),
    ("And ", "and "),
    ("In ", "in "),
    ("Of ", "of "),
    ("To ", "to "),
    ("Rtf", "rtf"),
    ("An ", "an "),
    ("The ", "the "),
    ("Iii ", "III "),
    ("De ", "de "),
    ("A ", "a "),
    ("\u{92}S", "'s"),
    ("'S", "'s"),
    ("Cia ", "C.I.A. "),
    ("Nasa", "NASA"),
    ("Kgb", "KGB"),
    ("Mig ", "MiG "),
    ("Viii", "VIII"),
    (" Iv ", " IV "),
    ("Fbi ", "F.B.I. "),
    ("Mcc", "McC"),
    ("(Ed.)", "(ed.)"),
    ("Et. Al.", "et. al."),
    ("Trans ", "trans. "),
    ("Trans. ", "trans. "),
    ("On ", "on "),
    ("1St", "1st"),
    ("7Th", "7th"),
    ("[Ssc]", "[SSC]"),
    ("Et Al", "et. al."),
    ("Von ", "von "),
    ("Bc ", "BC "),
    ("Mch", "McH"),
    ("Ss", "SS"),
    ("Raf ", "R.A.F. "),
    ("'S ", "'s "),
    ("Mcn", "McN"),
    ("a. ", "A. "),
    (" Bc", " BC"),
    ("\u{2019}S", "'s"),
    ("Wwii", "WWII"),
    ("Mcm", "McM"),
    ("Macn", "MacN"),
    ("SSc", "SSC"),
    (" Iv", " IV"),
    (" At ", " at "),
    ("\u{2013}", "-"),
    (" By ", " by "),
    ("40k", "40,000"),
    ("40K", "40,000"),
    ("Translated By", "translated by"),
    ("Sf ", "SF "),
    ("2Nd", "2nd"),
    ("3Rd", "3rd"),
    ("4Th", "4th"),
    ("5Th", "5th"),
    ("6Th", "6th"),
    ("8Th", "8th"),
    ("9Th", "9th"),
    ("(ed)", "(ed.)"),
    ("IIi", "III"),
    ("10Th", "10th"),
    ("Mcp", "McP"),
    ("Gui ", "GUI "),
    ("O'r", "O'R"),
    ("Mcd", "McD"),
    ("Macl", "MacL"),
    ("Mcl", "McL"),
    ("n'T", "n't"),
    (" As ", " as "),
    ("Ad ", "AD "),
    ("0S", "0s"),
    ("'Ll", "'ll"),
    ("Vs ", "vs "),
];

/// Reasons a name cannot be reversed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("there is no name to reverse")]
    Blank,
    #[error("too many joined names to reverse (limit {MAX_NAME_DEPTH})")]
    TooManyNames,
}

/// Converts "First Middle Last" into "Last, First Middle".
///
/// Multiple authors joined by `and`/`with` (or `&`) are reversed one by one
/// and rejoined with `" and "`. A conjunction in second position, as in
/// "John and Jane Smith", keeps the whole string as a single name. Trailing
/// `(ed)` and `Jr` markers are set aside and restored as `(ed.)` and `Jr.`.
pub fn format_name(text: &str) -> Result<String, NameError> {
    format_name_at(text, 0)
}

fn format_name_at(text: &str, depth: usize) -> Result<String, NameError> {
    if depth > MAX_NAME_DEPTH {
        return Err(NameError::TooManyNames);
    }

    let text = text.replace('&', "and");
    let mut tokens: Vec<&str> = text.trim().split(' ').collect();

    let editor = matches!(tokens.last(), Some(&"(ed)") | Some(&"(ed.)"));
    if editor {
        tokens.pop();
    }
    let junior = matches!(tokens.last(), Some(&"Jr") | Some(&"Jr."));
    if junior {
        tokens.pop();
    }
    if tokens.iter().all(|t| t.is_empty()) {
        return Err(NameError::Blank);
    }

    let conjunction = tokens.iter().position(|t| CONJUNCTIONS.contains(t));
    let mut reversed = match conjunction {
        Some(at) if at > 1 && at + 1 < tokens.len() => format!(
            "{} and {}",
            format_name_at(&tokens[..at].join(" "), depth + 1)?,
            format_name_at(&tokens[at + 1..].join(" "), depth + 1)?
        ),
        _ => reverse_single(&tokens),
    };

    if junior {
        reversed.push_str(" Jr.");
    }
    if editor {
        reversed.push_str(" (ed.)");
    }
    Ok(reversed)
}

fn reverse_single(tokens: &[&str]) -> String {
    let Some((last, rest)) = tokens.split_last() else {
        return String::new();
    };
    if rest.is_empty() {
        return pad_initial(last);
    }

    let rest: Vec<String> = rest.iter().map(|t| pad_initial(t)).collect();
    format!("{}, {}", pad_initial(last), rest.join(" "))
}

fn pad_initial(token: &str) -> String {
    if token.chars().count() == 1 {
        format!("{}.", token)
    } else {
        token.to_string()
    }
}

/// Title-cases a single segment and applies [`TITLE_FIXUPS`].
pub fn capitalize(segment: &str) -> String {
    let mut text = title_case(segment);
    for (pattern, replacement) in TITLE_FIXUPS {
        if text.contains(pattern) {
            text = text.replace(pattern, replacement);
        }
    }
    capitalize_first(&text)
}

/// Uppercases a cased character that follows an uncased one and lowercases
/// the rest, so digits and apostrophes start new words.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_cased = false;

    for c in text.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased && previous_cased {
            out.extend(c.to_lowercase());
        } else if cased {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        previous_cased = cased;
    }
    out
}

fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(open @ ('[' | '(')) => match chars.next() {
            Some(c) => format!("{}{}{}", open, c.to_uppercase(), chars.as_str()),
            None => segment.to_string(),
        },
        Some(first) if !segment.contains("translated by") => {
            format!("{}{}", first.to_uppercase(), chars.as_str())
        }
        _ => segment.to_string(),
    }
}

/// Drops the `]` from the first segment carrying one when the joined name
/// has more than one. Returns the index of the segment that changed.
pub fn repair_brackets(segments: &mut [String]) -> Option<usize> {
    let closers: usize = segments.iter().map(|s| s.matches(']').count()).sum();
    if closers <= 1 {
        return None;
    }

    let index = segments.iter().position(|s| s.contains(']'))?;
    segments[index] = segments[index].replace(']', "");
    Some(index)
}
