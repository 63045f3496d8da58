// Small formatting helpers for the render functions
use crate::domain::book::{format_size_kb, kilobytes};

/// Formats a byte count the way the header shows book sizes
pub fn format_file_size(bytes: u64) -> String {
    format_size_kb(kilobytes(bytes))
}

/// Share of the session that is done, in `0.0..=1.0`
pub fn calculate_progress(completed: usize, remaining: usize) -> f64 {
    let total = completed + remaining;
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    }
}

/// Shortens `text` to at most `width` characters, ending in `…` when cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut short: String = text.chars().take(width - 1).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 KB");
        assert_eq!(format_file_size(2048), "2 KB");
        assert_eq!(format_file_size(1536 * 1024), "1.5 MB");
    }

    #[test]
    fn test_calculate_progress() {
        assert_eq!(calculate_progress(0, 0), 0.0);
        assert_eq!(calculate_progress(1, 3), 0.25);
        assert_eq!(calculate_progress(4, 0), 1.0);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 0), "");
    }
}
