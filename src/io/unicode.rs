//! Unicode utilities for previews.
//!
//! Previews are cut on grapheme cluster boundaries so that truncating a
//! highlighted excerpt never splits an emoji or a combining sequence.

use unicode_segmentation::UnicodeSegmentation;

/// Marker appended to truncated previews.
pub const ELLIPSIS: &str = "...";

/// Counts the number of grapheme clusters in a string.
///
/// # Examples
///
/// ```
/// use blockstream::io::unicode::grapheme_count;
///
/// assert_eq!(grapheme_count("Hello"), 5);
/// assert_eq!(grapheme_count("世界"), 2);
/// ```
#[must_use]
pub fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Truncates a string at a grapheme cluster boundary.
///
/// Returns a slice containing at most `max_graphemes` grapheme clusters.
#[must_use]
pub fn truncate_graphemes(s: &str, max_graphemes: usize) -> &str {
    let end_byte = s
        .grapheme_indices(true)
        .nth(max_graphemes)
        .map_or(s.len(), |(idx, _)| idx);
    &s[..end_byte]
}

/// Builds a single-line preview of at most `max_graphemes` clusters.
///
/// Line breaks are folded into spaces. When the text is longer than the
/// bound, the cut is made at the bound and [`ELLIPSIS`] is appended.
///
/// # Examples
///
/// ```
/// use blockstream::io::preview;
///
/// assert_eq!(preview("short", 10), "short");
/// assert_eq!(preview("a longer line", 8), "a longer...");
/// ```
#[must_use]
pub fn preview(s: &str, max_graphemes: usize) -> String {
    let single_line = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if grapheme_count(&single_line) <= max_graphemes {
        return single_line;
    }
    let cut = truncate_graphemes(&single_line, max_graphemes).trim_end();
    format!("{cut}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grapheme_count() {
        assert_eq!(grapheme_count("Hello"), 5);
        assert_eq!(grapheme_count("世界"), 2);
        assert_eq!(grapheme_count(""), 0);
    }

    #[test]
    fn test_truncate_graphemes() {
        assert_eq!(truncate_graphemes("Hello", 3), "Hel");
        assert_eq!(truncate_graphemes("世界!", 2), "世界");
        assert_eq!(truncate_graphemes("Hello", 10), "Hello");
        assert_eq!(truncate_graphemes("Hello", 0), "");
    }

    #[test]
    fn test_truncate_keeps_combined_emoji() {
        // Family emoji is a single grapheme made of several code points
        let s = "👨‍👩‍👧 family";
        assert_eq!(truncate_graphemes(s, 1), "👨‍👩‍👧");
    }

    #[test]
    fn test_preview_within_bound() {
        assert_eq!(preview("exactly ten", 11), "exactly ten");
    }

    #[test]
    fn test_preview_truncates_with_ellipsis() {
        assert_eq!(preview("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_preview_folds_newlines() {
        assert_eq!(preview("line one\n  line two", 40), "line one line two");
    }

    #[test]
    fn test_preview_trims_before_ellipsis() {
        assert_eq!(preview("ab cd", 3), "ab...");
    }
}
