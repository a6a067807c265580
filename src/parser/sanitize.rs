//! JSON sanitization.
//!
//! Model output is not guaranteed to be strictly valid JSON: smart quotes,
//! stray control characters, and non-breaking spaces are common. Headers
//! and bodies go through [`sanitize`] before they are decoded.

use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// Normalizes text before a JSON decode attempt.
///
/// - strips C0 and C1 control characters (`U+0000..=U+001F`, `U+007F..=U+009F`)
/// - maps curly single quotes to `'` and curly double quotes to `"`
/// - maps en and em dashes to `-`
/// - maps the non-breaking space to a regular space
/// - trims surrounding whitespace
///
/// Borrows the input when nothing needs to change.
///
/// # Examples
///
/// ```
/// use blockstream::parser::sanitize;
///
/// assert_eq!(sanitize("  {\u{201C}type\u{201D}:\u{201C}code\u{201D}} "), r#"{"type":"code"}"#);
/// ```
#[must_use]
pub fn sanitize(input: &str) -> Cow<'_, str> {
    let trimmed = input.trim();
    if !trimmed.chars().any(needs_sanitizing) {
        return Cow::Borrowed(trimmed);
    }

    let cleaned: String = trimmed.chars().filter_map(sanitize_char).collect();
    Cow::Owned(cleaned.trim().to_string())
}

const fn needs_sanitizing(c: char) -> bool {
    !matches!(sanitize_char(c), Some(mapped) if mapped == c)
}

const fn sanitize_char(c: char) -> Option<char> {
    match c {
        '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}' => None,
        '\u{2018}' | '\u{2019}' => Some('\''),
        '\u{201C}' | '\u{201D}' => Some('"'),
        '\u{2013}' | '\u{2014}' => Some('-'),
        '\u{00A0}' => Some(' '),
        other => Some(other),
    }
}

/// Decodes JSON leniently.
///
/// The sanitized text is tried first. Sanitizing can corrupt an otherwise
/// valid document (curly quotes inside a string value become bare `"`), so
/// on failure the raw text is tried as well. When both fail, the error from
/// the sanitized attempt is returned.
///
/// # Errors
///
/// Returns the decoder error when neither form decodes.
pub fn decode_lenient<T: DeserializeOwned>(input: &str) -> Result<T, serde_json::Error> {
    let cleaned = sanitize(input);
    match serde_json::from_str(&cleaned) {
        Ok(value) => Ok(value),
        Err(err) => match cleaned {
            Cow::Borrowed(_) => Err(err),
            Cow::Owned(_) => serde_json::from_str(input).map_err(|_| err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_sanitize_borrows_clean_input() {
        assert!(matches!(sanitize(r#"{"type":"code"}"#), Cow::Borrowed(_)));
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize("{\"a\":\u{0007}1\u{0085}}"), r#"{"a":1}"#);
        assert_eq!(sanitize("{\n  \"a\": 1\n}"), r#"{  "a": 1}"#);
    }

    #[test]
    fn test_sanitize_normalizes_punctuation() {
        assert_eq!(sanitize("\u{2018}a\u{2019}"), "'a'");
        assert_eq!(sanitize("\u{201C}a\u{201D}"), "\"a\"");
        assert_eq!(sanitize("a\u{2013}b\u{2014}c"), "a-b-c");
        assert_eq!(sanitize("a\u{00A0}b"), "a b");
    }

    #[test]
    fn test_sanitize_trims() {
        assert_eq!(sanitize("\u{00A0} x \t"), "x");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_decode_lenient_smart_quotes() {
        let value: Value = decode_lenient("{\u{201C}type\u{201D}: \u{201C}code\u{201D}}").unwrap();
        assert_eq!(value, json!({"type": "code"}));
    }

    #[test]
    fn test_decode_lenient_raw_newline_in_string() {
        let value: Value = decode_lenient("{\"text\": \"line one\nline two\"}").unwrap();
        assert_eq!(value, json!({"text": "line oneline two"}));
    }

    #[test]
    fn test_decode_lenient_falls_back_to_raw() {
        // Curly quotes inside a string value are content, not delimiters
        let raw = "{\"title\": \"He said \u{201C}hi\u{201D}\"}";
        let value: Value = decode_lenient(raw).unwrap();
        assert_eq!(value["title"], "He said \u{201C}hi\u{201D}");
    }

    #[test]
    fn test_decode_lenient_reports_error() {
        let result: Result<Value, _> = decode_lenient("{not json}");
        assert!(result.is_err());
    }
}
