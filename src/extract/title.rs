//! Chat title extraction.
//!
//! The assistant announces the chat title in a `title` block. The first one
//! names the chat; all of them are removed from the displayed message.

use crate::core::BlockType;
use crate::extract::{remove_spans, spans_of};
use crate::parser::Parser;
use serde::Serialize;

/// Title and the message with title blocks removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleExtraction {
    /// Body of the first non-empty `title` block.
    pub title: Option<String>,
    /// Message text without any `title` block.
    pub cleaned: String,
}

/// Extracts the title with the default parser.
///
/// # Examples
///
/// ```
/// use blockstream::extract::extract_title;
///
/// let out = extract_title(r#"[BLOCK:{"type":"title","lang":"eng"}] Rust tips [/BLOCK]Here you go."#);
/// assert_eq!(out.title.as_deref(), Some("Rust tips"));
/// assert_eq!(out.cleaned, "Here you go.");
/// ```
#[must_use]
pub fn extract_title(input: &str) -> TitleExtraction {
    extract_title_with(&Parser::new(), input)
}

/// Extracts the title using `parser`.
#[must_use]
pub fn extract_title_with(parser: &Parser, input: &str) -> TitleExtraction {
    let segments = parser.parse(input);

    let title = segments
        .iter()
        .filter(|segment| segment.block_type() == Some(BlockType::Title))
        .map(|segment| segment.content.as_str())
        .find(|content| !content.is_empty())
        .map(str::to_string);

    let spans = spans_of(&segments, |t| *t == BlockType::Title);
    TitleExtraction {
        title,
        cleaned: remove_spans(input, &spans),
    }
}
