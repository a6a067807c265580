//! Extractors built on the block parser.
//!
//! Each extractor pulls one kind of out-of-band data from a message (the chat
//! title, a memory record, media for the library view) or removes blocks a
//! downstream consumer should not see.

pub mod media;
pub mod memory;
pub mod title;

pub use media::{FileEntry, MediaKind, MediaLibrary, extract_media, extract_media_with};
pub use memory::{MemoryExtraction, extract_memory, extract_memory_with};
pub use title::{TitleExtraction, extract_title, extract_title_with};

use crate::core::{BlockType, Segment};
use crate::parser::Parser;
use std::ops::Range;

/// Block types stripped from a message before it is forwarded.
pub const DEFAULT_STRIP_TYPES: [BlockType; 2] = [BlockType::RagItem, BlockType::Memory];

/// Removes every block of the given types, keeping the rest of the text
/// verbatim.
///
/// # Examples
///
/// ```
/// use blockstream::core::BlockType;
/// use blockstream::extract::strip_blocks;
///
/// let input = r#"[BLOCK:{"type":"RAGItem"}]{"filename":"a.pdf"}[/BLOCK] summarize this"#;
/// assert_eq!(strip_blocks(input, &[BlockType::RagItem]), "summarize this");
/// ```
#[must_use]
pub fn strip_blocks(input: &str, types: &[BlockType]) -> String {
    strip_blocks_with(&Parser::new(), input, types)
}

/// Removes every block of the given types using `parser`.
#[must_use]
pub fn strip_blocks_with(parser: &Parser, input: &str, types: &[BlockType]) -> String {
    let segments = parser.parse(input);
    let spans = spans_of(&segments, |block_type| types.contains(block_type));
    remove_spans(input, &spans)
}

/// Spans of typed blocks whose type satisfies `predicate`, in source order.
pub(crate) fn spans_of(
    segments: &[Segment],
    predicate: impl Fn(&BlockType) -> bool,
) -> Vec<Range<usize>> {
    segments
        .iter()
        .filter(|segment| segment.block_type().is_some_and(|t| predicate(&t)))
        .map(|segment| segment.span.clone())
        .collect()
}

/// Cuts ordered, non-overlapping spans out of `input` and trims the result.
pub(crate) fn remove_spans(input: &str, spans: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for span in spans {
        out.push_str(&input[last..span.start]);
        last = span.end;
    }
    out.push_str(&input[last..]);
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_keeps_other_blocks() {
        let input = r#"a [BLOCK:{"type":"memory"}]{"k":1}[/BLOCK] b [BLOCK:{"type":"code"}]x[/BLOCK]"#;
        let stripped = strip_blocks(input, &DEFAULT_STRIP_TYPES);
        assert_eq!(stripped, r#"a  b [BLOCK:{"type":"code"}]x[/BLOCK]"#);
    }

    #[test]
    fn test_strip_leaves_malformed_blocks() {
        let input = r#"[BLOCK:{bad}]x[/BLOCK]"#;
        assert_eq!(strip_blocks(input, &DEFAULT_STRIP_TYPES), input);
    }

    #[test]
    fn test_strip_nothing_to_remove() {
        assert_eq!(strip_blocks("  hello  ", &[BlockType::Title]), "hello");
    }

    #[test]
    fn test_remove_spans() {
        assert_eq!(remove_spans("abcdef", &[1..2, 4..5]), "acdf");
        assert_eq!(remove_spans("abc", &[]), "abc");
    }
}
