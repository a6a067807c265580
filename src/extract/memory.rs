//! Memory record extraction.
//!
//! A `memory` block carries a JSON record the backend stores about the user.
//! It is lifted out of the message; an undecodable record is dropped, but
//! the block is still removed.

use crate::core::BlockType;
use crate::extract::{remove_spans, spans_of};
use crate::parser::{Parser, decode_lenient};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Message text and the memory record it carried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryExtraction {
    /// Message text without any `memory` block.
    pub message: String,
    /// Record from the first `memory` block, when it decodes to an object.
    pub memory: Option<Value>,
}

/// Extracts the memory record with the default parser.
#[must_use]
pub fn extract_memory(input: &str) -> MemoryExtraction {
    extract_memory_with(&Parser::new(), input)
}

/// Extracts the memory record using `parser`.
#[must_use]
pub fn extract_memory_with(parser: &Parser, input: &str) -> MemoryExtraction {
    let segments = parser.parse(input);

    let memory = segments
        .iter()
        .find(|segment| segment.block_type() == Some(BlockType::Memory))
        .and_then(|segment| match decode_lenient::<Value>(&segment.content) {
            Ok(value @ Value::Object(_)) => Some(value),
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "dropping undecodable memory record");
                None
            }
        });

    let spans = spans_of(&segments, |t| *t == BlockType::Memory);
    MemoryExtraction {
        message: remove_spans(input, &spans),
        memory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_memory() {
        let input = r#"Noted. [BLOCK:{"type":"memory","lang":"eng"}]{"memory_content":"likes Rust","memory_weight":3}[/BLOCK]"#;
        let out = extract_memory(input);
        assert_eq!(out.message, "Noted.");
        assert_eq!(
            out.memory,
            Some(json!({"memory_content": "likes Rust", "memory_weight": 3}))
        );
    }

    #[test]
    fn test_bad_record_still_removed() {
        let out = extract_memory(r#"hi [BLOCK:{"type":"memory"}]{oops[/BLOCK]"#);
        assert_eq!(out.message, "hi");
        assert_eq!(out.memory, None);
    }

    #[test]
    fn test_no_memory() {
        let out = extract_memory("plain");
        assert_eq!(out.message, "plain");
        assert!(out.memory.is_none());
    }
}
