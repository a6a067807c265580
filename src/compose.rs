//! Block composition.
//!
//! The send path writes blocks in the same grammar the parser reads:
//!
//! ```text
//! [BLOCK:{"type":"Tag","lang":"null"}]
//! { ...json body... }
//! [/BLOCK]
//! ```
//!
//! A block is only written if the parser will read it back unchanged, so a
//! raw body containing a marker or an oversized header is rejected. JSON
//! bodies escape markers inside string values instead.

use crate::annotation::Annotation;
use crate::core::{BlockMeta, BlockType};
use crate::dispatch::payload::RagItemPayload;
use crate::error::{BlockError, Result};
use crate::parser::{CLOSE_MARKER, DEFAULT_MAX_HEADER_LEN, OPEN_MARKER};
use serde::Serialize;

/// Writes blocks in the block grammar.
///
/// # Examples
///
/// ```
/// use blockstream::compose::BlockWriter;
/// use blockstream::core::BlockMeta;
///
/// let writer = BlockWriter::new();
/// let block = writer.write(&BlockMeta::new("code").with_lang("rust"), "fn main() {}").unwrap();
/// assert_eq!(block, "[BLOCK:{\"type\":\"code\",\"lang\":\"rust\"}]\nfn main() {}\n[/BLOCK]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockWriter {
    max_header_len: usize,
}

impl Default for BlockWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockWriter {
    /// Creates a writer whose headers fit the default parser bound.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_header_len: DEFAULT_MAX_HEADER_LEN,
        }
    }

    /// Sets the header length bound; match the reader's configuration.
    #[must_use]
    pub const fn with_max_header_len(mut self, len: usize) -> Self {
        self.max_header_len = len;
        self
    }

    /// Writes a block with a raw body.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::Encode`] if the header is too long or either
    /// part contains a block marker.
    pub fn write(&self, meta: &BlockMeta, body: &str) -> Result<String> {
        let encode_error = |message: &str| BlockError::Encode {
            block_type: meta.block_type.clone(),
            message: message.to_string(),
        };

        let header = serde_json::to_string(meta).map_err(|e| encode_error(&e.to_string()))?;
        if header.len() > self.max_header_len {
            return Err(encode_error("header exceeds the maximum header length").into());
        }
        if contains_marker(&header) {
            return Err(encode_error("header contains a block marker").into());
        }
        if contains_marker(body) {
            return Err(encode_error("body contains a block marker").into());
        }

        Ok(format!("{OPEN_MARKER}{header}]\n{}\n{CLOSE_MARKER}", body.trim()))
    }

    /// Writes a block whose body is `value` as pretty-printed JSON.
    ///
    /// Marker text inside string values is written with an escaped `[`, so
    /// a value may quote another annotated message.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::Encode`] if `value` cannot be serialized or the
    /// block cannot be written.
    pub fn write_json<T: Serialize + ?Sized>(&self, meta: &BlockMeta, value: &T) -> Result<String> {
        let body = serde_json::to_string_pretty(value).map_err(|e| BlockError::Encode {
            block_type: meta.block_type.clone(),
            message: e.to_string(),
        })?;
        self.write(meta, &escape_markers(&body))
    }
}

// In serialized JSON a marker can only occur inside a string literal.
fn escape_markers(json: &str) -> String {
    json.replace(OPEN_MARKER, "\\u005bBLOCK:")
        .replace(CLOSE_MARKER, "\\u005b/BLOCK]")
}

fn contains_marker(text: &str) -> bool {
    text.contains(OPEN_MARKER) || text.contains(CLOSE_MARKER)
}

/// Writes a block with a raw body using the default writer.
///
/// # Errors
///
/// See [`BlockWriter::write`].
pub fn compose_block(meta: &BlockMeta, body: &str) -> Result<String> {
    BlockWriter::new().write(meta, body)
}

/// Writes a block with a JSON body using the default writer.
///
/// # Errors
///
/// See [`BlockWriter::write_json`].
pub fn compose_json_block<T: Serialize + ?Sized>(meta: &BlockMeta, value: &T) -> Result<String> {
    BlockWriter::new().write_json(meta, value)
}

/// Assembles an outgoing user message.
///
/// The uploaded file block comes first, then the annotation block, then the
/// typed text. Empty parts are skipped.
///
/// # Errors
///
/// Fails if a block cannot be written.
pub fn compose_outgoing(
    message: &str,
    rag_item: Option<&RagItemPayload>,
    annotation: Option<&Annotation>,
) -> Result<String> {
    let mut parts = Vec::with_capacity(3);

    if let Some(item) = rag_item {
        let meta = BlockMeta::new(BlockType::RagItem.as_str()).with_lang("null");
        parts.push(compose_json_block(&meta, item)?);
    }
    if let Some(annotation) = annotation {
        parts.push(annotation.to_block()?);
    }
    let message = message.trim();
    if !message.is_empty() {
        parts.push(message.to_string());
    }

    Ok(parts.join(" "))
}
