//! Segment representation.
//!
//! A segment is the parser's unit of output: either a run of plain text or
//! a typed block. Each segment remembers the byte range it was cut from so
//! that consumers can splice the source (title removal, block stripping)
//! without re-scanning it.

use crate::core::BlockType;
use crate::error::BlockError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::Range;

/// Kind of a parsed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Narrative text between (or instead of) blocks.
    PlainText,
    /// A `[BLOCK:{...}]...[/BLOCK]` span with a decoded header.
    TypedBlock,
}

/// Parsed block header.
///
/// Carries the declared `type`, the optional `lang` hint, and every other
/// header field verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockMeta {
    /// Declared block type, exactly as written by the producer.
    #[serde(rename = "type")]
    pub block_type: String,

    /// Language hint (syntax highlighting for code, locale for text).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Remaining header fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockMeta {
    /// Creates a header with the given type and no other fields.
    #[must_use]
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            lang: None,
            extra: Map::new(),
        }
    }

    /// Sets the language hint.
    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Builds a header from a decoded JSON value.
    ///
    /// The value must be an object whose `type` is a string. A `lang` that
    /// is not a string is dropped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::HeaderDecode`] when the value is not an object
    /// or has no string `type`.
    pub fn from_value(value: Value) -> Result<Self, BlockError> {
        let Value::Object(mut fields) = value else {
            return Err(BlockError::HeaderDecode {
                reason: "header is not a JSON object".to_string(),
            });
        };

        let block_type = match fields.remove("type") {
            Some(Value::String(block_type)) => block_type,
            Some(_) => {
                return Err(BlockError::HeaderDecode {
                    reason: "header `type` is not a string".to_string(),
                });
            }
            None => {
                return Err(BlockError::HeaderDecode {
                    reason: "header has no `type`".to_string(),
                });
            }
        };

        let lang = match fields.remove("lang") {
            Some(Value::String(lang)) => Some(lang),
            _ => None,
        };

        Ok(Self {
            block_type,
            lang,
            extra: fields,
        })
    }

    /// Returns the declared type as a [`BlockType`].
    #[must_use]
    pub fn kind(&self) -> BlockType {
        BlockType::from_name(&self.block_type)
    }

    /// Returns the language hint, ignoring the `"null"` placeholder
    /// producers write when no language applies.
    #[must_use]
    pub fn lang_hint(&self) -> Option<&str> {
        self.lang
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty() && !lang.eq_ignore_ascii_case("null"))
    }
}

/// A parsed segment of an annotated stream.
///
/// # Examples
///
/// ```
/// use blockstream::core::{Segment, SegmentKind};
///
/// let segment = Segment::plain_text("hello", 0..7);
/// assert_eq!(segment.kind, SegmentKind::PlainText);
/// assert!(segment.declared_type().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Plain text or typed block.
    pub kind: SegmentKind,

    /// Segment content, trimmed. For a typed block this is the body; for a
    /// block whose header failed to decode it is the whole literal block.
    pub content: String,

    /// Decoded header (typed blocks only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<BlockMeta>,

    /// Byte range in the source stream. Blocks span both markers; plain
    /// text spans the untrimmed gap.
    pub span: Range<usize>,
}

impl Segment {
    /// Creates a plain text segment.
    #[must_use]
    pub fn plain_text(content: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind: SegmentKind::PlainText,
            content: content.into(),
            meta: None,
            span,
        }
    }

    /// Creates a typed block segment.
    #[must_use]
    pub fn typed_block(meta: BlockMeta, content: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind: SegmentKind::TypedBlock,
            content: content.into(),
            meta: Some(meta),
            span,
        }
    }

    /// Checks if this is a plain text segment.
    #[must_use]
    pub fn is_plain_text(&self) -> bool {
        self.kind == SegmentKind::PlainText
    }

    /// Checks if this is a typed block segment.
    #[must_use]
    pub fn is_typed_block(&self) -> bool {
        self.kind == SegmentKind::TypedBlock
    }

    /// Returns the declared type of a typed block.
    #[must_use]
    pub fn declared_type(&self) -> Option<&str> {
        self.meta.as_ref().map(|meta| meta.block_type.as_str())
    }

    /// Returns the block type of a typed block.
    #[must_use]
    pub fn block_type(&self) -> Option<BlockType> {
        self.meta.as_ref().map(BlockMeta::kind)
    }

    /// Returns the language hint of a typed block.
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        self.meta.as_ref().and_then(BlockMeta::lang_hint)
    }

    /// Returns the source text this segment was cut from.
    ///
    /// Returns `None` if `source` is not the stream this segment came from.
    #[must_use]
    pub fn source_text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.span.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meta_from_value() {
        let meta = BlockMeta::from_value(json!({"type": "code", "lang": "python"})).unwrap();
        assert_eq!(meta.block_type, "code");
        assert_eq!(meta.lang_hint(), Some("python"));
        assert!(meta.extra.is_empty());
        assert_eq!(meta.kind(), BlockType::Code);
    }

    #[test]
    fn test_meta_keeps_extra_fields() {
        let meta = BlockMeta::from_value(json!({"type": "chart", "id": 7})).unwrap();
        assert_eq!(meta.extra.get("id"), Some(&json!(7)));
    }

    #[test]
    fn test_meta_rejects_non_object() {
        let err = BlockMeta::from_value(json!(["code"])).unwrap_err();
        assert!(matches!(err, BlockError::HeaderDecode { .. }));
    }

    #[test]
    fn test_meta_rejects_missing_or_non_string_type() {
        assert!(BlockMeta::from_value(json!({"lang": "eng"})).is_err());
        assert!(BlockMeta::from_value(json!({"type": 3})).is_err());
    }

    #[test]
    fn test_meta_null_lang_placeholder() {
        let meta = BlockMeta::new("Tag").with_lang("null");
        assert_eq!(meta.lang_hint(), None);

        let meta = BlockMeta::from_value(json!({"type": "code", "lang": null})).unwrap();
        assert_eq!(meta.lang, None);
    }

    #[test]
    fn test_meta_serializes_type_first_field() {
        let meta = BlockMeta::new("code").with_lang("rust");
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"type":"code","lang":"rust"}"#);
    }

    #[test]
    fn test_segment_accessors() {
        let meta = BlockMeta::new("code").with_lang("python");
        let segment = Segment::typed_block(meta, "print(1)", 3..40);
        assert!(segment.is_typed_block());
        assert_eq!(segment.declared_type(), Some("code"));
        assert_eq!(segment.block_type(), Some(BlockType::Code));
        assert_eq!(segment.lang(), Some("python"));
    }

    #[test]
    fn test_segment_source_text() {
        let source = "abc def";
        let segment = Segment::plain_text("def", 3..7);
        assert_eq!(segment.source_text(source), Some(" def"));
        assert_eq!(segment.source_text("ab"), None);
    }
}
