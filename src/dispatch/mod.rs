//! Segment dispatch.
//!
//! Maps each parsed segment to a [`Payload`]: the decoded, typed content a
//! renderer consumes. Failures stay local to their segment; a table that does
//! not decode becomes a [`Payload::DecodeError`] and its siblings render as
//! usual.

pub mod fallback;
pub mod payload;

pub use fallback::{EMPTY_LISTING, labeled_text};
pub use payload::{
    ChartPayload, ChartProperties, Colors, Dataset, FileData, FileMetadata, FilePayload,
    ImagesPayload, LinkEntry, LinksPayload, ListItem, ListPayload, RagItemPayload, SourceEntry,
    SourcesPayload, TablePayload, VideoPayload, decode_body,
};

use crate::annotation::Annotation;
use crate::core::{BlockType, Segment};
use crate::error::BlockError;
use serde::Serialize;
use serde_json::Value;
use tracing::{trace, warn};

/// Semantic interpretation of a segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// Narrative text: plain text segments and `message`/`paragraph`/`text` blocks.
    Markdown {
        /// Markdown source.
        text: String,
    },
    /// Source code, never JSON-decoded.
    Code {
        /// Language hint.
        #[serde(skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        /// Code text.
        source: String,
    },
    /// Chain-of-thought narrative, shown collapsed.
    Thinking {
        /// Narrative text.
        content: String,
        /// Initial collapsed state.
        collapsed: bool,
    },
    /// Table.
    Table(TablePayload),
    /// Checklist.
    List(ListPayload),
    /// Chart.
    Chart(ChartPayload),
    /// Link list.
    Links(LinksPayload),
    /// Image gallery.
    Images(ImagesPayload),
    /// Generated file.
    File(FilePayload),
    /// Web sources.
    Sources(SourcesPayload),
    /// YouTube video card.
    YoutubeVideo(VideoPayload),
    /// Tag or Explain highlight.
    Annotation(Annotation),
    /// Uploaded file reference.
    RagItem(RagItemPayload),
    /// Unrecognized block type shown as a labeled listing.
    Generic {
        /// Declared type.
        block_type: String,
        /// `**key**: value` lines.
        text: String,
    },
    /// Consumed out of band; renders nothing.
    Hidden {
        /// Declared type.
        block_type: String,
    },
    /// Media block missing fields it needs to display.
    BrokenMedia {
        /// Declared type.
        block_type: String,
        /// Missing field names.
        missing: Vec<&'static str>,
    },
    /// Block body failed to decode.
    DecodeError {
        /// Declared type.
        block_type: String,
        /// Decoder message.
        message: String,
    },
}

impl Payload {
    /// Returns the block error this payload stands for, if any.
    #[must_use]
    pub fn error(&self) -> Option<BlockError> {
        match self {
            Self::DecodeError {
                block_type,
                message,
            } => Some(BlockError::BlockDecode {
                block_type: block_type.clone(),
                message: message.clone(),
            }),
            Self::BrokenMedia {
                block_type,
                missing,
            } => Some(BlockError::IncompleteMedia {
                block_type: block_type.clone(),
                missing: missing.clone(),
            }),
            _ => None,
        }
    }

    /// Whether a renderer should skip this payload.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden { .. })
    }
}

/// Routes segments to payloads.
///
/// # Examples
///
/// ```
/// use blockstream::dispatch::{Dispatcher, Payload};
/// use blockstream::parse;
///
/// let segments = parse(r#"[BLOCK:{"type":"images"}]{"images":["a.png"]}[/BLOCK]"#);
/// let payload = Dispatcher::new().dispatch(&segments[0]);
/// assert!(matches!(payload, Payload::Images(_)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Dispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Interprets one segment. Never fails.
    #[must_use]
    pub fn dispatch(&self, segment: &Segment) -> Payload {
        let Some(meta) = segment.meta.as_ref() else {
            return Payload::Markdown {
                text: segment.content.clone(),
            };
        };

        let block_type = meta.kind();
        trace!(block_type = %block_type, offset = segment.span.start, "dispatching block");

        let body = segment.content.as_str();
        let name = meta.block_type.as_str();
        let payload = match block_type {
            BlockType::Message | BlockType::Paragraph | BlockType::Text => Ok(Payload::Markdown {
                text: body.to_string(),
            }),
            BlockType::Code => Ok(Payload::Code {
                lang: meta.lang_hint().map(str::to_string),
                source: body.to_string(),
            }),
            BlockType::Thinking => Ok(Payload::Thinking {
                content: body.to_string(),
                collapsed: true,
            }),
            BlockType::Title | BlockType::Memory => Ok(Payload::Hidden {
                block_type: name.to_string(),
            }),
            BlockType::Table => decode_body(name, body).map(Payload::Table),
            BlockType::List => decode_body(name, body).map(Payload::List),
            BlockType::Chart => decode_body(name, body).map(Payload::Chart),
            BlockType::Links => decode_body(name, body).map(Payload::Links),
            BlockType::Images => decode_body(name, body).map(Payload::Images),
            BlockType::File => decode_body(name, body).map(Payload::File),
            BlockType::Source => decode_body(name, body).map(Payload::Sources),
            BlockType::YoutubeVideo => decode_video(name, body),
            BlockType::Tag | BlockType::Explain => {
                Annotation::decode(&block_type, body).map(Payload::Annotation)
            }
            BlockType::RagItem => decode_body(name, body).map(Payload::RagItem),
            BlockType::Unrecognized(_) => {
                decode_body::<Value>(name, body).map(|value| Payload::Generic {
                    block_type: name.to_string(),
                    text: labeled_text(&value),
                })
            }
        };

        payload.unwrap_or_else(|err| {
            warn!(offset = segment.span.start, error = %err, "block rendered as error");
            error_payload(name, err)
        })
    }

    /// Interprets every segment, one payload per segment, in order.
    #[must_use]
    pub fn dispatch_all(&self, segments: &[Segment]) -> Vec<Payload> {
        segments.iter().map(|segment| self.dispatch(segment)).collect()
    }
}

// Keyed by the segment's declared type so every error payload names its block.
fn error_payload(name: &str, err: BlockError) -> Payload {
    match err {
        BlockError::IncompleteMedia { missing, .. } => Payload::BrokenMedia {
            block_type: name.to_string(),
            missing,
        },
        BlockError::BlockDecode { message, .. } => Payload::DecodeError {
            block_type: name.to_string(),
            message,
        },
        other => Payload::DecodeError {
            block_type: name.to_string(),
            message: other.to_string(),
        },
    }
}

fn decode_video(name: &str, body: &str) -> Result<Payload, BlockError> {
    let video: VideoPayload = decode_body(name, body)?;
    let missing = video.missing_fields();
    if missing.is_empty() {
        Ok(Payload::YoutubeVideo(video))
    } else {
        Err(BlockError::IncompleteMedia {
            block_type: name.to_string(),
            missing,
        })
    }
}

/// Interprets one segment.
#[must_use]
pub fn dispatch(segment: &Segment) -> Payload {
    Dispatcher::new().dispatch(segment)
}

/// Interprets every segment.
#[must_use]
pub fn dispatch_all(segments: &[Segment]) -> Vec<Payload> {
    Dispatcher::new().dispatch_all(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BlockMeta;
    use crate::parser::parse;

    fn block(block_type: &str, body: &str) -> Segment {
        Segment::typed_block(BlockMeta::new(block_type), body, 0..0)
    }

    #[test]
    fn test_plain_text_is_markdown() {
        let payload = dispatch(&Segment::plain_text("**hi**", 0..6));
        assert_eq!(
            payload,
            Payload::Markdown {
                text: "**hi**".to_string()
            }
        );
    }

    #[test]
    fn test_code_is_not_decoded() {
        let segment = Segment::typed_block(BlockMeta::new("code").with_lang("null"), "{not json", 0..0);
        assert_eq!(
            dispatch(&segment),
            Payload::Code {
                lang: None,
                source: "{not json".to_string()
            }
        );
    }

    #[test]
    fn test_title_and_memory_hidden() {
        assert!(dispatch(&block("title", "My chat")).is_hidden());
        assert!(dispatch(&block("memory", "{}")).is_hidden());
    }

    #[test]
    fn test_thinking_collapsed() {
        assert!(matches!(
            dispatch(&block("thinking", "hmm")),
            Payload::Thinking { collapsed: true, .. }
        ));
    }

    #[test]
    fn test_table_decode_error_isolated() {
        let segments = parse(
            r#"[BLOCK:{"type":"table"}]{"headers":["a"]}[/BLOCK] [BLOCK:{"type":"images"}]{"images":["x.png"]}[/BLOCK]"#,
        );
        let payloads = dispatch_all(&segments);
        assert_eq!(payloads.len(), 2);
        let err = payloads[0].error().unwrap();
        assert!(err.to_string().starts_with("failed to decode table block"));
        assert!(matches!(payloads[1], Payload::Images(_)));
    }

    #[test]
    fn test_error_payload_names_declared_type() {
        let payload = dispatch(&block("tag", "not json"));
        assert!(matches!(
            &payload,
            Payload::DecodeError { block_type, .. } if block_type == "tag"
        ));
    }

    #[test]
    fn test_incomplete_video_is_broken_media() {
        let payload = dispatch(&block("youtube_video", r#"{"videoId":"abc","title":""}"#));
        assert_eq!(
            payload,
            Payload::BrokenMedia {
                block_type: "youtube_video".to_string(),
                missing: vec!["title", "thumbnailUrl"],
            }
        );
    }

    #[test]
    fn test_complete_video() {
        let payload = dispatch(&block(
            "youtube_video",
            r#"{"videoId":"abc","title":"T","thumbnailUrl":"https://i.ytimg.com/x.jpg"}"#,
        ));
        assert!(matches!(payload, Payload::YoutubeVideo(_)));
    }

    #[test]
    fn test_unrecognized_is_generic_listing() {
        let payload = dispatch(&block("wizzbang", r#"{"a":1,"b":"two"}"#));
        assert_eq!(
            payload,
            Payload::Generic {
                block_type: "wizzbang".to_string(),
                text: "**a**: 1\n**b**: two".to_string(),
            }
        );
    }

    #[test]
    fn test_unrecognized_empty_object() {
        let payload = dispatch(&block("wizzbang", "{}"));
        assert!(matches!(payload, Payload::Generic { text, .. } if text == EMPTY_LISTING));
    }

    #[test]
    fn test_unrecognized_non_json_is_decode_error() {
        let payload = dispatch(&block("wizzbang", "not json"));
        assert!(matches!(payload, Payload::DecodeError { block_type, .. } if block_type == "wizzbang"));
    }

    #[test]
    fn test_annotation_and_rag_item() {
        let payload = dispatch(&block("Tag", r#"{"specific_part":"x"}"#));
        assert!(matches!(payload, Payload::Annotation(_)));
        let payload = dispatch(&block("RAGItem", r#"{"filename":"a.pdf"}"#));
        assert!(matches!(payload, Payload::RagItem(item) if item.filename == "a.pdf"));
    }

    #[test]
    fn test_narrative_blocks() {
        for name in ["message", "paragraph", "text"] {
            assert_eq!(
                dispatch(&block(name, "hello")),
                Payload::Markdown {
                    text: "hello".to_string()
                }
            );
        }
    }

    #[test]
    fn test_payload_serializes_with_kind_tag() {
        let json = serde_json::to_value(dispatch(&block("thinking", "t"))).unwrap();
        assert_eq!(json["kind"], "thinking");
        assert_eq!(json["collapsed"], true);
    }
}
