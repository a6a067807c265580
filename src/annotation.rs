//! Tag and Explain annotations.
//!
//! When a user highlights part of an assistant message and picks an action,
//! the outgoing user message carries a `Tag` or `Explain` block describing
//! the highlight. On read-back the first such block is lifted out of the
//! message and summarized by a short indicator (`Tagged: <preview>`).

use crate::compose::compose_json_block;
use crate::core::{BlockMeta, BlockType, Segment};
use crate::dispatch::payload::decode_body;
use crate::error::{BlockError, Result};
use crate::io::preview;
use crate::parser::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Action attached to a highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationTask {
    /// Tag the highlighted part.
    Tag,
    /// Ask for an explanation of the highlighted part.
    Explain,
}

impl AnnotationTask {
    /// Label used in the read-back indicator.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tag => "Tagged",
            Self::Explain => "Explained",
        }
    }

    /// Block type that carries this task.
    #[must_use]
    pub const fn block_type(self) -> BlockType {
        match self {
            Self::Tag => BlockType::Tag,
            Self::Explain => BlockType::Explain,
        }
    }

    /// Task carried by a block type, if any.
    #[must_use]
    pub const fn from_block_type(block_type: &BlockType) -> Option<Self> {
        match block_type {
            BlockType::Tag => Some(Self::Tag),
            BlockType::Explain => Some(Self::Explain),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tag => "Tag",
            Self::Explain => "Explain",
        })
    }
}

/// Reference to the highlighted message: a numeric id or an opaque key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageRef {
    /// Numeric message id.
    Id(i64),
    /// String message key.
    Key(String),
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Key(key) => f.write_str(key),
        }
    }
}

/// Body of a `Tag` or `Explain` block.
///
/// # Examples
///
/// ```
/// use blockstream::annotation::{Annotation, AnnotationTask};
///
/// let annotation = Annotation::new(AnnotationTask::Explain, "borrow checker", "The borrow checker...");
/// assert_eq!(annotation.indicator(48), "Explained: borrow checker");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Requested action.
    pub task: AnnotationTask,
    /// Highlighted text.
    pub specific_part: String,
    /// Full text of the highlighted message.
    pub complete_message: String,
    /// Highlighted message.
    pub parent_message_id: Option<MessageRef>,
}

#[derive(Deserialize)]
struct AnnotationBody {
    specific_part: String,
    #[serde(default)]
    complete_message: String,
    #[serde(default)]
    parent_message_id: Option<MessageRef>,
}

impl Annotation {
    /// Creates an annotation with no parent message reference.
    #[must_use]
    pub fn new(
        task: AnnotationTask,
        specific_part: impl Into<String>,
        complete_message: impl Into<String>,
    ) -> Self {
        Self {
            task,
            specific_part: specific_part.into(),
            complete_message: complete_message.into(),
            parent_message_id: None,
        }
    }

    /// Sets the parent message reference.
    #[must_use]
    pub fn with_parent(mut self, parent: MessageRef) -> Self {
        self.parent_message_id = Some(parent);
        self
    }

    /// Decodes an annotation from a block body.
    ///
    /// The task is taken from the block type; a `task` field in the body is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::BlockDecode`] when the block type is not `Tag`
    /// or `Explain`, or the body does not decode.
    pub fn decode(block_type: &BlockType, body: &str) -> std::result::Result<Self, BlockError> {
        let task =
            AnnotationTask::from_block_type(block_type).ok_or_else(|| BlockError::BlockDecode {
                block_type: block_type.to_string(),
                message: "not an annotation block".to_string(),
            })?;

        let body: AnnotationBody = decode_body(block_type.as_str(), body)?;
        Ok(Self {
            task,
            specific_part: body.specific_part,
            complete_message: body.complete_message,
            parent_message_id: body.parent_message_id,
        })
    }

    /// Single-line preview of the highlighted text.
    #[must_use]
    pub fn preview(&self, max_graphemes: usize) -> String {
        preview(&self.specific_part, max_graphemes)
    }

    /// Read-back indicator, e.g. `Tagged: <preview>`.
    #[must_use]
    pub fn indicator(&self, max_graphemes: usize) -> String {
        format!("{}: {}", self.task.label(), self.preview(max_graphemes))
    }

    /// Writes the annotation as a block for an outgoing message.
    ///
    /// # Errors
    ///
    /// Fails if the annotation cannot be embedded in a block.
    pub fn to_block(&self) -> Result<String> {
        let meta = BlockMeta::new(self.task.block_type().as_str()).with_lang("null");
        compose_json_block(&meta, self)
    }
}

/// A user message with its annotation lifted out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedMessage {
    /// Decoded annotation, if the message carried a valid one.
    pub annotation: Option<Annotation>,
    /// Indicator to show above the message.
    pub indicator: Option<String>,
    /// Remaining segments.
    pub segments: Vec<Segment>,
}

/// Reads a user message with the default parser.
#[must_use]
pub fn read_annotated_message(input: &str) -> AnnotatedMessage {
    read_annotated_message_with(&Parser::new(), input)
}

/// Reads a user message, lifting out the first `Tag` or `Explain` block.
///
/// When that block does not decode it stays in place as plain text holding
/// its literal source, and no indicator is produced.
#[must_use]
pub fn read_annotated_message_with(parser: &Parser, input: &str) -> AnnotatedMessage {
    let mut segments = parser.parse(input);

    let Some(index) = segments
        .iter()
        .position(|segment| segment.block_type().is_some_and(|t| t.is_annotation()))
    else {
        return AnnotatedMessage {
            annotation: None,
            indicator: None,
            segments,
        };
    };

    let segment = &segments[index];
    let block_type = segment.block_type().unwrap_or(BlockType::Tag);
    match Annotation::decode(&block_type, &segment.content) {
        Ok(annotation) => {
            segments.remove(index);
            let indicator = annotation.indicator(parser.config().preview_len);
            AnnotatedMessage {
                annotation: Some(annotation),
                indicator: Some(indicator),
                segments,
            }
        }
        Err(err) => {
            warn!(error = %err, "annotation block kept as text");
            let span = segment.span.clone();
            let raw = input.get(span.clone()).unwrap_or_default().trim();
            segments[index] = Segment::plain_text(raw, span);
            AnnotatedMessage {
                annotation: None,
                indicator: None,
                segments,
            }
        }
    }
}
