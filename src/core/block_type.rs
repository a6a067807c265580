//! Declared block types.
//!
//! The producer's `type` vocabulary is open, so the known names map onto a
//! closed enum and everything else lands in [`BlockType::Unrecognized`],
//! which the dispatcher handles as a first-class case.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The `type` declared in a block header.
///
/// # Examples
///
/// ```
/// use blockstream::core::BlockType;
///
/// assert_eq!(BlockType::from_name("youtube_video"), BlockType::YoutubeVideo);
/// assert_eq!(BlockType::from_name("explain"), BlockType::Explain);
/// assert_eq!(
///     BlockType::from_name("wizzbang"),
///     BlockType::Unrecognized("wizzbang".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    /// Raw source code; the body is not JSON.
    Code,
    /// `{headers, rows}` table.
    Table,
    /// `{title?, items}` checklist.
    List,
    /// `{properties, labels, datasets}` chart.
    Chart,
    /// `{links}` list of URLs.
    Links,
    /// `{images}` list of image URLs.
    Images,
    /// `{file_data}` generated file.
    File,
    /// `{sources}` web sources.
    Source,
    /// Out-of-band chat title; never displayed.
    Title,
    /// Chain-of-thought narrative.
    Thinking,
    /// YouTube video card.
    YoutubeVideo,
    /// Narrative text.
    Message,
    /// Narrative text.
    Paragraph,
    /// Long-form narrative text (emails, posts).
    Text,
    /// User highlight with a tag action.
    Tag,
    /// User highlight with an explain action.
    Explain,
    /// Uploaded file reference attached to a user message.
    RagItem,
    /// Memory record consumed by the backend; never displayed.
    Memory,
    /// Any other producer-supplied name.
    Unrecognized(String),
}

impl BlockType {
    /// Maps a declared type name onto a block type.
    ///
    /// Names are matched exactly, except the user-side annotation types
    /// (`Tag`, `Explain`, `RAGItem`) which are matched case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "code" => Self::Code,
            "table" => Self::Table,
            "list" => Self::List,
            "chart" => Self::Chart,
            "links" => Self::Links,
            "images" => Self::Images,
            "file" => Self::File,
            "source" => Self::Source,
            "title" => Self::Title,
            "thinking" => Self::Thinking,
            "youtube_video" => Self::YoutubeVideo,
            "message" => Self::Message,
            "paragraph" => Self::Paragraph,
            "text" => Self::Text,
            "memory" => Self::Memory,
            other if other.eq_ignore_ascii_case("tag") => Self::Tag,
            other if other.eq_ignore_ascii_case("explain") => Self::Explain,
            other if other.eq_ignore_ascii_case("ragitem") => Self::RagItem,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the canonical wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Code => "code",
            Self::Table => "table",
            Self::List => "list",
            Self::Chart => "chart",
            Self::Links => "links",
            Self::Images => "images",
            Self::File => "file",
            Self::Source => "source",
            Self::Title => "title",
            Self::Thinking => "thinking",
            Self::YoutubeVideo => "youtube_video",
            Self::Message => "message",
            Self::Paragraph => "paragraph",
            Self::Text => "text",
            Self::Tag => "Tag",
            Self::Explain => "Explain",
            Self::RagItem => "RAGItem",
            Self::Memory => "memory",
            Self::Unrecognized(name) => name,
        }
    }

    /// Whether the body is narrative text rendered as-is.
    #[must_use]
    pub const fn is_narrative(&self) -> bool {
        matches!(self, Self::Message | Self::Paragraph | Self::Text)
    }

    /// Whether blocks of this type are consumed out of band and never shown.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self, Self::Title | Self::Memory)
    }

    /// Whether the body is expected to be JSON.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        !matches!(
            self,
            Self::Code
                | Self::Thinking
                | Self::Title
                | Self::Message
                | Self::Paragraph
                | Self::Text
        )
    }

    /// Whether the block carries media collected by the library view.
    #[must_use]
    pub const fn is_media(&self) -> bool {
        matches!(
            self,
            Self::Images | Self::YoutubeVideo | Self::File | Self::Links | Self::Source
        )
    }

    /// Whether this is a user highlight annotation (`Tag` or `Explain`).
    #[must_use]
    pub const fn is_annotation(&self) -> bool {
        matches!(self, Self::Tag | Self::Explain)
    }

    /// Whether this type was not recognized.
    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for BlockType {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for BlockType {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.as_str().to_string()
    }
}
