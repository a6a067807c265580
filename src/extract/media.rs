//! Media library extraction.
//!
//! Collects images, videos, generated files, links, and web sources across a
//! list of messages for the library view. Blocks that do not decode or lack
//! their identifying field are skipped silently.

use crate::core::{BlockType, Segment};
use crate::dispatch::payload::{
    FilePayload, ImagesPayload, LinksPayload, SourceEntry, SourcesPayload, VideoPayload,
    decode_body,
};
use crate::parser::Parser;
use clap::ValueEnum;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Media category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Image URLs.
    Images,
    /// YouTube videos.
    Videos,
    /// Generated files.
    Files,
    /// Link URLs.
    Links,
    /// Web sources.
    Sources,
}

/// A generated file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntry {
    /// Name without extension.
    pub file_name: String,
    /// Extension.
    pub extension: String,
    /// Document content.
    pub content: Value,
}

/// Media collected from a list of messages, in message order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaLibrary {
    /// Image URLs.
    pub images: Vec<String>,
    /// Videos with a known id.
    pub videos: Vec<VideoPayload>,
    /// Generated files.
    pub files: Vec<FileEntry>,
    /// Link URLs.
    pub links: Vec<String>,
    /// Web sources.
    pub sources: Vec<SourceEntry>,
}

impl MediaLibrary {
    /// Number of items of one kind.
    #[must_use]
    pub fn count(&self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Images => self.images.len(),
            MediaKind::Videos => self.videos.len(),
            MediaKind::Files => self.files.len(),
            MediaKind::Links => self.links.len(),
            MediaKind::Sources => self.sources.len(),
        }
    }

    /// Total number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
            + self.videos.len()
            + self.files.len()
            + self.links.len()
            + self.sources.len()
    }

    /// Checks if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keeps only one kind of media.
    #[must_use]
    pub fn only(self, kind: MediaKind) -> Self {
        let mut filtered = Self::default();
        match kind {
            MediaKind::Images => filtered.images = self.images,
            MediaKind::Videos => filtered.videos = self.videos,
            MediaKind::Files => filtered.files = self.files,
            MediaKind::Links => filtered.links = self.links,
            MediaKind::Sources => filtered.sources = self.sources,
        }
        filtered
    }

    fn append(&mut self, mut other: Self) {
        self.images.append(&mut other.images);
        self.videos.append(&mut other.videos);
        self.files.append(&mut other.files);
        self.links.append(&mut other.links);
        self.sources.append(&mut other.sources);
    }

    fn collect_segment(&mut self, segment: &Segment) {
        let Some(block_type) = segment.block_type() else {
            return;
        };
        let name = block_type.as_str();
        let body = segment.content.as_str();

        match block_type {
            BlockType::Images => {
                if let Ok(payload) = decode_body::<ImagesPayload>(name, body) {
                    self.images.extend(payload.images);
                }
            }
            BlockType::YoutubeVideo => {
                if let Ok(video) = decode_body::<VideoPayload>(name, body)
                    && video.video_id.is_some()
                {
                    self.videos.push(video);
                }
            }
            BlockType::File => {
                if let Ok(payload) = decode_body::<FilePayload>(name, body) {
                    let data = payload.file_data;
                    self.files.push(FileEntry {
                        file_name: data.metadata.file_name,
                        extension: data.metadata.extension,
                        content: data.content,
                    });
                }
            }
            BlockType::Links => {
                if let Ok(payload) = decode_body::<LinksPayload>(name, body) {
                    self.links
                        .extend(payload.links.iter().map(|link| link.url().to_string()));
                }
            }
            BlockType::Source => {
                if let Ok(payload) = decode_body::<SourcesPayload>(name, body) {
                    self.sources.extend(payload.sources);
                }
            }
            _ => {}
        }
    }
}

/// Collects media from messages with the default parser.
///
/// # Examples
///
/// ```
/// use blockstream::extract::{MediaKind, extract_media};
///
/// let messages = [
///     r#"[BLOCK:{"type":"images"}]{"images":["a.png","b.png"]}[/BLOCK]"#,
///     r#"[BLOCK:{"type":"images"}]{broken[/BLOCK]"#,
/// ];
/// let library = extract_media(&messages);
/// assert_eq!(library.count(MediaKind::Images), 2);
/// ```
#[must_use]
pub fn extract_media<S: AsRef<str> + Sync>(messages: &[S]) -> MediaLibrary {
    extract_media_with(&Parser::new(), messages)
}

/// Collects media from messages using `parser`.
///
/// Messages are parsed in parallel; the result keeps message order.
#[must_use]
pub fn extract_media_with<S: AsRef<str> + Sync>(parser: &Parser, messages: &[S]) -> MediaLibrary {
    let per_message: Vec<MediaLibrary> = messages
        .par_iter()
        .map(|message| {
            let mut library = MediaLibrary::default();
            for segment in parser.parse(message.as_ref()) {
                library.collect_segment(&segment);
            }
            library
        })
        .collect();

    let mut library = MediaLibrary::default();
    for partial in per_message {
        library.append(partial);
    }
    debug!(messages = messages.len(), items = library.len(), "media extracted");
    library
}
