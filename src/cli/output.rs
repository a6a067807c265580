//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::annotation::AnnotatedMessage;
use crate::core::{Segment, SegmentKind};
use crate::dispatch::Payload;
use crate::error::Error;
use crate::extract::{MediaLibrary, TitleExtraction};
use crate::io::preview;
use serde::Serialize;
use std::fmt::Write;

/// Preview width for segment listings.
const LISTING_PREVIEW: usize = 60;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a segment list.
#[must_use]
pub fn format_segments(segments: &[Segment], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_segments_text(segments),
        OutputFormat::Json => format_json(&segments),
    }
}

fn format_segments_text(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "No segments found.\n".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<4} {:<12} {:<14} {:<12} Content",
        "#", "Kind", "Type", "Span"
    );
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for (index, segment) in segments.iter().enumerate() {
        let kind = match segment.kind {
            SegmentKind::PlainText => "text",
            SegmentKind::TypedBlock => "block",
        };
        let span = format!("{}..{}", segment.span.start, segment.span.end);
        let _ = writeln!(
            output,
            "{:<4} {:<12} {:<14} {:<12} {}",
            index,
            kind,
            segment.declared_type().unwrap_or("-"),
            span,
            preview(&segment.content, LISTING_PREVIEW)
        );
    }

    output
}

/// Formats dispatched segments.
#[must_use]
pub fn format_payloads(payloads: &[Payload], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_payloads_text(payloads),
        OutputFormat::Json => format_json(&payloads),
    }
}

fn format_payloads_text(payloads: &[Payload]) -> String {
    let mut output = String::new();
    for (index, payload) in payloads.iter().enumerate() {
        let summary = match payload {
            Payload::Markdown { text } => format!("markdown    {}", preview(text, LISTING_PREVIEW)),
            Payload::Code { lang, source } => format!(
                "code        {} ({} lines)",
                lang.as_deref().unwrap_or("-"),
                source.lines().count()
            ),
            Payload::Thinking { content, .. } => {
                format!("thinking    {}", preview(content, LISTING_PREVIEW))
            }
            Payload::Table(table) => format!(
                "table       {} columns, {} rows",
                table.headers.len(),
                table.rows.len()
            ),
            Payload::List(list) => format!("list        {} items", list.items.len()),
            Payload::Chart(chart) => format!(
                "chart       {} ({})",
                chart.properties.title, chart.properties.chart_type
            ),
            Payload::Links(links) => format!("links       {} links", links.links.len()),
            Payload::Images(images) => format!("images      {} images", images.images.len()),
            Payload::File(file) => format!("file        {}", file.file_data.metadata.full_name()),
            Payload::Sources(sources) => format!("sources     {} sources", sources.sources.len()),
            Payload::YoutubeVideo(video) => format!(
                "video       {}",
                video.video_id.as_deref().unwrap_or_default()
            ),
            Payload::Annotation(annotation) => {
                format!("annotation  {}", annotation.indicator(LISTING_PREVIEW))
            }
            Payload::RagItem(item) => format!("rag_item    {}", item.filename),
            Payload::Generic { block_type, .. } => format!("generic     {block_type}"),
            Payload::Hidden { block_type } => format!("hidden      {block_type}"),
            Payload::BrokenMedia { .. } | Payload::DecodeError { .. } => payload
                .error()
                .map_or_else(String::new, |err| format!("error       {err}")),
        };
        let _ = writeln!(output, "{index:<4} {summary}");
    }
    output
}

/// Formats a title extraction.
#[must_use]
pub fn format_title(extraction: &TitleExtraction, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(
                output,
                "Title: {}",
                extraction.title.as_deref().unwrap_or("(none)")
            );
            output.push('\n');
            output.push_str(&extraction.cleaned);
            output.push('\n');
            output
        }
        OutputFormat::Json => format_json(extraction),
    }
}

/// Formats a media library.
#[must_use]
pub fn format_media(library: &MediaLibrary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_media_text(library),
        OutputFormat::Json => format_json(library),
    }
}

fn format_media_text(library: &MediaLibrary) -> String {
    if library.is_empty() {
        return "No media found.\n".to_string();
    }

    let mut output = String::new();
    if !library.images.is_empty() {
        let _ = writeln!(output, "Images ({}):", library.images.len());
        for url in &library.images {
            let _ = writeln!(output, "  {url}");
        }
    }
    if !library.videos.is_empty() {
        let _ = writeln!(output, "Videos ({}):", library.videos.len());
        for video in &library.videos {
            let _ = writeln!(
                output,
                "  {}  {}",
                video.watch_url().unwrap_or_default(),
                video.title.as_deref().unwrap_or_default()
            );
        }
    }
    if !library.files.is_empty() {
        let _ = writeln!(output, "Files ({}):", library.files.len());
        for file in &library.files {
            let _ = writeln!(output, "  {}.{}", file.file_name, file.extension.trim_start_matches('.'));
        }
    }
    if !library.links.is_empty() {
        let _ = writeln!(output, "Links ({}):", library.links.len());
        for url in &library.links {
            let _ = writeln!(output, "  {url}");
        }
    }
    if !library.sources.is_empty() {
        let _ = writeln!(output, "Sources ({}):", library.sources.len());
        for source in &library.sources {
            let _ = writeln!(output, "  {} ({})  {}", source.title, source.site_name, source.link);
        }
    }
    output
}

/// Formats an annotated user message.
#[must_use]
pub fn format_annotation(message: &AnnotatedMessage, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            if let Some(indicator) = &message.indicator {
                let _ = writeln!(output, "{indicator}");
                output.push('\n');
            }
            for segment in &message.segments {
                let _ = writeln!(output, "{}", segment.content);
            }
            output
        }
        OutputFormat::Json => format_json(message),
    }
}

/// Formats a plain string result (rendered text, composed block, stripped text).
#[must_use]
pub fn format_text(text: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = text.to_string();
            if !output.ends_with('\n') {
                output.push('\n');
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct TextOutput<'a> {
                text: &'a str,
            }
            format_json(&TextOutput { text })
        }
    }
}

/// Formats an error.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }
            format_json(&ErrorOutput {
                error: error.to_string(),
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
