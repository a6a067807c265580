//! Payload rendering.
//!
//! [`Renderer`] is the seam between dispatch and display. Graphical front
//! ends implement it with their widgets; [`TextRenderer`] renders Markdown
//! flavored plain text for terminals and logs.

use crate::dispatch::{Colors, LinkEntry, Payload, dispatch_all};
use crate::parser::{DEFAULT_PREVIEW_LEN, Parser};
use std::fmt::Write;

/// Text shown in place of a video whose metadata is incomplete.
pub const BROKEN_VIDEO_MESSAGE: &str =
    "Missing Video Data: Unable to render video. Metadata is incomplete or unavailable.";

/// Renders payloads.
pub trait Renderer {
    /// Rendered form of one payload.
    type Output;

    /// Renders one payload; `None` renders nothing.
    fn render(&mut self, payload: &Payload) -> Option<Self::Output>;

    /// Renders payloads in order, skipping the ones that render nothing.
    fn render_all(&mut self, payloads: &[Payload]) -> Vec<Self::Output> {
        payloads.iter().filter_map(|payload| self.render(payload)).collect()
    }
}

/// Plain-text renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRenderer {
    expand_thinking: bool,
    preview_len: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    /// Creates a renderer that collapses thinking blocks.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            expand_thinking: false,
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }

    /// Shows thinking blocks expanded.
    #[must_use]
    pub const fn expand_thinking(mut self, expand: bool) -> Self {
        self.expand_thinking = expand;
        self
    }

    /// Sets the annotation preview length.
    #[must_use]
    pub const fn preview_len(mut self, len: usize) -> Self {
        self.preview_len = len;
        self
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&mut self, payload: &Payload) -> Option<String> {
        let mut out = String::new();
        match payload {
            Payload::Hidden { .. } => return None,
            Payload::Markdown { text } | Payload::Generic { text, .. } => out.push_str(text),
            Payload::Code { lang, source } => {
                let _ = write!(out, "```{}\n{source}\n```", lang.as_deref().unwrap_or(""));
            }
            Payload::Thinking { content, collapsed } => {
                if *collapsed && !self.expand_thinking {
                    let _ = write!(out, "> Thinking ({} lines hidden)", content.lines().count());
                } else {
                    out.push_str("> Thinking");
                    for line in content.lines() {
                        let _ = write!(out, "\n> {line}");
                    }
                }
            }
            Payload::Table(table) => {
                let _ = writeln!(out, "| {} |", table.headers.join(" | "));
                let _ = write!(out, "|{}", " --- |".repeat(table.headers.len()));
                for row in &table.rows {
                    let _ = write!(out, "\n| {} |", row.join(" | "));
                }
            }
            Payload::List(list) => {
                if let Some(title) = &list.title {
                    let _ = writeln!(out, "**{title}**");
                }
                let items: Vec<String> = list
                    .items
                    .iter()
                    .map(|item| {
                        let mark = if item.completed { 'x' } else { ' ' };
                        if item.description.is_empty() {
                            format!("- [{mark}] {}", item.title)
                        } else {
                            format!("- [{mark}] {}: {}", item.title, item.description)
                        }
                    })
                    .collect();
                out.push_str(&items.join("\n"));
            }
            Payload::Chart(chart) => {
                let _ = write!(
                    out,
                    "Chart ({}): {}",
                    chart.properties.chart_type, chart.properties.title
                );
                for dataset in &chart.datasets {
                    let points: Vec<String> = chart
                        .labels
                        .iter()
                        .zip(&dataset.data)
                        .map(|(label, value)| format!("{label}={value}"))
                        .collect();
                    let _ = write!(out, "\n  {}: {}", dataset.label, points.join(", "));
                    if let Some(Colors::Single(color)) = &dataset.background_color {
                        let _ = write!(out, " ({color})");
                    }
                }
            }
            Payload::Links(links) => {
                let lines: Vec<String> = links
                    .links
                    .iter()
                    .map(|link| match link {
                        LinkEntry::Url(url) => format!("- {url}"),
                        LinkEntry::Detailed {
                            url,
                            title: Some(title),
                            ..
                        } => format!("- [{title}]({url})"),
                        LinkEntry::Detailed { url, .. } => format!("- {url}"),
                    })
                    .collect();
                out.push_str(&lines.join("\n"));
            }
            Payload::Images(images) => {
                let lines: Vec<String> = images
                    .images
                    .iter()
                    .map(|url| format!("![image]({url})"))
                    .collect();
                out.push_str(&lines.join("\n"));
            }
            Payload::File(file) => {
                let _ = write!(out, "File: {}", file.file_data.metadata.full_name());
            }
            Payload::Sources(sources) => {
                let lines: Vec<String> = sources
                    .sources
                    .iter()
                    .map(|source| format!("- [{}]({}) ({})", source.title, source.link, source.site_name))
                    .collect();
                out.push_str(&lines.join("\n"));
            }
            Payload::YoutubeVideo(video) => {
                let _ = write!(out, "Video: {}", video.title.as_deref().unwrap_or_default());
                if let Some(channel) = &video.channel_title {
                    let _ = write!(out, " - {channel}");
                }
                if let Some(url) = video.watch_url() {
                    let _ = write!(out, "\n{url}");
                }
            }
            Payload::Annotation(annotation) => out.push_str(&annotation.indicator(self.preview_len)),
            Payload::RagItem(item) => {
                let _ = write!(out, "Attached: {}", item.filename);
            }
            Payload::BrokenMedia { block_type, missing } => {
                if block_type == "youtube_video" {
                    out.push_str(BROKEN_VIDEO_MESSAGE);
                } else {
                    let _ = write!(out, "Missing {block_type} data: {}", missing.join(", "));
                }
            }
            Payload::DecodeError { .. } => {
                if let Some(err) = payload.error() {
                    let _ = write!(out, "Error: {err}");
                }
            }
        }
        Some(out)
    }
}

/// Parses, dispatches, and renders a stream as text.
///
/// # Examples
///
/// ```
/// use blockstream::render::render_text;
///
/// let text = render_text(r#"Try: [BLOCK:{"type":"code","lang":"sh"}]ls[/BLOCK]"#);
/// assert_eq!(text, "Try:\n\n```sh\nls\n```");
/// ```
#[must_use]
pub fn render_text(input: &str) -> String {
    render_text_with(&Parser::new(), TextRenderer::new(), input)
}

/// Renders a stream with the given parser and renderer.
#[must_use]
pub fn render_text_with(parser: &Parser, mut renderer: TextRenderer, input: &str) -> String {
    let payloads = dispatch_all(&parser.parse(input));
    renderer.render_all(&payloads).join("\n\n")
}
