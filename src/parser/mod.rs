//! Block extraction.
//!
//! Splits an annotated stream into an ordered list of [`Segment`]s:
//!
//! - text between blocks becomes a `PlainText` segment when it is not blank
//! - a block whose header decodes becomes a `TypedBlock` segment
//! - a block whose header does not decode degrades to a `PlainText` segment
//!   holding the literal block, markers included
//!
//! Parsing never fails and is deterministic: the same input always yields
//! the same segments.

pub mod sanitize;
pub mod scanner;

pub use sanitize::{decode_lenient, sanitize};
pub use scanner::{CLOSE_MARKER, OPEN_MARKER, RawBlock, Scanner};

use crate::core::{BlockMeta, Segment};
use crate::error::BlockError;
use rayon::prelude::*;
use std::ops::Range;
use tracing::warn;

/// Default bound on header length in bytes.
pub const DEFAULT_MAX_HEADER_LEN: usize = 1024;

/// Default preview length (grapheme clusters) for highlighted excerpts.
pub const DEFAULT_PREVIEW_LEN: usize = 48;

/// Parser configuration.
///
/// # Examples
///
/// ```
/// use blockstream::parser::ParserConfig;
///
/// let config = ParserConfig::new().max_header_len(256).preview_len(20);
/// assert_eq!(config.max_header_len, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum header length in bytes; longer headers are not blocks.
    pub max_header_len: usize,

    /// Maximum preview length for Tag/Explain indicators.
    pub preview_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_header_len: DEFAULT_MAX_HEADER_LEN,
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }

    /// Sets the header length bound.
    #[must_use]
    pub const fn max_header_len(mut self, len: usize) -> Self {
        self.max_header_len = len;
        self
    }

    /// Sets the preview length.
    #[must_use]
    pub const fn preview_len(mut self, len: usize) -> Self {
        self.preview_len = len;
        self
    }
}

/// Annotated stream parser.
///
/// Stateless apart from its configuration; safe to share across threads.
///
/// # Examples
///
/// ```
/// use blockstream::parser::Parser;
///
/// let parser = Parser::new();
/// let segments = parser.parse(r#"before [BLOCK:{"type":"code","lang":"python"}]print(1)[/BLOCK] after"#);
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[1].declared_type(), Some("code"));
/// assert_eq!(segments[1].content, "print(1)");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Creates a parser with the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: ParserConfig::new(),
        }
    }

    /// Creates a parser with a custom configuration.
    #[must_use]
    pub const fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns a scanner over the complete blocks of `input`.
    #[must_use]
    pub const fn scan<'a>(&self, input: &'a str) -> Scanner<'a> {
        Scanner::new(input, self.config.max_header_len)
    }

    /// Parses an annotated stream into ordered segments.
    #[must_use]
    pub fn parse(&self, input: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut last = 0;

        for block in self.scan(input) {
            push_plain_text(&mut segments, input, last..block.span.start);

            match decode_header(block.header) {
                Ok(meta) => segments.push(Segment::typed_block(
                    meta,
                    block.body.trim(),
                    block.span.clone(),
                )),
                Err(err) => {
                    warn!(offset = block.span.start, error = %err, "degrading block to plain text");
                    segments.push(Segment::plain_text(
                        block.text(input),
                        block.span.clone(),
                    ));
                }
            }

            last = block.span.end;
        }

        // With no blocks this covers the whole input, so the trailing text
        // and the no-block fallback are the same single segment.
        push_plain_text(&mut segments, input, last..input.len());
        segments
    }

    /// Parses many streams in parallel.
    ///
    /// The result is in input order and identical to calling
    /// [`Parser::parse`] on each stream.
    #[must_use]
    pub fn parse_batch<S: AsRef<str> + Sync>(&self, inputs: &[S]) -> Vec<Vec<Segment>> {
        inputs
            .par_iter()
            .map(|input| self.parse(input.as_ref()))
            .collect()
    }
}

fn push_plain_text(segments: &mut Vec<Segment>, input: &str, span: Range<usize>) {
    let text = input[span.clone()].trim();
    if !text.is_empty() {
        segments.push(Segment::plain_text(text, span));
    }
}

/// Decodes a block header after sanitization.
///
/// # Errors
///
/// Returns [`BlockError::HeaderDecode`] when the sanitized header is not a
/// JSON object with a string `type`.
pub fn decode_header(header: &str) -> Result<BlockMeta, BlockError> {
    let cleaned = sanitize(header);
    let value = serde_json::from_str(&cleaned).map_err(|e| BlockError::HeaderDecode {
        reason: e.to_string(),
    })?;
    BlockMeta::from_value(value)
}

/// Parses an annotated stream with the default configuration.
///
/// # Examples
///
/// ```
/// use blockstream::parse;
///
/// assert!(parse("").is_empty());
/// let segments = parse("plain text");
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].content, "plain text");
/// ```
#[must_use]
pub fn parse(input: &str) -> Vec<Segment> {
    Parser::new().parse(input)
}

/// Parses many streams in parallel with the default configuration.
#[must_use]
pub fn parse_batch<S: AsRef<str> + Sync>(inputs: &[S]) -> Vec<Vec<Segment>> {
    Parser::new().parse_batch(inputs)
}
