//! Block scanner.
//!
//! An explicit state machine over the grammar
//! `[BLOCK:<json-header>]<body>[/BLOCK]`:
//!
//! - `InPlainText`: looking for the next opening marker.
//! - `InHeader`: reading the header up to its closing `]`. A `]` inside a
//!   JSON string, or closing a `[` opened inside the header, does not end
//!   it. If that never balances, the first `]` ends the header instead and
//!   decoding rejects it later. The header is bounded in length and may not
//!   contain a marker.
//! - `InBody`: looking for the first closing marker (non-greedy). Opening
//!   markers inside a body are ordinary text.
//!
//! An opening marker that never completes is left in the plain text. Apart
//! from the bounded header lookahead, the scan never revisits a byte.

use std::ops::Range;
use tracing::debug;

/// Opening marker of a block, followed by the JSON header.
pub const OPEN_MARKER: &str = "[BLOCK:";

/// Closing marker of a block.
pub const CLOSE_MARKER: &str = "[/BLOCK]";

/// A complete block located by the scanner; nothing is decoded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// Byte range of the whole block, both markers included.
    pub span: Range<usize>,
    /// Header text between `[BLOCK:` and its closing `]`.
    pub header: &'a str,
    /// Body text between the header and `[/BLOCK]`, untrimmed.
    pub body: &'a str,
}

impl<'a> RawBlock<'a> {
    /// Returns the literal block text from the source it was scanned from.
    #[must_use]
    pub fn text(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    InPlainText,
    InHeader { open: usize },
    InBody { open: usize, header: Range<usize> },
}

/// Iterator over the complete blocks of a stream, in source order.
///
/// # Examples
///
/// ```
/// use blockstream::parser::Scanner;
///
/// let input = r#"a [BLOCK:{"type":"code"}]x[/BLOCK] b"#;
/// let blocks: Vec<_> = Scanner::new(input, 1024).collect();
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].header, r#"{"type":"code"}"#);
/// assert_eq!(blocks[0].body, "x");
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    max_header_len: usize,
    exhausted: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over `input` with the given header length bound.
    #[must_use]
    pub const fn new(input: &'a str, max_header_len: usize) -> Self {
        Self {
            input,
            pos: 0,
            max_header_len,
            exhausted: false,
        }
    }

    /// Finds the end of a header starting at `start`.
    ///
    /// Returns the byte index of the terminating `]`. When strings or
    /// brackets never balance, the first `]` seen before the bound or a
    /// marker is used. `None` if there is no `]` at all.
    fn scan_header(&self, start: usize) -> Option<usize> {
        let rest = &self.input[start..];
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut first_close = None;

        for (offset, c) in rest.char_indices() {
            if offset > self.max_header_len {
                return first_close;
            }
            if c == '[' && marker_at(rest, offset).is_some() {
                return first_close;
            }
            if c == ']' && first_close.is_none() {
                first_close = Some(start + offset);
            }
            if in_string {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_string = false;
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '[' => depth += 1,
                ']' if depth == 0 => return Some(start + offset),
                ']' => depth -= 1,
                _ => {}
            }
        }
        first_close
    }
}

fn marker_at(text: &str, idx: usize) -> Option<&'static str> {
    let rest = &text[idx..];
    [OPEN_MARKER, CLOSE_MARKER]
        .into_iter()
        .find(|marker| rest.starts_with(*marker))
}

impl<'a> Iterator for Scanner<'a> {
    type Item = RawBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let input = self.input;
        let mut state = State::InPlainText;
        loop {
            if self.exhausted {
                return None;
            }
            state = match state {
                State::InPlainText => match input[self.pos..].find(OPEN_MARKER) {
                    Some(rel) => State::InHeader {
                        open: self.pos + rel,
                    },
                    None => {
                        self.exhausted = true;
                        return None;
                    }
                },
                State::InHeader { open } => {
                    let start = open + OPEN_MARKER.len();
                    if let Some(end) = self.scan_header(start) {
                        State::InBody {
                            open,
                            header: start..end,
                        }
                    } else {
                        debug!(offset = open, "block header not terminated, keeping as text");
                        self.pos = start;
                        State::InPlainText
                    }
                }
                State::InBody { open, header } => {
                    let body_start = header.end + 1;
                    match input[body_start..].find(CLOSE_MARKER) {
                        Some(rel) => {
                            let close = body_start + rel;
                            let end = close + CLOSE_MARKER.len();
                            self.pos = end;
                            return Some(RawBlock {
                                span: open..end,
                                header: &input[header],
                                body: &input[body_start..close],
                            });
                        }
                        None => {
                            debug!(offset = open, "block never closed, keeping as text");
                            self.exhausted = true;
                            return None;
                        }
                    }
                }
            };
        }
    }
}
