//! # blockstream
//!
//! Inline block-annotation parser for chat transcripts.
//!
//! Assistant and user messages embed typed payloads in free-form text using
//! the grammar `[BLOCK:<json-header>]<body>[/BLOCK]`. This crate recovers the
//! ordered sequence of plain text and typed segments from such a stream and
//! interprets each segment.
//!
//! ## Features
//!
//! - **Parsing**: state-machine scanner with bounded headers; malformed
//!   blocks degrade to plain text instead of failing
//! - **Dispatch**: typed payloads per block type, with per-segment errors
//! - **Annotations**: Tag/Explain highlight read-back and composition
//! - **Extraction**: chat title, memory records, media library, block stripping
//! - **Unicode Aware**: grapheme-safe previews
//!
//! ## Example
//!
//! ```
//! use blockstream::{Payload, dispatch_all, parse};
//!
//! let input = r#"Here: [BLOCK:{"type":"code","lang":"rust"}]fn main() {}[/BLOCK]"#;
//! let segments = parse(input);
//! let payloads = dispatch_all(&segments);
//! assert!(matches!(payloads[1], Payload::Code { .. }));
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
// Note: unsafe is needed for memory-mapped I/O (memmap2)
#![warn(unsafe_code)]

pub mod annotation;
pub mod cli;
pub mod compose;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod io;
pub mod parser;
pub mod render;
pub mod session;

// Re-export commonly used types at crate root
pub use error::{BlockError, Error, Result};

// Re-export core domain types
pub use core::{BlockMeta, BlockType, Segment, SegmentKind};

// Re-export parsing
pub use parser::{Parser, ParserConfig, parse, parse_batch, sanitize};

// Re-export dispatch
pub use dispatch::{Dispatcher, Payload, dispatch, dispatch_all};

// Re-export annotations and composition
pub use annotation::{AnnotatedMessage, Annotation, AnnotationTask, read_annotated_message};
pub use compose::{BlockWriter, compose_block, compose_json_block, compose_outgoing};

// Re-export extractors
pub use extract::{extract_media, extract_memory, extract_title, strip_blocks};

// Re-export rendering and session state
pub use render::{Renderer, TextRenderer, render_text};
pub use session::ChatSession;

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
