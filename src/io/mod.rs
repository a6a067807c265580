//! I/O utilities for blockstream.
//!
//! Provides transcript reading with memory mapping support for large
//! exports, along with grapheme-aware preview helpers.

pub mod reader;
pub mod unicode;

pub use reader::{FileReader, read_file, read_input, read_stdin};
pub use unicode::{preview, truncate_graphemes};
