//! CLI layer for blockstream.
//!
//! Provides the command-line interface using clap, with commands for
//! parsing, rendering, and rewriting annotated transcripts.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
