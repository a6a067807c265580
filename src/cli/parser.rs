//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::extract::MediaKind;
use crate::parser::{DEFAULT_MAX_HEADER_LEN, DEFAULT_PREVIEW_LEN, ParserConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// blockstream: inline block-annotation parser.
///
/// Reads chat transcripts containing `[BLOCK:{...}]...[/BLOCK]` annotations
/// and extracts, renders, or rewrites the typed blocks.
#[derive(Parser, Debug)]
#[command(name = "blockstream")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Maximum block header length in bytes.
    #[arg(
        long,
        global = true,
        env = "BLOCKSTREAM_MAX_HEADER_LEN",
        default_value_t = DEFAULT_MAX_HEADER_LEN
    )]
    pub max_header_len: usize,

    /// Preview length (grapheme clusters) for Tag/Explain indicators.
    #[arg(
        long,
        global = true,
        env = "BLOCKSTREAM_PREVIEW_LEN",
        default_value_t = DEFAULT_PREVIEW_LEN
    )]
    pub preview_len: usize,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a stream into segments.
    Parse {
        /// Input file (stdin when omitted).
        file: Option<PathBuf>,

        /// Decode each segment into its typed payload.
        #[arg(short, long)]
        dispatch: bool,
    },

    /// Render a stream as plain text.
    Render {
        /// Input file (stdin when omitted).
        file: Option<PathBuf>,

        /// Show thinking blocks expanded.
        #[arg(long)]
        expand_thinking: bool,
    },

    /// Extract the chat title from an assistant message.
    Title {
        /// Input file (stdin when omitted).
        file: Option<PathBuf>,
    },

    /// Collect media across messages.
    ///
    /// Each file is one message.
    Media {
        /// Message files (stdin when omitted).
        files: Vec<PathBuf>,

        /// Only list one kind of media.
        #[arg(short, long, value_enum)]
        kind: Option<MediaKind>,
    },

    /// Read a user message with its Tag/Explain annotation.
    Annotation {
        /// Input file (stdin when omitted).
        file: Option<PathBuf>,
    },

    /// Write a block.
    Compose {
        /// Declared block type.
        #[arg(short = 't', long = "type")]
        block_type: String,

        /// Language hint.
        #[arg(short, long)]
        lang: Option<String>,

        /// Block body (stdin when omitted).
        body: Option<String>,
    },

    /// Remove blocks of the given types.
    Strip {
        /// Input file (stdin when omitted).
        file: Option<PathBuf>,

        /// Block types to remove (default: RAGItem, memory).
        #[arg(short = 't', long = "type")]
        types: Vec<String>,
    },
}

impl Cli {
    /// Returns the parser configuration selected by the global flags.
    #[must_use]
    pub const fn parser_config(&self) -> ParserConfig {
        ParserConfig::new()
            .max_header_len(self.max_header_len)
            .preview_len(self.preview_len)
    }
}
