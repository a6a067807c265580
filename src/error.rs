//! Error types for blockstream operations.
//!
//! This module provides the error hierarchy using `thiserror` for block
//! decoding, file I/O, and CLI commands. Note that the parser itself never
//! fails: malformed headers degrade to plain text. The block errors here are
//! produced by the dispatcher and the extractors, one segment at a time.

use thiserror::Error;

/// Result type alias for blockstream operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for blockstream operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Block-level errors (header or body decoding).
    #[error("block error: {0}")]
    Block(#[from] BlockError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Operation not valid in the current session state.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of the state error.
        message: String,
    },
}

/// Errors raised while interpreting a single block.
///
/// Each variant is scoped to one segment; sibling segments are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// The `[BLOCK:<header>]` header is not a JSON object with a string `type`.
    #[error("invalid block header: {reason}")]
    HeaderDecode {
        /// Why the header was rejected.
        reason: String,
    },

    /// The body of a structured block failed to decode.
    #[error("failed to decode {block_type} block: {message}")]
    BlockDecode {
        /// Declared type of the offending block.
        block_type: String,
        /// Underlying decoder message.
        message: String,
    },

    /// The body decoded, but fields required to display the media are missing.
    #[error("incomplete {block_type} block: missing {}", .missing.join(", "))]
    IncompleteMedia {
        /// Declared type of the offending block.
        block_type: String,
        /// Names of the missing fields.
        missing: Vec<&'static str>,
    },

    /// A block could not be written in the block grammar.
    #[error("cannot encode {block_type} block: {message}")]
    Encode {
        /// Declared type of the block being written.
        block_type: String,
        /// Why the block was rejected.
        message: String,
    },
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Memory mapping error.
    #[error("memory mapping failed: {path}: {reason}")]
    MmapFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid UTF-8 encountered at specific byte offset.
    #[error("invalid UTF-8 at byte offset {offset}")]
    InvalidUtf8 {
        /// Byte offset where invalid UTF-8 was found.
        offset: usize,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing required argument.
    #[error("missing required argument: {0}")]
    MissingArgument(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<std::string::FromUtf8Error> for IoError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::InvalidUtf8 {
            offset: err.utf8_error().valid_up_to(),
        }
    }
}

impl From<std::str::Utf8Error> for IoError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::InvalidUtf8 {
            offset: err.valid_up_to(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_error_display() {
        let err = BlockError::HeaderDecode {
            reason: "expected value".to_string(),
        };
        assert_eq!(err.to_string(), "invalid block header: expected value");

        let err = BlockError::BlockDecode {
            block_type: "table".to_string(),
            message: "missing field `rows`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to decode table block: missing field `rows`"
        );
    }

    #[test]
    fn test_incomplete_media_lists_fields() {
        let err = BlockError::IncompleteMedia {
            block_type: "youtube_video".to_string(),
            missing: vec!["title", "thumbnailUrl"],
        };
        assert_eq!(
            err.to_string(),
            "incomplete youtube_video block: missing title, thumbnailUrl"
        );
    }

    #[test]
    fn test_encode_and_state_errors() {
        let err = BlockError::Encode {
            block_type: "code".to_string(),
            message: "body contains a closing marker".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot encode code block: body contains a closing marker"
        );

        let err = Error::InvalidState {
            message: "no such message".to_string(),
        };
        assert_eq!(err.to_string(), "invalid state: no such message");
    }

    #[test]
    fn test_io_error_variants() {
        let err = IoError::FileNotFound {
            path: "/tmp/test.txt".to_string(),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/test.txt");

        let err = IoError::ReadFailed {
            path: "/tmp/test".to_string(),
            reason: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("permission denied"));

        let err = IoError::MmapFailed {
            path: "/tmp/big".to_string(),
            reason: "out of memory".to_string(),
        };
        assert!(err.to_string().contains("memory mapping"));

        let err = IoError::InvalidUtf8 { offset: 42 };
        assert_eq!(err.to_string(), "invalid UTF-8 at byte offset 42");
    }

    #[test]
    fn test_command_error_variants() {
        let err = CommandError::MissingArgument("--type".to_string());
        assert_eq!(err.to_string(), "missing required argument: --type");

        let err = CommandError::InvalidArgument("--bad".to_string());
        assert!(err.to_string().contains("invalid argument"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(IoError::Generic(_))));
    }

    #[test]
    fn test_error_from_block() {
        let err: Error = BlockError::HeaderDecode {
            reason: "x".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Block(_)));
    }

    #[test]
    fn test_from_utf8_errors() {
        let invalid_bytes: Vec<u8> = vec![0xff, 0xfe];
        let err: IoError = String::from_utf8(invalid_bytes.clone()).unwrap_err().into();
        assert!(matches!(err, IoError::InvalidUtf8 { offset: 0 }));

        let err: IoError = std::str::from_utf8(&invalid_bytes).unwrap_err().into();
        assert!(matches!(err, IoError::InvalidUtf8 { offset: 0 }));
    }
}
