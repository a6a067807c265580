//! Core domain models for blockstream.
//!
//! This module contains the data structures shared by the parser, the
//! dispatcher, and the extractors: segments, block headers, and the closed
//! set of block types. These are pure domain models with no I/O.

pub mod block_type;
pub mod segment;

pub use block_type::BlockType;
pub use segment::{BlockMeta, Segment, SegmentKind};
