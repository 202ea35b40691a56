//! Error types for the crossing-reduction engine
//!
//! The reordering algorithm itself has no recoverable error domain — it
//! assumes a well-formed graph. The only error this crate surfaces is a
//! defensive check performed while building the arena from the
//! caller-supplied integer buffer.

use thiserror::Error;

/// Errors raised while building the arena from an input buffer.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("buffer ended after {consumed} integers while parsing {expected}")]
    BufferTooShort { consumed: usize, expected: &'static str },

    #[error("edge references node {node_id}, which does not exist in rank {expected_rank}")]
    UnknownNode { node_id: i32, expected_rank: usize },

    #[error("expected {expected} nodes total but the buffer declared {actual}")]
    NodeCountMismatch { expected: usize, actual: usize },

    #[error("expected {expected} edges total but the buffer declared {actual}")]
    EdgeCountMismatch { expected: usize, actual: usize },

    #[error("edge weight must be positive, got {weight}")]
    NonPositiveWeight { weight: i32 },
}
