//! Error types for the sumtype runtime

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Raised when a union is assembled from an erased payload that does not
/// fit the requested tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnionError {
    #[error("tag {tag} is out of range for a union of {arity} variants")]
    TagOutOfRange { tag: usize, arity: usize },

    #[error("payload for tag {tag} is not a `{expected}`")]
    PayloadMismatch { tag: usize, expected: &'static str },
}

/// Errors produced while encoding or decoding wire envelopes
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to encode envelope: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode envelope at {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
