//! Error types for digest computation and identifier parsing.

use thiserror::Error;

/// Errors from hashing, framing and identifier parsing.
#[derive(Error, Debug)]
pub enum HashError {
    /// I/O failure while streaming bytes into a digest.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No algorithm registered under the given name or code.
    #[error("unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),

    /// A framed digest ended before its declared length.
    #[error("truncated multihash frame: expected {expected} digest bytes, found {found}")]
    Truncated {
        /// Digest length declared by the frame header.
        expected: usize,
        /// Digest bytes actually present.
        found: usize,
    },

    /// A varint ran past the end of the buffer or past 64 bits.
    #[error("malformed varint: {0}")]
    MalformedVarint(&'static str),

    /// The algorithm has no multihash code, so it cannot be framed.
    #[error("algorithm '{0}' has no multihash code")]
    NoMultihashCode(String),
}

/// Type alias for [`Result<T, HashError>`].
pub type Result<T> = std::result::Result<T, HashError>;
