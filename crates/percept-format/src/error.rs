//! Error types for format recognition.

use thiserror::Error;

/// Errors from a format descriptor's deep parse.
///
/// A descriptor that simply does not recognize the content declines with
/// `Ok(None)`; these errors cover parses that started and then failed.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O failure while reading the byte source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The content matched the header but its body is malformed.
    #[error("malformed {format} content: {reason}")]
    Malformed {
        /// Name of the format whose parse failed.
        format: String,
        /// What was wrong with the body.
        reason: String,
    },

    /// Opaque failure from a descriptor's parser.
    #[error("parser error: {0}")]
    Parser(#[from] anyhow::Error),
}

impl FormatError {
    /// Shorthand for [`FormatError::Malformed`].
    pub fn malformed(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            format: format.into(),
            reason: reason.into(),
        }
    }
}

/// Type alias for [`Result<T, FormatError>`].
pub type Result<T> = std::result::Result<T, FormatError>;
