//! Error types for container traversal.

use percept_core::AnalyzerError;
use thiserror::Error;

/// Fatal conditions that abort a traversal.
///
/// Recoverable per-entry problems never surface here; they are recorded in
/// the affected entity's result and traversal continues.
#[derive(Error, Debug)]
pub enum TraversalError {
    /// Cooperative cancellation was requested.
    #[error("traversal cancelled")]
    Cancelled,

    /// A fatal analyzer error crossed the dispatch boundary.
    #[error("fatal analysis error: {0}")]
    Analyzer(#[from] AnalyzerError),
}

/// Type alias for [`Result<T, TraversalError>`].
pub type Result<T> = std::result::Result<T, TraversalError>;
