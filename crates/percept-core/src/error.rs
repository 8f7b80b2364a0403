//! Error types shared across the analysis pipeline.
//!
//! The pipeline distinguishes three outcomes that are easy to conflate:
//!
//! - **No match**: a format, analyzer or container provider declines an
//!   entity. Represented by an absent value (`None` / a result without a
//!   node), never by an error.
//! - **Recoverable**: one attempt on one entity failed. Caught at the
//!   dispatch boundary, recorded in that entity's [`AnalysisFailure`] and
//!   never allowed past it.
//! - **Fatal**: cancellation, resource exhaustion or a contract violation.
//!   These propagate to the host; see [`AnalyzerError::is_fatal`].
//!
//! [`AnalysisFailure`]: crate::AnalysisFailure

use thiserror::Error;

/// Error raised by one analysis or parse attempt on one entity.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// I/O failure while opening or reading the entity's byte source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The analyzer recognized the entity but could not process it.
    #[error("analysis failed: {0}")]
    Failed(String),

    /// Opaque failure from a format-specific parser.
    #[error("parser error: {0}")]
    Parser(#[from] anyhow::Error),

    /// The analyzer panicked; the payload is the panic message.
    ///
    /// Inputs are assumed adversarial, so a panic in one analyzer is
    /// captured at the dispatch boundary like any other per-entity error.
    #[error("analyzer panicked: {0}")]
    Panicked(String),

    /// Cooperative cancellation was requested. Fatal.
    #[error("analysis cancelled")]
    Cancelled,

    /// A driver-enforced budget (depth, child count, bytes) was exhausted.
    /// Fatal.
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),

    /// A graph node minted by an incompatible graph implementation was
    /// passed across a component boundary. Fatal contract violation.
    #[error("graph node belongs to a foreign graph implementation")]
    ForeignNode,
}

impl AnalyzerError {
    /// Whether this error must propagate to the host instead of being
    /// recorded in the entity's result.
    #[inline]
    #[must_use = "fatal errors must propagate, check the flag"]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::ResourceLimit(_) | Self::ForeignNode
        )
    }
}

/// The captured, possibly aggregated failure attached to one entity's
/// analysis result.
///
/// Several analyzers may fail for the same entity before one succeeds (or
/// all fail); every captured error is kept in registration order.
#[derive(Error, Debug, Default)]
pub struct AnalysisFailure {
    /// Captured per-attempt errors, in the order the attempts ran.
    pub errors: Vec<AnalyzerError>,
}

impl AnalysisFailure {
    /// Wrap a single error.
    #[must_use = "constructs a failure that should be attached to a result"]
    pub fn from_error(error: AnalyzerError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Append a captured error.
    pub fn push(&mut self, error: AnalyzerError) {
        self.errors.push(error);
    }

    /// Fold another failure's errors into this one, preserving order.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    /// True when no error was captured.
    #[inline]
    #[must_use = "returns whether the failure is empty"]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into `Some(self)` when non-empty, `None` otherwise.
    #[must_use = "returns the failure if any error was captured"]
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl std::fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no error captured"),
            [single] => write!(f, "{single}"),
            [first, rest @ ..] => {
                write!(f, "{first} (+{} more)", rest.len())
            }
        }
    }
}
