//! The normalized outcome of analyzing one entity.

use crate::error::AnalysisFailure;
use crate::graph::NodeId;

/// Result of one entity analysis.
///
/// A present `node` means recognition succeeded; an absent `node` with no
/// `error` means "unrecognized", which is not a failure. `error` may be
/// populated alongside a present node: partial success, where some
/// analyzers failed before one succeeded.
#[derive(Debug, Default)]
pub struct AnalysisResult {
    /// The graph node the entity's description was attached to.
    pub node: Option<NodeId>,
    /// An optional human-oriented label for the entity.
    pub label: Option<String>,
    /// Captured per-attempt failures, if any.
    pub error: Option<AnalysisFailure>,
}

impl AnalysisResult {
    /// The "unrecognized" result: no node, no label, no error.
    #[must_use = "constructs a result that should be returned"]
    pub fn unrecognized() -> Self {
        Self::default()
    }

    /// A successful result carrying the output node.
    #[must_use = "constructs a result that should be returned"]
    pub fn with_node(node: NodeId) -> Self {
        Self {
            node: Some(node),
            label: None,
            error: None,
        }
    }

    /// Attach a label.
    #[must_use = "returns the result with the label attached"]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether recognition succeeded.
    #[inline]
    #[must_use = "returns whether a node is present"]
    pub fn is_recognized(&self) -> bool {
        self.node.is_some()
    }

    /// Fold captured failures into this result, preserving order.
    pub fn record_failure(&mut self, failure: AnalysisFailure) {
        if failure.is_empty() {
            return;
        }
        match &mut self.error {
            Some(existing) => existing.merge(failure),
            slot @ None => *slot = Some(failure),
        }
    }
}
