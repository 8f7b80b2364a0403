//! Traversal configuration and cooperative cancellation.

use percept_core::Term;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default maximum nesting depth for recursive container descent.
///
/// Limits how deeply nested containers are entered (archive within
/// archive), preventing runaway recursion on malicious input.
pub const MAX_NESTING_DEPTH: usize = 10;

/// Default maximum number of entries traversed per container.
pub const MAX_CHILDREN: usize = 10_000;

/// Shared flag requesting cooperative cancellation.
///
/// Cloning shares the flag; the driver checks it between sibling entries.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A flag in the not-cancelled state.
    #[must_use = "creates a flag that should be shared with the driver"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[inline]
    #[must_use = "returns the cancellation state"]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Driver-enforced traversal limits and linkage vocabulary.
#[derive(Clone, Debug)]
pub struct TraversalConfig {
    max_depth: usize,
    max_children: usize,
    child_link: Term,
    cancel: CancelFlag,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
            max_children: MAX_CHILDREN,
            child_link: Term::new("contains"),
            cancel: CancelFlag::new(),
        }
    }
}

impl TraversalConfig {
    /// Default limits: depth [`MAX_NESTING_DEPTH`], [`MAX_CHILDREN`]
    /// entries per container, children linked through `contains`.
    #[must_use = "creates a configuration that should be given to the driver"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth.
    #[inline]
    #[must_use = "returns the configuration with the depth limit set"]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the per-container entry budget.
    #[inline]
    #[must_use = "returns the configuration with the child budget set"]
    pub const fn with_max_children(mut self, max_children: usize) -> Self {
        self.max_children = max_children;
        self
    }

    /// Set the vocabulary term children are linked to their parent with.
    #[must_use = "returns the configuration with the link term set"]
    pub fn with_child_link(mut self, child_link: Term) -> Self {
        self.child_link = child_link;
        self
    }

    /// Share a cancellation flag with the driver.
    #[must_use = "returns the configuration with the flag attached"]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// The maximum nesting depth.
    #[inline]
    #[must_use = "returns the depth limit"]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The per-container entry budget.
    #[inline]
    #[must_use = "returns the child budget"]
    pub const fn max_children(&self) -> usize {
        self.max_children
    }

    /// The parent-to-child link term.
    #[inline]
    #[must_use = "returns the link term"]
    pub fn child_link(&self) -> &Term {
        &self.child_link
    }

    /// The shared cancellation flag.
    #[inline]
    #[must_use = "returns the cancellation flag"]
    pub fn cancel(&self) -> &CancelFlag {
        &self.cancel
    }
}
