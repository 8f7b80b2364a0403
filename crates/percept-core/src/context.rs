//! Immutable contexts threaded through matching and analysis.
//!
//! Both context types are persistent value types: every `with_*` operation
//! clones and returns a new context. They are created fresh per top-level
//! inspection, derived down each recursive call and discarded when that
//! call returns. Nothing here is ever stored in ambient or thread-local
//! state.

use crate::graph::{GraphSink, NodeId};
use crate::source::ByteSource;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Capability-keyed service map plus an optionally bound byte source.
///
/// The capability tag of a service is its concrete Rust type: registering
/// a service with [`MatchContext::with_service`] makes it retrievable with
/// [`MatchContext::service`] under exactly that type, and under no other.
/// Merging two contexts is last-writer-wins per capability tag.
#[derive(Clone, Default)]
pub struct MatchContext {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    source: Option<Arc<dyn ByteSource>>,
}

impl MatchContext {
    /// Create an empty context.
    #[must_use = "creates a context that should be threaded through matching"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service under its concrete type. Non-mutating.
    #[must_use = "returns a new context with the service registered"]
    pub fn with_service<S: Any + Send + Sync>(mut self, service: Arc<S>) -> Self {
        self.services.insert(TypeId::of::<S>(), service);
        self
    }

    /// Look up the service registered under capability tag `S`.
    #[must_use = "returns the service if one is registered"]
    pub fn service<S: Any + Send + Sync>(&self) -> Option<Arc<S>> {
        self.services
            .get(&TypeId::of::<S>())
            .cloned()
            .and_then(|svc| svc.downcast::<S>().ok())
    }

    /// Bind the currently inspected byte source. Non-mutating.
    ///
    /// Format descriptors that parse nested content (an archive descriptor
    /// opening an inner entry) rebind the source here before handing the
    /// context down.
    #[must_use = "returns a new context with the source bound"]
    pub fn with_source(mut self, source: Arc<dyn ByteSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// The currently bound byte source, if any.
    #[inline]
    #[must_use = "returns the bound source if any"]
    pub fn source(&self) -> Option<&Arc<dyn ByteSource>> {
        self.source.as_ref()
    }

    /// Merge `other` over `self`: per capability tag the service from
    /// `other` wins, as does a source bound in `other`.
    #[must_use = "returns the merged context"]
    pub fn merged_with(&self, other: &Self) -> Self {
        let mut services = self.services.clone();
        for (tag, svc) in &other.services {
            services.insert(*tag, svc.clone());
        }
        Self {
            services,
            source: other.source.clone().or_else(|| self.source.clone()),
        }
    }

    /// Number of registered capability tags.
    #[inline]
    #[must_use = "returns the number of registered services"]
    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

impl fmt::Debug for MatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchContext")
            .field("services", &self.services.len())
            .field("source", &self.source.as_ref().map(|s| s.name()))
            .finish()
    }
}

/// Immutable graph-linkage state threaded through analysis.
///
/// `parent_node` and `node` are optional references into the external
/// graph; `initialized` records whether the current node's one-time
/// initialization (type assertion) already ran, so revisiting a node
/// never re-asserts it.
#[derive(Clone)]
pub struct AnalysisContext {
    parent_node: Option<NodeId>,
    node: Option<NodeId>,
    initialized: bool,
    graph: Arc<dyn GraphSink>,
    match_context: MatchContext,
}

impl AnalysisContext {
    /// Fresh context for a top-level inspection against `graph`.
    #[must_use = "creates a context that should be threaded through analysis"]
    pub fn new(graph: Arc<dyn GraphSink>) -> Self {
        Self {
            parent_node: None,
            node: None,
            initialized: false,
            graph,
            match_context: MatchContext::new(),
        }
    }

    /// The node this entity's output attaches to, if pre-assigned.
    #[inline]
    #[must_use = "returns the current node if assigned"]
    pub fn node(&self) -> Option<&NodeId> {
        self.node.as_ref()
    }

    /// The parent entity's output node, if any.
    #[inline]
    #[must_use = "returns the parent node if assigned"]
    pub fn parent_node(&self) -> Option<&NodeId> {
        self.parent_node.as_ref()
    }

    /// Whether the current node's one-time initialization already ran.
    #[inline]
    #[must_use = "returns the initialization flag"]
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// The node factory / graph capability.
    #[inline]
    #[must_use = "returns the graph capability"]
    pub fn graph(&self) -> &Arc<dyn GraphSink> {
        &self.graph
    }

    /// The embedded match context.
    #[inline]
    #[must_use = "returns the embedded match context"]
    pub fn match_context(&self) -> &MatchContext {
        &self.match_context
    }

    /// Replace the current node. Non-mutating.
    ///
    /// Invariant: replacing `node` with a *different* non-null node clears
    /// `parent_node` (the old parent no longer applies). Replacing it with
    /// the same node, or with no value, preserves `parent_node`.
    #[must_use = "returns a new context with the node replaced"]
    pub fn with_node(mut self, node: Option<NodeId>) -> Self {
        if let Some(ref new) = node {
            if self.node.as_ref() != Some(new) {
                self.parent_node = None;
            }
        }
        self.node = node;
        self
    }

    /// Replace the parent node. Non-mutating.
    #[must_use = "returns a new context with the parent replaced"]
    pub fn with_parent(mut self, parent: Option<NodeId>) -> Self {
        self.parent_node = parent;
        self
    }

    /// Set the initialization flag. Non-mutating.
    #[must_use = "returns a new context with the flag set"]
    pub fn with_initialized(mut self, initialized: bool) -> Self {
        self.initialized = initialized;
        self
    }

    /// Replace the embedded match context. Non-mutating.
    #[must_use = "returns a new context with the match context replaced"]
    pub fn with_match_context(mut self, match_context: MatchContext) -> Self {
        self.match_context = match_context;
        self
    }

    /// Derive the context a child entity is analyzed under: `parent` as
    /// the parent node, no pre-assigned node, initialization pending.
    #[must_use = "returns the derived child context"]
    pub fn for_child(&self, parent: NodeId) -> Self {
        Self {
            parent_node: Some(parent),
            node: None,
            initialized: false,
            graph: self.graph.clone(),
            match_context: self.match_context.clone(),
        }
    }
}

impl fmt::Debug for AnalysisContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisContext")
            .field("parent_node", &self.parent_node)
            .field("node", &self.node)
            .field("initialized", &self.initialized)
            .field("match_context", &self.match_context)
            .finish()
    }
}
