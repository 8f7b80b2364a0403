//! Graph-node resolution for analyzers.
//!
//! An analyzer never decides on its own where its output attaches. It asks
//! [`get_node`] (or a named/initializing variant), which resolves the node
//! in a fixed order: the context's pre-assigned node, a child derived from
//! the parent by a stable sub-name, or a freshly minted node. The same
//! logical path therefore always yields the same node identity,
//! independent of content.

use percept_core::{AnalysisContext, AnalyzerError, GraphSink, NodeId};

/// Resolve the node the current entity's output attaches to.
///
/// Returns the node together with a derived context that has the node
/// assigned and initialization marked done; analyzers thread that context
/// into any nested work so revisits never re-initialize.
///
/// # Errors
/// Returns [`AnalyzerError::ForeignNode`] when the context carries a node
/// the graph does not own.
pub fn get_node(context: &AnalysisContext) -> Result<(NodeId, AnalysisContext), AnalyzerError> {
    get_node_with(context, None, |_, _| {})
}

/// Resolve the node, deriving from the parent by `subname` when no node is
/// pre-assigned.
///
/// # Errors
/// Returns [`AnalyzerError::ForeignNode`] when the context carries a node
/// the graph does not own.
pub fn get_node_named(
    context: &AnalysisContext,
    subname: &str,
) -> Result<(NodeId, AnalysisContext), AnalyzerError> {
    get_node_with(context, Some(subname), |_, _| {})
}

/// Resolve the node and run `init` exactly once per node.
///
/// `init` receives the graph and the resolved node; it runs only when the
/// context does not already mark the node as initialized, so a type
/// assertion made there is never repeated on revisits.
///
/// # Errors
/// Returns [`AnalyzerError::ForeignNode`] when the context carries a node
/// the graph does not own.
pub fn get_node_with(
    context: &AnalysisContext,
    subname: Option<&str>,
    init: impl FnOnce(&dyn GraphSink, &NodeId),
) -> Result<(NodeId, AnalysisContext), AnalyzerError> {
    let graph = context.graph();
    let node = if let Some(assigned) = context.node() {
        if !graph.owns(assigned) {
            return Err(AnalyzerError::ForeignNode);
        }
        assigned.clone()
    } else if let (Some(parent), Some(name)) = (context.parent_node(), subname) {
        graph.sub_node(parent, name)
    } else {
        graph.fresh_node()
    };

    let mut derived = context.clone().with_node(Some(node.clone()));
    if !context.initialized() {
        init(graph.as_ref(), &node);
        derived = derived.with_initialized(true);
    }
    Ok((node, derived))
}
