//! The write-only graph capability.
//!
//! The pipeline never reads the description graph it produces; it only
//! asserts into it. A [`GraphSink`] mints nodes (fresh, from a URI, or
//! derived from a parent by a stable sub-name) and records three kinds of
//! assertion: a node's type, a literal property value and a link between
//! two nodes. Vocabulary terms are opaque tokens ([`Term`]) resolved by an
//! external collaborator; this crate attaches no meaning to them.
//!
//! [`MemoryGraph`] is the in-memory reference implementation used by tests
//! and by hosts that want to post-process assertions themselves.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// An opaque reference to a node of the external description graph.
///
/// Node identity is structural: two `NodeId`s are equal exactly when their
/// underlying identifiers are equal, regardless of which call produced
/// them. Cloning is cheap.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Wrap a raw identifier.
    #[must_use = "constructs a node reference"]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[inline]
    #[must_use = "returns the node identifier"]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque vocabulary token (a type or property identifier).
///
/// Terms compare structurally and carry no semantics here; the host's
/// term cache decides what they resolve to.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Term(Arc<str>);

impl Term {
    /// Wrap a raw token.
    #[must_use = "constructs a vocabulary term"]
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[inline]
    #[must_use = "returns the term token"]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({})", self.0)
    }
}

/// One recorded graph assertion, as kept by [`MemoryGraph`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Assertion {
    /// `node` is an instance of `ty`.
    Type { node: NodeId, ty: Term },
    /// `node` has literal `value` for property `prop`.
    Value {
        node: NodeId,
        prop: Term,
        value: String,
    },
    /// `node` is linked to `target` through property `prop`.
    Link {
        node: NodeId,
        prop: Term,
        target: NodeId,
    },
}

/// The write-only graph capability consumed by the pipeline.
///
/// Implementations must be safe to call from concurrently analyzed
/// sibling entities. Named minting is deterministic:
/// [`GraphSink::sub_node`] derives the same child for the same
/// `(parent, name)` pair on every call, so a logical path always yields
/// the same node identity independent of content.
pub trait GraphSink: Send + Sync {
    /// Locate or create the node with the given URI.
    fn node(&self, uri: &str) -> NodeId;

    /// Mint a fresh, globally unique node.
    fn fresh_node(&self) -> NodeId;

    /// Derive a child node from `parent` by a stable sub-name.
    fn sub_node(&self, parent: &NodeId, name: &str) -> NodeId;

    /// Assert `node`'s type.
    fn set_type(&self, node: &NodeId, ty: &Term);

    /// Assert a literal property value on `node`.
    fn put_value(&self, node: &NodeId, prop: &Term, value: &str);

    /// Assert a link from `node` to `target`.
    fn put_link(&self, node: &NodeId, prop: &Term, target: &NodeId);

    /// Whether `node` was minted by (or is adoptable by) this graph.
    ///
    /// A `false` return is a contract violation at the caller's site and
    /// surfaces as a fatal error there.
    fn owns(&self, _node: &NodeId) -> bool {
        true
    }
}

/// In-memory [`GraphSink`] recording every assertion in order.
#[derive(Default)]
pub struct MemoryGraph {
    assertions: Mutex<Vec<Assertion>>,
    counter: AtomicU64,
}

impl MemoryGraph {
    /// Create an empty graph.
    #[must_use = "creates a graph that should receive assertions"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all assertions recorded so far, in assertion order.
    ///
    /// # Panics
    /// Panics if a previous holder of the internal lock panicked.
    #[must_use = "returns the recorded assertions"]
    pub fn assertions(&self) -> Vec<Assertion> {
        self.assertions.lock().expect("graph lock poisoned").clone()
    }

    /// Types asserted for `node`, in assertion order.
    #[must_use = "returns the asserted types"]
    pub fn types_of(&self, node: &NodeId) -> Vec<Term> {
        self.assertions()
            .into_iter()
            .filter_map(|a| match a {
                Assertion::Type { node: n, ty } if &n == node => Some(ty),
                _ => None,
            })
            .collect()
    }

    /// Link targets asserted from `node` through `prop`.
    #[must_use = "returns the linked nodes"]
    pub fn links_from(&self, node: &NodeId, prop: &Term) -> Vec<NodeId> {
        self.assertions()
            .into_iter()
            .filter_map(|a| match a {
                Assertion::Link {
                    node: n,
                    prop: p,
                    target,
                } if &n == node && &p == prop => Some(target),
                _ => None,
            })
            .collect()
    }

    fn record(&self, assertion: Assertion) {
        self.assertions
            .lock()
            .expect("graph lock poisoned")
            .push(assertion);
    }
}

impl GraphSink for MemoryGraph {
    fn node(&self, uri: &str) -> NodeId {
        NodeId::new(uri)
    }

    fn fresh_node(&self) -> NodeId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        NodeId::new(format!("urn:percept:node:{n}"))
    }

    fn sub_node(&self, parent: &NodeId, name: &str) -> NodeId {
        NodeId::new(format!("{}/{name}", parent.as_str()))
    }

    fn set_type(&self, node: &NodeId, ty: &Term) {
        self.record(Assertion::Type {
            node: node.clone(),
            ty: ty.clone(),
        });
    }

    fn put_value(&self, node: &NodeId, prop: &Term, value: &str) {
        self.record(Assertion::Value {
            node: node.clone(),
            prop: prop.clone(),
            value: value.to_string(),
        });
    }

    fn put_link(&self, node: &NodeId, prop: &Term, target: &NodeId) {
        self.record(Assertion::Link {
            node: node.clone(),
            prop: prop.clone(),
            target: target.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_identity_is_structural() {
        let graph = MemoryGraph::new();
        let a = graph.node("urn:sha256:abc");
        let b = graph.node("urn:sha256:abc");
        assert_eq!(a, b);
        assert_ne!(a, graph.node("urn:sha256:def"));
    }

    #[test]
    fn test_fresh_nodes_are_unique() {
        let graph = MemoryGraph::new();
        let a = graph.fresh_node();
        let b = graph.fresh_node();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sub_node_is_deterministic() {
        let graph = MemoryGraph::new();
        let parent = graph.node("urn:file:archive.zip");
        let a = graph.sub_node(&parent, "entry-1");
        let b = graph.sub_node(&parent, "entry-1");
        // Same logical path always yields the same node identity.
        assert_eq!(a, b);
        assert_ne!(a, graph.sub_node(&parent, "entry-2"));
    }

    #[test]
    fn test_assertions_recorded_in_order() {
        let graph = MemoryGraph::new();
        let node = graph.node("n");
        let ty = Term::new("File");
        let prop = Term::new("name");
        graph.set_type(&node, &ty);
        graph.put_value(&node, &prop, "hello.txt");

        let recorded = graph.assertions();
        assert_eq!(recorded.len(), 2);
        assert_eq!(
            recorded[0],
            Assertion::Type {
                node: node.clone(),
                ty
            }
        );
        match &recorded[1] {
            Assertion::Value { value, .. } => assert_eq!(value, "hello.txt"),
            other => panic!("expected value assertion, got {other:?}"),
        }
    }

    #[test]
    fn test_links_from_filters_by_property() {
        let graph = MemoryGraph::new();
        let parent = graph.node("parent");
        let child = graph.node("child");
        let contains = Term::new("contains");
        let other = Term::new("other");
        graph.put_link(&parent, &contains, &child);
        graph.put_link(&parent, &other, &child);

        assert_eq!(graph.links_from(&parent, &contains), vec![child]);
    }

    #[test]
    fn test_default_owns_accepts_any_node() {
        let graph = MemoryGraph::new();
        assert!(graph.owns(&NodeId::new("urn:elsewhere:1")));
    }
}
