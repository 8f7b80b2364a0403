//! The traversal ancestry chain.
//!
//! Distinct from the external description graph: these nodes only track
//! which container identities enclose the current position, so the driver
//! can refuse to re-enter an ancestor (a symlink loop, an archive that
//! contains itself).

use std::sync::Arc;

/// One link of the container ancestry chain.
#[derive(Debug)]
pub struct ContainerNode {
    parent: Option<Arc<ContainerNode>>,
    identity: String,
}

impl ContainerNode {
    /// Start a chain at the traversal root.
    #[must_use = "creates the chain the traversal threads down"]
    pub fn root(identity: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            parent: None,
            identity: identity.into(),
        })
    }

    /// Extend the chain with a child identity.
    #[must_use = "returns the extended chain"]
    pub fn child(self: &Arc<Self>, identity: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            parent: Some(self.clone()),
            identity: identity.into(),
        })
    }

    /// The stable identity of this position (entry path, archive name).
    #[inline]
    #[must_use = "returns the position identity"]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The enclosing position, if any.
    #[inline]
    #[must_use = "returns the parent link if any"]
    pub fn parent(&self) -> Option<&Arc<ContainerNode>> {
        self.parent.as_ref()
    }

    /// Number of ancestors above this position; the root is at depth 0.
    #[must_use = "returns the chain depth"]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_deref();
        while let Some(node) = current {
            depth += 1;
            current = node.parent.as_deref();
        }
        depth
    }

    /// Whether `identity` names this position or any ancestor.
    #[must_use = "returns the cycle test"]
    pub fn ancestry_contains(&self, identity: &str) -> bool {
        let mut current = Some(self);
        while let Some(node) = current {
            if node.identity == identity {
                return true;
            }
            current = node.parent.as_deref();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_counts_ancestors() {
        let root = ContainerNode::root("outer.zip");
        assert_eq!(root.depth(), 0);
        let inner = root.child("inner.zip");
        let leaf = inner.child("doc.txt");
        assert_eq!(inner.depth(), 1);
        assert_eq!(leaf.depth(), 2);
    }

    #[test]
    fn test_ancestry_detects_revisit() {
        let chain = ContainerNode::root("a").child("b").child("c");
        assert!(chain.ancestry_contains("a"));
        assert!(chain.ancestry_contains("c"));
        assert!(!chain.ancestry_contains("d"));
    }

    #[test]
    fn test_siblings_share_a_parent() {
        let root = ContainerNode::root("dir");
        let left = root.child("left");
        let right = root.child("right");
        assert!(!left.ancestry_contains("right"));
        assert!(Arc::ptr_eq(left.parent().unwrap(), right.parent().unwrap()));
    }
}
