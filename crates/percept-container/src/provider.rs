//! The container provider and container analyzer contracts.
//!
//! A [`ContainerProvider`] decides whether an entity is the root of
//! further analyzable entities; its [`ContainerAnalyzer`] enumerates those
//! children and, crucially, does *not* recurse itself. It is handed a
//! continuation and must invoke it to descend; the generic driver behind
//! the continuation enforces depth limits, cycle detection, cancellation
//! and per-entry error isolation uniformly for every container kind.

use crate::behaviour::ContainerBehaviour;
use crate::error::Result;
use percept_core::{AnalysisContext, AnalysisResult, AnalyzerError, Entity};

/// One enumerated child of a container.
pub struct ChildEntry {
    /// Entry name within the container (file name, member path).
    pub name: String,
    /// Stable identity for cycle detection, when the container can supply
    /// one (canonical path, archive member identity). Without it the
    /// driver derives an identity from the traversal position.
    pub identity: Option<String>,
    /// The child entity itself, concretely typed inside.
    pub entity: Box<dyn Entity>,
}

impl ChildEntry {
    /// An entry without an intrinsic identity.
    #[must_use = "constructs an entry that should be enumerated"]
    pub fn new(name: impl Into<String>, entity: Box<dyn Entity>) -> Self {
        Self {
            name: name.into(),
            identity: None,
            entity,
        }
    }

    /// Attach a stable identity.
    #[must_use = "returns the entry with the identity attached"]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }
}

/// The continuation a container analyzer invokes to descend into the
/// entity's own children.
pub type Descend<'a> = dyn FnMut(ContainerBehaviour) -> Result<AnalysisResult> + 'a;

/// Format-specific traversal logic for one container kind.
pub trait ContainerAnalyzer: Send + Sync {
    /// Analyze the container entity.
    ///
    /// The context arrives with the container's output node already
    /// resolved and initialized. To recurse into the entity's children the
    /// implementation must invoke `descend`, requesting
    /// [`ContainerBehaviour::FOLLOW_CHILDREN`]; the returned result
    /// aggregates the children's captured failures. Not invoking the
    /// continuation means the container's contents are deliberately left
    /// unexplored.
    ///
    /// # Errors
    /// Only fatal conditions; recoverable problems belong in the result.
    fn analyze(
        &self,
        entity: &dyn Entity,
        context: &AnalysisContext,
        descend: &mut Descend<'_>,
    ) -> Result<AnalysisResult>;

    /// Enumerate the entity's direct children.
    ///
    /// Called by the driver when descent was requested. Enumeration is
    /// per-call: implementations rebuild the list on every invocation.
    ///
    /// # Errors
    /// An enumeration failure is recorded against the container entity;
    /// only fatal errors abort the traversal.
    fn children(&self, entity: &dyn Entity) -> std::result::Result<Vec<ChildEntry>, AnalyzerError>;
}

/// One registered container interpretation.
pub trait ContainerProvider: Send + Sync {
    /// Name of the container kind, for diagnostics.
    fn name(&self) -> &'static str;

    /// Test whether `root` is a container root for this provider.
    ///
    /// `None` means inapplicable, not an error; the driver tries the next
    /// registered provider.
    fn match_root(
        &self,
        root: &dyn Entity,
        context: &AnalysisContext,
    ) -> Option<&dyn ContainerAnalyzer>;
}
