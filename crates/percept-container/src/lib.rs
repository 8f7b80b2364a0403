//! Container traversal for percept
//!
//! Generalizes "this entity is the root of further analyzable entities"
//! across unrelated container kinds: archives, directory trees, compound
//! documents, multi-part media. Each kind implements the provider contract
//! (recognize a root, enumerate children); the generic [`TraversalDriver`]
//! owns the actual recursion through an inverted continuation, which lets
//! it enforce depth limits, entry budgets, cycle detection, cooperative
//! cancellation and per-entry error isolation in one place.

pub mod behaviour;
pub mod config;
pub mod driver;
pub mod error;
pub mod node;
pub mod provider;

pub use behaviour::ContainerBehaviour;
pub use config::{CancelFlag, TraversalConfig, MAX_CHILDREN, MAX_NESTING_DEPTH};
pub use driver::TraversalDriver;
pub use error::TraversalError;
pub use node::ContainerNode;
pub use provider::{ChildEntry, ContainerAnalyzer, ContainerProvider, Descend};
