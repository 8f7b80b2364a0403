//! Analyzer dispatch for percept
//!
//! Routes a recognized entity to the analyzers registered for its concrete
//! type and normalizes the outcome: first success wins, earlier failures
//! are captured rather than thrown, panics are contained at the dispatch
//! boundary, and fatal conditions (cancellation, resource limits, contract
//! violations) propagate to the host. Node resolution lives here too, so
//! analyzers never hand-wire graph linkage.

pub mod node;
pub mod registry;

pub use node::{get_node, get_node_named, get_node_with};
pub use registry::{AnalyzerRegistry, EntityAnalyzer};
