//! Core contracts for the percept inspection pipeline
//!
//! This crate defines the types every other percept crate builds on:
//!
//! - [`Entity`]: any concretely-typed value produced by format recognition.
//!   Values travel the pipeline as `Box<dyn Entity>` and are routed to
//!   analyzers by their exact type, so analyzer authors never downcast.
//! - [`MatchContext`]: an immutable, capability-keyed service map plus an
//!   optionally bound byte source, threaded through format matching.
//! - [`AnalysisContext`]: the immutable graph-linkage state (parent node,
//!   current node, initialization flag) threaded through analysis.
//! - [`AnalysisResult`]: the normalized outcome of analyzing one entity.
//! - [`ByteSource`]: the byte-stream abstraction with declared length and
//!   access mode.
//! - [`GraphSink`]: the write-only graph capability the pipeline emits
//!   descriptions into, with [`MemoryGraph`] as an in-memory reference
//!   implementation.
//!
//! Contexts are value types: every `with_*` operation produces a new
//! context and never mutates in place, so they are freely shared across
//! concurrently analyzed entities without synchronization.

pub mod context;
pub mod entity;
pub mod error;
pub mod graph;
pub mod result;
pub mod source;
pub mod text;

pub use context::{AnalysisContext, MatchContext};
pub use entity::Entity;
pub use error::{AnalysisFailure, AnalyzerError};
pub use graph::{Assertion, GraphSink, MemoryGraph, NodeId, Term};
pub use result::AnalysisResult;
pub use source::{read_prefix, AccessMode, ByteSource, BytesSource, FileSource};
pub use text::{EncodingObserver, TextConfidence};
