//! Format recognition for percept
//!
//! A [`FormatCatalog`] holds an open-ended set of format descriptors.
//! Binary descriptors ([`BinaryFormat`]) declare a required header length
//! and a pure header predicate; structured descriptors
//! ([`StructuredFormat`]) test the sniffed root element and document-type
//! identifiers of a markup stream. The catalog's recognition driver reads
//! one header prefix per candidate and delivers the first successfully
//! parsed entity through a caller-supplied callback, so downstream
//! dispatch binds to the concrete type without inspecting it here.

pub mod catalog;
pub mod descriptor;
pub mod error;

pub use catalog::{FormatCatalog, Recognition};
pub use descriptor::{sniff_tree, BinaryFormat, DocTree, StructuredFormat};
pub use error::FormatError;
