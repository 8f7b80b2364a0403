//! The entity contract: concretely-typed values produced by recognition
//!
//! A recognized value (an archive, an image header, a directory entry, a
//! parsed document tree) is an *entity*. Entities cross the pipeline as
//! `Box<dyn Entity>`; the concrete type is preserved inside and used as the
//! dispatch key by the analyzer registry. The single place that inspects
//! the runtime type is the registry itself — analyzer authors and format
//! descriptors only ever see concrete types.

use std::any::Any;

/// A value that can travel the analysis pipeline.
///
/// Blanket-implemented for every `'static` type that is `Send + Sync`,
/// so format descriptors can emit plain domain structs without ceremony.
pub trait Entity: Any + Send + Sync {
    /// Access the value as [`Any`] for type-keyed dispatch.
    fn as_any(&self) -> &(dyn Any + Send + Sync);

    /// The concrete Rust type name, for diagnostics only.
    ///
    /// Never use this for dispatch; type names are not stable identifiers.
    fn type_label(&self) -> &'static str;
}

impl<T: Any + Send + Sync> Entity for T {
    #[inline]
    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }

    #[inline]
    fn type_label(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
