//! Type-keyed analyzer registration and dispatch.
//!
//! Analyzers are registered for a concrete entity type through
//! [`AnalyzerRegistry::register`]; the registry performs the single,
//! centralized runtime type match, so analyzer authors only ever see their
//! own concrete type. Dispatch is first-success-wins in registration
//! order: the first analyzer producing a node stops the search, with every
//! earlier failure folded into the winning result.

use percept_core::{AnalysisContext, AnalysisFailure, AnalysisResult, AnalyzerError, Entity};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Analysis logic for entities of type `T`.
///
/// Implemented directly, or satisfied by any matching closure.
pub trait EntityAnalyzer<T>: Send + Sync {
    /// Analyze one entity under the given context.
    ///
    /// Return a result without a node to decline; reserve errors for
    /// attempts that started and then failed.
    ///
    /// # Errors
    /// Returns an error when the attempt failed; the dispatcher captures
    /// non-fatal errors and propagates fatal ones.
    fn analyze(&self, entity: &T, context: &AnalysisContext)
        -> Result<AnalysisResult, AnalyzerError>;
}

impl<T, F> EntityAnalyzer<T> for F
where
    F: Fn(&T, &AnalysisContext) -> Result<AnalysisResult, AnalyzerError> + Send + Sync,
{
    fn analyze(
        &self,
        entity: &T,
        context: &AnalysisContext,
    ) -> Result<AnalysisResult, AnalyzerError> {
        self(entity, context)
    }
}

type ErasedAnalyzer =
    Arc<dyn Fn(&dyn Entity, &AnalysisContext) -> Result<AnalysisResult, AnalyzerError> + Send + Sync>;

/// Registry mapping concrete entity types to their analyzers.
///
/// Read-only during a traversal; `analyze` is safe to call concurrently
/// for independent entities since all threaded state is immutable.
#[derive(Default)]
pub struct AnalyzerRegistry {
    analyzers: HashMap<TypeId, Vec<ErasedAnalyzer>>,
}

impl AnalyzerRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an analyzer for entities of type `T`.
    ///
    /// Analyzers for the same type run in registration order.
    pub fn register<T, A>(&mut self, analyzer: A)
    where
        T: Any + Send + Sync,
        A: EntityAnalyzer<T> + 'static,
    {
        let erased: ErasedAnalyzer = Arc::new(move |entity, context| {
            match entity.as_any().downcast_ref::<T>() {
                Some(typed) => analyzer.analyze(typed, context),
                // Unreachable through dispatch; kept as a guard for
                // callers invoking erased analyzers directly.
                None => Err(AnalyzerError::Failed(format!(
                    "analyzer for {} received a {}",
                    std::any::type_name::<T>(),
                    entity.type_label()
                ))),
            }
        });
        self.analyzers
            .entry(TypeId::of::<T>())
            .or_default()
            .push(erased);
    }

    /// Number of analyzers registered for `entity`'s concrete type.
    #[must_use]
    pub fn analyzer_count(&self, entity: &dyn Entity) -> usize {
        self.analyzers
            .get(&entity.as_any().type_id())
            .map_or(0, Vec::len)
    }

    /// Dispatch `entity` to its registered analyzers.
    ///
    /// Walks the analyzers for the entity's exact type in registration
    /// order. The first result carrying a node wins; earlier failures
    /// (errors, panics, declines that recorded errors) are folded into the
    /// winning result's `error`. When every analyzer declines or fails the
    /// result has no node and carries the aggregate failure; when none is
    /// registered the result is "unrecognized" with no error.
    ///
    /// # Errors
    /// Only fatal errors (cancellation, resource limits, contract
    /// violations) propagate; everything else is captured per entity.
    pub fn analyze(
        &self,
        entity: &dyn Entity,
        context: &AnalysisContext,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let Some(candidates) = self.analyzers.get(&entity.as_any().type_id()) else {
            return Ok(AnalysisResult::unrecognized());
        };

        let mut failure = AnalysisFailure::default();
        for analyzer in candidates {
            match catch_unwind(AssertUnwindSafe(|| analyzer(entity, context))) {
                Ok(Ok(mut result)) if result.is_recognized() => {
                    if let Some(own) = result.error.take() {
                        failure.merge(own);
                    }
                    result.error = failure.into_option();
                    return Ok(result);
                }
                Ok(Ok(result)) => {
                    // Declined; keep any errors it still recorded.
                    if let Some(own) = result.error {
                        failure.merge(own);
                    }
                }
                Ok(Err(err)) if err.is_fatal() => return Err(err),
                Ok(Err(err)) => {
                    log::warn!("analyzer failed for {}: {err}", entity.type_label());
                    failure.push(err);
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    log::warn!("analyzer panicked for {}: {message}", entity.type_label());
                    failure.push(AnalyzerError::Panicked(message));
                }
            }
        }

        let mut result = AnalysisResult::unrecognized();
        result.record_failure(failure);
        Ok(result)
    }
}

/// Best-effort text of a panic payload.
fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
