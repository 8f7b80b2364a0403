//! The generic traversal driver.
//!
//! One recursive walk serves every container kind: type-keyed analyzers
//! run first, then each registered provider gets to interpret the entity
//! as a container. Descent happens only through the continuation the
//! driver hands the provider's analyzer, which is where depth limits,
//! the per-container entry budget, cycle detection, cancellation and the
//! child-before-parent-link ordering are enforced.

use crate::behaviour::ContainerBehaviour;
use crate::config::TraversalConfig;
use crate::error::{Result, TraversalError};
use crate::node::ContainerNode;
use crate::provider::{ContainerAnalyzer, ContainerProvider};
use percept_analyze::{get_node, AnalyzerRegistry};
use percept_core::{AnalysisContext, AnalysisFailure, AnalysisResult, AnalyzerError, Entity, NodeId};
use std::sync::Arc;

/// Walks an entity tree through the registered container providers.
pub struct TraversalDriver {
    providers: Vec<Arc<dyn ContainerProvider>>,
    registry: Arc<AnalyzerRegistry>,
    config: TraversalConfig,
}

impl TraversalDriver {
    /// A driver with no providers registered yet.
    #[must_use = "creates a driver that should be given providers"]
    pub fn new(registry: Arc<AnalyzerRegistry>, config: TraversalConfig) -> Self {
        Self {
            providers: Vec::new(),
            registry,
            config,
        }
    }

    /// Append a container provider. Providers are consulted in
    /// registration order.
    pub fn register_provider(&mut self, provider: Arc<dyn ContainerProvider>) {
        self.providers.push(provider);
    }

    /// The active configuration.
    #[inline]
    #[must_use = "returns the driver configuration"]
    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Traverse the tree rooted at `root`.
    ///
    /// `identity` seeds the ancestry chain used for cycle detection; pick
    /// something stable for the root (canonical path, content URI).
    ///
    /// # Errors
    /// Fatal conditions only: cancellation, or a fatal analyzer error.
    /// Per-entity problems are captured in the returned result instead.
    pub fn traverse(
        &self,
        root: &dyn Entity,
        identity: &str,
        context: &AnalysisContext,
    ) -> Result<AnalysisResult> {
        self.visit(root, context, &ContainerNode::root(identity))
    }

    /// Analyze one entity and try its container interpretations.
    fn visit(
        &self,
        entity: &dyn Entity,
        context: &AnalysisContext,
        chain: &Arc<ContainerNode>,
    ) -> Result<AnalysisResult> {
        if self.config.cancel().is_cancelled() {
            return Err(TraversalError::Cancelled);
        }

        let mut result = self.registry.analyze(entity, context)?;

        let mut blocked = false;
        for provider in &self.providers {
            if blocked {
                break;
            }
            let Some(analyzer) = provider.match_root(entity, context) else {
                continue;
            };

            // The container's node: reuse what the type-keyed analyzers
            // already attached to, otherwise resolve one now.
            let base = match result.node.clone() {
                Some(node) => context
                    .clone()
                    .with_node(Some(node))
                    .with_initialized(true),
                None => context.clone(),
            };
            let (node, ctx) = get_node(&base)?;
            if result.node.is_none() {
                result.node = Some(node.clone());
            }

            let mut block_requested = false;
            let outcome = {
                let mut descend = |behaviour: ContainerBehaviour| -> Result<AnalysisResult> {
                    if behaviour.block_other() {
                        block_requested = true;
                    }
                    if behaviour.follow_children() {
                        self.descend(analyzer, entity, &ctx, &node, chain)
                    } else {
                        Ok(AnalysisResult::with_node(node.clone()))
                    }
                };
                analyzer.analyze(entity, &ctx, &mut descend)
            };

            match outcome {
                Ok(provider_result) => {
                    if let Some(failure) = provider_result.error {
                        result.record_failure(failure);
                    }
                    if result.label.is_none() {
                        result.label = provider_result.label;
                    }
                    if block_requested {
                        log::debug!(
                            "container {} blocked other interpretations of {}",
                            provider.name(),
                            entity.type_label()
                        );
                        blocked = true;
                    }
                }
                Err(TraversalError::Analyzer(err)) if !err.is_fatal() => {
                    log::warn!("container {} failed: {err}", provider.name());
                    result.record_failure(AnalysisFailure::from_error(err));
                }
                Err(err) => return Err(err),
            }
        }

        Ok(result)
    }

    /// Enumerate and recurse into a container's children.
    fn descend(
        &self,
        analyzer: &dyn ContainerAnalyzer,
        entity: &dyn Entity,
        context: &AnalysisContext,
        parent_node: &NodeId,
        chain: &Arc<ContainerNode>,
    ) -> Result<AnalysisResult> {
        let mut aggregate = AnalysisResult::with_node(parent_node.clone());

        if chain.depth() + 1 > self.config.max_depth() {
            log::warn!(
                "container depth limit {} reached at {}, not descending",
                self.config.max_depth(),
                chain.identity()
            );
            aggregate.record_failure(AnalysisFailure::from_error(AnalyzerError::Failed(
                format!("container depth limit {} reached", self.config.max_depth()),
            )));
            return Ok(aggregate);
        }

        let entries = match analyzer.children(entity) {
            Ok(entries) => entries,
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => {
                log::warn!("child enumeration failed at {}: {err}", chain.identity());
                aggregate.record_failure(AnalysisFailure::from_error(err));
                return Ok(aggregate);
            }
        };

        for (index, entry) in entries.into_iter().enumerate() {
            // Cooperative cancellation, checked between siblings.
            if self.config.cancel().is_cancelled() {
                return Err(TraversalError::Cancelled);
            }
            if index >= self.config.max_children() {
                log::warn!(
                    "child budget {} exhausted at {}, skipping remaining entries",
                    self.config.max_children(),
                    chain.identity()
                );
                break;
            }

            let identity = entry
                .identity
                .unwrap_or_else(|| format!("{}/{}", chain.identity(), entry.name));
            if chain.ancestry_contains(&identity) {
                log::warn!("container cycle at {identity}, skipping entry");
                continue;
            }

            let child_chain = chain.child(identity);
            let child_context = context.for_child(parent_node.clone());
            let child_result = self.visit(entry.entity.as_ref(), &child_context, &child_chain)?;

            // The child completed (or failed recoverably) before it is
            // linked under its parent.
            if let Some(child_node) = &child_result.node {
                context
                    .graph()
                    .put_link(parent_node, self.config.child_link(), child_node);
            }
            if let Some(failure) = child_result.error {
                aggregate.record_failure(failure);
            }
        }

        Ok(aggregate)
    }
}
