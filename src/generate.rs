//! # Generation Orchestrator
//!
//! Single-flight state machine around the external generation collaborator.
//! `ensure_generated` runs the collaborator at most once concurrently,
//! commits its results to the store, and triggers downstream invalidation so
//! stub consumers re-fetch. The collaborator is expensive (it scans every
//! route module), so everything downstream serves from the committed cache
//! until the invalidation bridge clears it.

use crate::invalidate::{InvalidationBridge, ModuleGraph};
use crate::store::{CacheEntry, GenerationContext, SchemaDocument, ValidationMap};
use std::path::Path;
use tracing::{debug, info};

/// Result of one generation cycle.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    /// OpenAPI paths document assembled from the route scan.
    pub open_api_paths: SchemaDocument,
    /// Route path → method → backing-module entry.
    pub validation_map: ValidationMap,
}

impl GenerationOutput {
    /// A cycle is a no-result cycle when both maps came back empty.
    pub fn is_empty(&self) -> bool {
        let schema_empty = match &self.open_api_paths {
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Null => true,
            _ => false,
        };
        schema_empty && self.validation_map.is_empty()
    }
}

/// The external route-scanning generation collaborator.
///
/// Implementations may load route modules while scanning, and those modules
/// may themselves import the virtual modules this crate serves — such
/// re-entrant loads are answered with stubs while generation is in flight.
pub trait SchemaGenerator: Send + Sync {
    /// Scan the project under `root` and produce the paths document and
    /// validation map. `server` is the host module graph when running inside
    /// a dev server, or `None` in a non-serving context.
    fn generate(
        &self,
        server: Option<&dyn ModuleGraph>,
        root: &Path,
    ) -> anyhow::Result<GenerationOutput>;
}

/// Populate the store if it is not already populated, then return it.
///
/// Callers must short-circuit on [`GenerationContext::is_generating`] before
/// calling; a lost race here returns the current snapshot rather than
/// queueing behind the in-flight call. Collaborator errors propagate to the
/// caller, with the generation flag already back at idle so a later request
/// can retry.
pub fn ensure_generated(
    ctx: &GenerationContext,
    generator: &dyn SchemaGenerator,
    server: Option<&dyn ModuleGraph>,
    root: &Path,
    bridge: &InvalidationBridge,
) -> anyhow::Result<CacheEntry> {
    let snapshot = ctx.snapshot();
    if snapshot.is_populated() {
        return Ok(snapshot);
    }

    let Some(_guard) = ctx.begin_generation() else {
        return Ok(snapshot);
    };

    info!("generating OpenAPI schema and validation map");
    let output = generator.generate(server, root)?;

    if output.is_empty() {
        debug!("generation returned empty data, keeping existing cache");
        ctx.commit_placeholders();
    } else {
        info!(
            routes = output.validation_map.len(),
            "generation complete, committing cache"
        );
        ctx.commit(output.open_api_paths, output.validation_map);
        if let Some(graph) = server {
            bridge.on_data_committed(graph);
        }
    }

    Ok(ctx.snapshot())
}
