//! # Invalidation Bridge
//!
//! Connects the generated-data store to the host's module graph. After a
//! successful commit the two virtual modules are marked dirty so consumers
//! that imported a stub during generation re-fetch real data; when a route
//! definition file changes, the store is cleared as well and consumers are
//! force-reloaded, since the registry's method-to-module wiring may have
//! structurally changed.

use crate::ids::VirtualModuleId;
use crate::store::GenerationContext;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Opaque handle to a module instance held by the host's module graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleKey(pub u64);

/// Contract required from the host's module graph.
///
/// Both operations are synchronous and side-effect-only; their internals
/// (hot-reload signaling, dependency tracking) are the host's concern.
pub trait ModuleGraph: Send + Sync {
    /// Handle to the instance currently held for `resolved_id`, if any.
    fn get_module_by_id(&self, resolved_id: &str) -> Option<ModuleKey>;

    /// Mark the instance invalid so the next import re-enters the loader.
    fn invalidate_module(&self, key: ModuleKey);

    /// Ask consumers of the virtual modules to fully reload rather than
    /// hot-patch in place.
    fn request_full_reload(&self);
}

/// Mark whichever virtual modules the graph currently holds as dirty.
pub(crate) fn invalidate_virtual_modules(graph: &dyn ModuleGraph) {
    for module in VirtualModuleId::ALL {
        if let Some(key) = graph.get_module_by_id(module.resolved_id()) {
            graph.invalidate_module(key);
            debug!(module = %module, "invalidated virtual module");
        }
    }
}

/// Bridge between store, file-watch events, and the host module graph.
#[derive(Clone)]
pub struct InvalidationBridge {
    ctx: Arc<GenerationContext>,
    route_suffix: String,
}

impl InvalidationBridge {
    /// `route_suffix` is the filename suffix identifying route definition
    /// files (external policy; `+server.ts` in the SvelteKit convention).
    pub fn new(ctx: Arc<GenerationContext>, route_suffix: impl Into<String>) -> Self {
        Self {
            ctx,
            route_suffix: route_suffix.into(),
        }
    }

    /// Whether `path` names a route definition file.
    pub fn is_route_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with(&self.route_suffix))
            .unwrap_or(false)
    }

    /// Called by the orchestrator after a non-empty commit. Consumers that
    /// received a stub during the cycle are invalidated; the fresh cache is
    /// left in place.
    pub fn on_data_committed(&self, graph: &dyn ModuleGraph) {
        invalidate_virtual_modules(graph);
    }

    /// Called by the host's file-watch integration. Returns `true` when the
    /// path matched the route convention and invalidation ran. The store is
    /// cleared even when no graph is connected yet, so the next load
    /// regenerates either way.
    pub fn on_relevant_file_changed(&self, path: &Path, graph: Option<&dyn ModuleGraph>) -> bool {
        if !self.is_route_file(path) {
            return false;
        }
        debug!(path = %path.display(), "route file changed, schema will regenerate on next import");
        self.ctx.clear();
        if let Some(graph) = graph {
            invalidate_virtual_modules(graph);
            graph.request_full_reload();
        }
        true
    }
}
