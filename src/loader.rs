//! # Virtual Module Loader
//!
//! The plugin surface exposed to the host dev server. It answers resolve and
//! load requests for the two virtual modules, short-circuiting to stubs
//! while a generation call is in flight and otherwise serving from the
//! committed cache (populating it first when needed).
//!
//! ## Load behavior
//!
//! 1. Generation in flight → immediate stub. The schema stub serializes
//!    whatever the store currently holds (or `{}`); the registry stub
//!    exports an empty registry and an already-resolved `initPromise`.
//! 2. Store unpopulated → run the orchestrator once.
//! 3. Serve from the store: the schema module as a literal data export, the
//!    registry module as emitted source.
//!
//! Serialization and emission failures degrade to an empty-module export and
//! a log line; a broken registry must not take down the load pipeline, only
//! leave validation unavailable for that cycle. Collaborator errors, by
//! contrast, propagate to the host's load hook.

use crate::emitter::{emit_registry_module, EMPTY_MODULE, EMPTY_REGISTRY_STUB};
use crate::generate::{ensure_generated, SchemaGenerator};
use crate::ids::VirtualModuleId;
use crate::invalidate::{InvalidationBridge, ModuleGraph};
use crate::runtime_config::RuntimeConfig;
use crate::store::{GenerationContext, SchemaDocument, ValidationMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info, warn};

/// Serialize the schema document as a literal default export.
///
/// Degrades to an empty export on serialization failure.
fn schema_module_source(schema: Option<&SchemaDocument>) -> String {
    let empty = SchemaDocument::Object(serde_json::Map::new());
    let value = schema.unwrap_or(&empty);
    match serde_json::to_string_pretty(value) {
        Ok(json) => format!("export default {json};\n"),
        Err(err) => {
            error!(error = %err, "failed to serialize OpenAPI schema, serving empty module");
            EMPTY_MODULE.to_string()
        }
    }
}

/// Serves the schema-paths and validation-registry virtual modules.
///
/// One instance lives for the duration of a dev-server session. The host
/// wires its plugin hooks straight through: `config_resolved`,
/// `configure_server`, `resolve_id`, `load`, `handle_file_change`, and
/// `close_bundle`.
pub struct OpenApiVirtualModules {
    ctx: Arc<GenerationContext>,
    generator: Arc<dyn SchemaGenerator>,
    bridge: InvalidationBridge,
    graph: RwLock<Option<Arc<dyn ModuleGraph>>>,
    root: RwLock<PathBuf>,
}

impl OpenApiVirtualModules {
    pub fn new(generator: Arc<dyn SchemaGenerator>) -> Self {
        Self::with_config(generator, RuntimeConfig::from_env())
    }

    pub fn with_config(generator: Arc<dyn SchemaGenerator>, config: RuntimeConfig) -> Self {
        let ctx = Arc::new(GenerationContext::new());
        let bridge = InvalidationBridge::new(Arc::clone(&ctx), config.route_suffix);
        Self {
            ctx,
            generator,
            bridge,
            graph: RwLock::new(None),
            root: RwLock::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))),
        }
    }

    /// Shared generation context, for embedding in host-side tooling.
    pub fn context(&self) -> Arc<GenerationContext> {
        Arc::clone(&self.ctx)
    }

    /// Record the resolved project root. Mirrors the host's config hook.
    pub fn config_resolved(&self, root: impl Into<PathBuf>) {
        *self.root.write().unwrap_or_else(PoisonError::into_inner) = root.into();
    }

    /// Attach the dev server's module graph once the server exists.
    pub fn configure_server(&self, graph: Arc<dyn ModuleGraph>) {
        *self.graph.write().unwrap_or_else(PoisonError::into_inner) = Some(graph);
    }

    /// Resolve a public import identifier to the internal resolved id, or
    /// `None` for ids this plugin does not serve. Never generates data.
    pub fn resolve_id(&self, id: &str) -> Option<&'static str> {
        VirtualModuleId::resolve(id).map(|module| module.resolved_id())
    }

    /// Load a virtual module by its internal resolved id.
    ///
    /// Returns `Ok(None)` for ids this plugin does not serve. The only error
    /// surfaced is a failed generation cycle; everything downstream of a
    /// successful cycle degrades instead of failing.
    pub fn load(&self, resolved_id: &str) -> anyhow::Result<Option<String>> {
        let Some(module) = VirtualModuleId::from_resolved(resolved_id) else {
            return Ok(None);
        };

        // A load arriving while the collaborator is scanning routes is a
        // re-entrant load; answering it with anything that waits on the
        // in-flight generation would deadlock.
        if self.ctx.is_generating() {
            debug!(module = %module, "virtual module requested during generation, serving stub");
            return Ok(Some(self.stub(module)));
        }

        if !self.ctx.snapshot().is_populated() {
            let graph = self.current_graph();
            let root = self.root.read().unwrap_or_else(PoisonError::into_inner).clone();
            ensure_generated(
                &self.ctx,
                self.generator.as_ref(),
                graph.as_deref(),
                &root,
                &self.bridge,
            )?;
        }

        let entry = self.ctx.snapshot();
        let source = match module {
            VirtualModuleId::SchemaPaths => schema_module_source(entry.schema.as_ref()),
            VirtualModuleId::ValidationRegistry => {
                let map = entry.validation_map.unwrap_or_default();
                self.registry_module_source(&map)
            }
        };
        Ok(Some(source))
    }

    /// Forward a file-change event from the host's watcher. Returns `true`
    /// when the path matched the route convention and the cache was cleared.
    pub fn handle_file_change(&self, path: &Path) -> bool {
        let graph = self.current_graph();
        self.bridge.on_relevant_file_changed(path, graph.as_deref())
    }

    /// Production-build summary hook; logging only. Virtual modules are
    /// bundled by the host via the resolve/load hooks.
    pub fn close_bundle(&self) {
        let entry = self.ctx.snapshot();
        if entry.is_populated() {
            info!(
                routes = entry.route_count(),
                "OpenAPI schema bundled with committed cache"
            );
        } else {
            warn!("close_bundle: no cached schema or validation map, generation may not have run");
        }
    }

    fn current_graph(&self) -> Option<Arc<dyn ModuleGraph>> {
        self.graph
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn registry_module_source(&self, map: &ValidationMap) -> String {
        match emit_registry_module(map) {
            Ok(source) => source,
            Err(err) => {
                error!(error = %err, "failed to emit validation registry, serving empty module");
                EMPTY_MODULE.to_string()
            }
        }
    }

    fn stub(&self, module: VirtualModuleId) -> String {
        match module {
            VirtualModuleId::SchemaPaths => {
                schema_module_source(self.ctx.snapshot().schema.as_ref())
            }
            VirtualModuleId::ValidationRegistry => EMPTY_REGISTRY_STUB.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_source_is_literal_pretty_json() {
        let schema = json!({"/users": {"get": {"responses": {}}}});
        let source = schema_module_source(Some(&schema));
        assert!(source.starts_with("export default {"));
        assert!(source.contains("\"/users\""));
        assert!(source.trim_end().ends_with(';'));
    }

    #[test]
    fn absent_schema_serializes_as_empty_object() {
        assert_eq!(schema_module_source(None), "export default {};\n");
    }
}
