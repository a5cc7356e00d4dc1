//! # openapi-vmod
//!
//! **openapi-vmod** sits between a dev server's module loader and an
//! expensive, route-scanning schema-generation routine, and serves two
//! virtual modules on its behalf:
//!
//! - **`openapi-vmod/schema-paths`** — the OpenAPI paths document, exported
//!   as a literal value;
//! - **`openapi-vmod/schema-validation-map`** — a lazily-initialized
//!   registry of per-route, per-method validation accessors.
//!
//! Both are also importable under `virtual:`-prefixed aliases.
//!
//! ## Architecture
//!
//! - **[`ids`]** - Virtual module identifiers and resolution
//! - **[`store`]** - Generated-data cache and generation-state guard
//! - **[`generate`]** - Single-flight orchestrator around the generation collaborator
//! - **[`emitter`]** - Source-text emitter for the lazy validation registry
//! - **[`loader`]** - Plugin surface: resolve/load hooks, stubs, degradation
//! - **[`invalidate`]** - Module-graph contract and cache invalidation bridge
//! - **[`hot_reload`]** - Filesystem watcher feeding the invalidation bridge
//! - **[`runtime_config`]** - Environment variable-based configuration
//! - **[`logging`]** - Tracing subscriber setup for hosts and tests
//!
//! ## Guarantees
//!
//! 1. The generation collaborator runs at most once concurrently; a second
//!    request never queues behind an in-flight call.
//! 2. A load arriving while generation is in flight gets an immediate stub,
//!    so the collaborator's own route scanning can import the virtual
//!    modules without deadlocking or recursing.
//! 3. After a non-empty commit, consumers that received a stub are
//!    invalidated in the host's module graph and re-fetch real data without
//!    a process restart.
//! 4. A failed or empty cycle never overwrites a previously committed cache,
//!    and never leaves the generation flag stuck.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use openapi_vmod::{OpenApiVirtualModules, SchemaGenerator};
//! use std::sync::Arc;
//!
//! let generator: Arc<dyn SchemaGenerator> = Arc::new(MyRouteScanner::new());
//! let plugin = Arc::new(OpenApiVirtualModules::new(generator));
//!
//! plugin.config_resolved("/srv/app");
//! plugin.configure_server(module_graph);
//!
//! // Host resolve/load hooks:
//! if let Some(resolved) = plugin.resolve_id("virtual:openapi-vmod/schema-paths") {
//!     let source = plugin.load(resolved)?;
//! }
//!
//! // Development-time invalidation:
//! let _watcher = openapi_vmod::hot_reload::watch_routes("/srv/app/src/routes", Arc::clone(&plugin))?;
//! ```

pub mod emitter;
pub mod generate;
pub mod hot_reload;
pub mod ids;
pub mod invalidate;
pub mod loader;
pub mod logging;
pub mod runtime_config;
pub mod store;

pub use generate::{ensure_generated, GenerationOutput, SchemaGenerator};
pub use ids::VirtualModuleId;
pub use invalidate::{InvalidationBridge, ModuleGraph, ModuleKey};
pub use loader::OpenApiVirtualModules;
pub use runtime_config::RuntimeConfig;
pub use store::{CacheEntry, GenerationContext, MethodEntry, SchemaDocument, ValidationMap};
