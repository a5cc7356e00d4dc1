//! # Lazy Registry Emitter
//!
//! Turns a populated validation map into the source text of the
//! validation-registry virtual module. The emitted module:
//!
//! - declares one lazy loader per distinct backing module path, with a local
//!   cache variable so each backing module is fetched at most once no matter
//!   how many routes and methods reference it;
//! - exposes a registry keyed by route path whose per-method properties are
//!   computed accessors over the *currently loaded* backing module, merged
//!   with the static `isImplemented` flag — the registry can be imported
//!   before its backing modules finish loading and still reflect the true
//!   value once they do;
//! - exports `initPromise`, an eagerly started, idempotent initializer that
//!   awaits every lazy loader exactly once.
//!
//! Emission is a pure function of the map: for a map with stable iteration
//! order the output is byte-identical across calls (aliases are assigned in
//! first-seen order of module path), keeping generated-module diffs minimal
//! and content-hash caches stable. The emitter targets dynamic `import()`;
//! it knows nothing about the host's module-loading mechanism beyond that.

use anyhow::Context;
use askama::Template;
use indexmap::IndexMap;

use crate::store::ValidationMap;

/// Degraded export used when serialization or emission fails.
pub(crate) const EMPTY_MODULE: &str = "export default {};\n";

/// Stub served while generation is in flight: an empty registry plus an
/// already-resolved initialization signal, so nothing downstream can block
/// on initialization during a re-entrant load.
pub(crate) const EMPTY_REGISTRY_STUB: &str =
    "export default {};\nexport const initPromise = Promise.resolve();\n";

#[derive(Template)]
#[template(path = "registry.js.txt", escape = "none")]
struct RegistryModuleTemplate {
    loaders: Vec<LazyLoader>,
    routes: Vec<RouteEntry>,
}

struct LazyLoader {
    alias: String,
    import_literal: String,
}

struct RouteEntry {
    path_literal: String,
    methods: Vec<MethodAccessor>,
}

struct MethodAccessor {
    name: String,
    name_literal: String,
    alias: String,
    is_implemented: bool,
}

/// Emit the validation-registry module source for `map`.
///
/// Route paths, method names, and import specifiers are embedded as
/// JSON-escaped string literals; import specifiers are rooted with a leading
/// slash the way the dev server addresses project files.
pub fn emit_registry_module(map: &ValidationMap) -> anyhow::Result<String> {
    // First-seen alias assignment over deduplicated module paths.
    let mut aliases: IndexMap<&str, String> = IndexMap::new();
    for methods in map.values() {
        for entry in methods.values() {
            if !aliases.contains_key(entry.module_path.as_str()) {
                let alias = format!("mod_{}", aliases.len());
                aliases.insert(entry.module_path.as_str(), alias);
            }
        }
    }

    let loaders = aliases
        .iter()
        .map(|(path, alias)| -> anyhow::Result<LazyLoader> {
            let specifier = format!("/{}", path.trim_start_matches('/'));
            Ok(LazyLoader {
                alias: alias.clone(),
                import_literal: serde_json::to_string(&specifier)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let routes = map
        .iter()
        .map(|(route_path, methods)| -> anyhow::Result<RouteEntry> {
            let methods = methods
                .iter()
                .map(|(method, entry)| -> anyhow::Result<MethodAccessor> {
                    let alias = aliases
                        .get(entry.module_path.as_str())
                        .cloned()
                        .context("module path missing a loader alias")?;
                    Ok(MethodAccessor {
                        name: method.clone(),
                        name_literal: serde_json::to_string(method)?,
                        alias,
                        is_implemented: entry.is_implemented,
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(RouteEntry {
                path_literal: serde_json::to_string(route_path)?,
                methods,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    RegistryModuleTemplate { loaders, routes }
        .render()
        .context("failed to render validation registry module")
}
