//! # Generated-Data Store
//!
//! Holds the two cached generation artifacts (OpenAPI paths document and
//! validation map) together with the generation state flag. One
//! [`GenerationContext`] is constructed per dev-server session and shared by
//! the loader, the orchestrator, and the invalidation bridge; there is no
//! ambient global state.
//!
//! ## Commit discipline
//!
//! The cache is write-once-per-generation-cycle: it is either fully absent or
//! holds a matched (schema, validation map) pair committed by the same
//! generation call. A cycle that yields empty results never overwrites a
//! previously non-empty cache; when no prior cache exists it commits empty
//! placeholders so future loads skip regeneration.
//!
//! ## Reentrancy guard
//!
//! [`GenerationGuard`] is a scoped acquisition of the `generating` flag. The
//! flag is claimed with a compare-exchange and released on drop, so it is
//! cleared on every exit path, including errors escaping the generation
//! collaborator. While the flag is held the loader answers all requests for
//! the virtual modules with an immediate stub — the collaborator's route scan
//! may itself import those modules, and without the stub path that re-entry
//! would recurse into generation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

/// Opaque, JSON-serializable OpenAPI paths document.
///
/// Treated as a black box: the store only serializes and caches it.
pub type SchemaDocument = serde_json::Value;

/// Ordered map from route path to its per-method entries.
pub type ValidationMap = IndexMap<String, IndexMap<String, MethodEntry>>;

/// Per-method entry in the validation map.
///
/// Serialized in camelCase so the generation collaborator's JSON form
/// (`modulePath` / `isImplemented`) deserializes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodEntry {
    /// Source path of the backing route-handler module.
    pub module_path: String,
    /// Whether the route actually handles this method, independent of
    /// whether a validation schema exists for it.
    pub is_implemented: bool,
}

/// The committed generation artifacts, or absent.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    /// OpenAPI paths document from the last committed cycle.
    pub schema: Option<SchemaDocument>,
    /// Validation map from the same cycle.
    pub validation_map: Option<ValidationMap>,
}

impl CacheEntry {
    /// True once a generation cycle has committed (placeholders included).
    pub fn is_populated(&self) -> bool {
        self.schema.is_some() && self.validation_map.is_some()
    }

    /// Route count of the committed validation map.
    pub fn route_count(&self) -> usize {
        self.validation_map.as_ref().map(IndexMap::len).unwrap_or(0)
    }
}

/// Shared state for one dev-server session: the cache plus the generation
/// flag. Mutated only by the orchestrator and the invalidation bridge.
#[derive(Debug, Default)]
pub struct GenerationContext {
    store: RwLock<CacheEntry>,
    generating: AtomicBool,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a generation call is currently in flight.
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    /// Clone the current cache contents.
    pub fn snapshot(&self) -> CacheEntry {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Claim the generation flag, or `None` if a generation call is already
    /// in flight. The returned guard releases the flag when dropped.
    pub fn begin_generation(&self) -> Option<GenerationGuard<'_>> {
        self.generating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GenerationGuard { ctx: self })
    }

    /// Commit a matched (schema, validation map) pair from one cycle.
    pub fn commit(&self, schema: SchemaDocument, validation_map: ValidationMap) {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        store.schema = Some(schema);
        store.validation_map = Some(validation_map);
    }

    /// Fill any still-absent slot with an empty placeholder, leaving
    /// committed data untouched. Used when a cycle produced no results: a
    /// legitimately empty project and a scan that found nothing are
    /// indistinguishable here, and both stop retrying until invalidated.
    pub fn commit_placeholders(&self) {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        if store.schema.is_none() {
            store.schema = Some(serde_json::Value::Object(serde_json::Map::new()));
        }
        if store.validation_map.is_none() {
            store.validation_map = Some(ValidationMap::new());
        }
    }

    /// Drop the committed cache so the next load regenerates.
    pub fn clear(&self) {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        *store = CacheEntry::default();
    }
}

/// Scoped hold on the generation flag. Dropping the guard returns the
/// context to idle, whatever path the orchestrator exited through.
#[derive(Debug)]
pub struct GenerationGuard<'a> {
    ctx: &'a GenerationContext,
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        self.ctx.generating.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn guard_is_single_flight_and_releases_on_drop() {
        let ctx = GenerationContext::new();
        assert!(!ctx.is_generating());

        let guard = ctx.begin_generation().unwrap();
        assert!(ctx.is_generating());
        assert!(ctx.begin_generation().is_none());

        drop(guard);
        assert!(!ctx.is_generating());
        assert!(ctx.begin_generation().is_some());
    }

    #[test]
    fn commit_then_clear_round_trips() {
        let ctx = GenerationContext::new();
        assert!(!ctx.snapshot().is_populated());

        let mut map = ValidationMap::new();
        map.insert("/users".into(), IndexMap::new());
        ctx.commit(json!({"/users": {}}), map);

        let entry = ctx.snapshot();
        assert!(entry.is_populated());
        assert_eq!(entry.route_count(), 1);

        ctx.clear();
        assert!(!ctx.snapshot().is_populated());
    }

    #[test]
    fn placeholders_do_not_overwrite_committed_data() {
        let ctx = GenerationContext::new();
        let mut map = ValidationMap::new();
        map.insert("/pets".into(), IndexMap::new());
        ctx.commit(json!({"/pets": {}}), map);

        ctx.commit_placeholders();
        let entry = ctx.snapshot();
        assert_eq!(entry.schema, Some(json!({"/pets": {}})));
        assert_eq!(entry.route_count(), 1);
    }

    #[test]
    fn placeholders_populate_an_empty_store() {
        let ctx = GenerationContext::new();
        ctx.commit_placeholders();
        let entry = ctx.snapshot();
        assert!(entry.is_populated());
        assert_eq!(entry.schema, Some(json!({})));
        assert_eq!(entry.route_count(), 0);
    }

    #[test]
    fn method_entry_uses_camel_case_wire_form() {
        let entry: MethodEntry =
            serde_json::from_value(json!({"modulePath": "routes/users.ts", "isImplemented": true}))
                .unwrap();
        assert_eq!(entry.module_path, "routes/users.ts");
        assert!(entry.is_implemented);
    }
}
