#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use openapi_vmod::{
    GenerationOutput, MethodEntry, ModuleGraph, ModuleKey, SchemaGenerator, ValidationMap,
};
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Module graph double that holds both virtual modules and records
/// invalidations and full-reload requests.
#[derive(Default)]
pub struct MockGraph {
    keys: Mutex<Vec<String>>,
    pub invalidated: Mutex<Vec<String>>,
    pub full_reloads: AtomicUsize,
}

impl MockGraph {
    pub fn invalidated_ids(&self) -> Vec<String> {
        self.invalidated.lock().unwrap().clone()
    }

    pub fn invalidation_count(&self) -> usize {
        self.invalidated.lock().unwrap().len()
    }

    pub fn full_reload_count(&self) -> usize {
        self.full_reloads.load(Ordering::SeqCst)
    }
}

impl ModuleGraph for MockGraph {
    fn get_module_by_id(&self, resolved_id: &str) -> Option<ModuleKey> {
        // Pretend every virtual module has an instance; the key indexes a
        // table so invalidations can be traced back to their id.
        let mut keys = self.keys.lock().unwrap();
        keys.push(resolved_id.to_string());
        Some(ModuleKey((keys.len() - 1) as u64))
    }

    fn invalidate_module(&self, key: ModuleKey) {
        let id = self.keys.lock().unwrap()[key.0 as usize].clone();
        self.invalidated.lock().unwrap().push(id);
    }

    fn request_full_reload(&self) {
        self.full_reloads.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn sample_output() -> GenerationOutput {
    let mut methods = indexmap::IndexMap::new();
    methods.insert(
        "GET".to_string(),
        MethodEntry {
            module_path: "routes/users.ts".to_string(),
            is_implemented: true,
        },
    );
    let mut map = ValidationMap::new();
    map.insert("/users".to_string(), methods);
    GenerationOutput {
        open_api_paths: json!({"/users": {"get": {"responses": {"200": {}}}}}),
        validation_map: map,
    }
}

/// Generator returning a fixed output and counting invocations.
pub struct CountingGenerator {
    pub calls: AtomicUsize,
    pub output: GenerationOutput,
}

impl CountingGenerator {
    pub fn new(output: GenerationOutput) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            output,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SchemaGenerator for CountingGenerator {
    fn generate(
        &self,
        _server: Option<&dyn ModuleGraph>,
        _root: &Path,
    ) -> anyhow::Result<GenerationOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }
}

/// Generator that fails on the first call and succeeds afterwards.
pub struct FailingOnceGenerator {
    pub calls: AtomicUsize,
    failed: AtomicBool,
}

impl FailingOnceGenerator {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failed: AtomicBool::new(false),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SchemaGenerator for FailingOnceGenerator {
    fn generate(
        &self,
        _server: Option<&dyn ModuleGraph>,
        _root: &Path,
    ) -> anyhow::Result<GenerationOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.failed.swap(true, Ordering::SeqCst) {
            anyhow::bail!("route scan failed");
        }
        Ok(sample_output())
    }
}
