#![allow(clippy::unwrap_used, clippy::expect_used)]

use openapi_vmod::hot_reload::watch_routes;
use openapi_vmod::ids::RESOLVED_SCHEMA_MODULE_ID;
use openapi_vmod::{OpenApiVirtualModules, RuntimeConfig};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{sample_output, CountingGenerator};

#[test]
fn route_file_write_clears_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(CountingGenerator::new(sample_output()));
    let plugin = Arc::new(OpenApiVirtualModules::with_config(
        Arc::clone(&generator) as Arc<dyn openapi_vmod::SchemaGenerator>,
        RuntimeConfig::default(),
    ));

    plugin.load(RESOLVED_SCHEMA_MODULE_ID).unwrap();
    assert!(plugin.context().snapshot().is_populated());

    let watcher = watch_routes(dir.path(), Arc::clone(&plugin)).expect("watch_routes");

    // allow the watcher thread to start
    std::thread::sleep(Duration::from_millis(100));

    std::fs::write(dir.path().join("users+server.ts"), "export const GET = 1;").unwrap();

    // wait for the event to clear the cache
    for _ in 0..40 {
        if !plugin.context().snapshot().is_populated() {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    assert!(!plugin.context().snapshot().is_populated());

    drop(watcher);
}

#[test]
fn unrelated_file_write_leaves_the_cache_alone() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(CountingGenerator::new(sample_output()));
    let plugin = Arc::new(OpenApiVirtualModules::with_config(
        Arc::clone(&generator) as Arc<dyn openapi_vmod::SchemaGenerator>,
        RuntimeConfig::default(),
    ));

    plugin.load(RESOLVED_SCHEMA_MODULE_ID).unwrap();
    let watcher = watch_routes(dir.path(), Arc::clone(&plugin)).expect("watch_routes");
    std::thread::sleep(Duration::from_millis(100));

    std::fs::write(dir.path().join("notes.md"), "scratch").unwrap();
    std::thread::sleep(Duration::from_millis(300));

    assert!(plugin.context().snapshot().is_populated());
    drop(watcher);
}
