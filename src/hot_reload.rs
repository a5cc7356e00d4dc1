//! # Hot Reload Module
//!
//! Watches the project's route tree and forwards relevant file changes to
//! the plugin's invalidation path, so editing a route definition clears the
//! cache and the next import regenerates — no server restart.
//!
//! The watcher only reacts to modify/create events; matching against the
//! route-file naming convention happens in the invalidation bridge. If the
//! regenerated data is temporarily unavailable the previous behavior of the
//! loader applies: consumers get stubs during the cycle and are invalidated
//! once it commits. Intended for development, not production.

use crate::loader::OpenApiVirtualModules;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Watch `root` recursively and route file events into
/// [`OpenApiVirtualModules::handle_file_change`].
///
/// The watcher stops when the returned handle is dropped, so callers keep it
/// alive for the duration of the dev-server session.
pub fn watch_routes<P: AsRef<Path>>(
    root: P,
    plugin: Arc<OpenApiVirtualModules>,
) -> notify::Result<RecommendedWatcher> {
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    for path in &event.paths {
                        if plugin.handle_file_change(path) {
                            info!(
                                path = %path.display(),
                                "route file changed, cleared generated-data cache"
                            );
                        }
                    }
                }
            }
            Err(e) => warn!(error = %e, "route watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(root.as_ref(), RecursiveMode::Recursive)?;
    Ok(watcher)
}
