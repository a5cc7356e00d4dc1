//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the plugin's runtime
//! behavior.
//!
//! ## Environment Variables
//!
//! ### `OPENAPI_VMOD_ROUTE_SUFFIX`
//!
//! Filename suffix identifying route definition files for cache
//! invalidation. Defaults to `+server.ts` (the SvelteKit convention). Hosts
//! with a different route layout set this to match their own convention.
//!
//! ```bash
//! export OPENAPI_VMOD_ROUTE_SUFFIX=.route.ts
//! ```

use std::env;

/// Default route-definition filename suffix.
pub const DEFAULT_ROUTE_SUFFIX: &str = "+server.ts";

/// Runtime configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Filename suffix a changed file must carry to count as a route
    /// definition change.
    pub route_suffix: String,
}

impl RuntimeConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or empty.
    pub fn from_env() -> Self {
        let route_suffix = env::var("OPENAPI_VMOD_ROUTE_SUFFIX")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ROUTE_SUFFIX.to_string());
        Self { route_suffix }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            route_suffix: DEFAULT_ROUTE_SUFFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_sveltekit_convention() {
        assert_eq!(RuntimeConfig::default().route_suffix, "+server.ts");
    }
}
