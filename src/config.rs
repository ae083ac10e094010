//! Runtime configuration for the catalog client and the view controller

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_LIMIT: usize = 300;
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

pub const ENV_API_BASE: &str = "POKEDEX_API_BASE";
pub const ENV_LIMIT: &str = "POKEDEX_LIMIT";

/// Fetch optimizations; both are off unless enabled on the command line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OptimizationConfig {
    /// Answer repeat fetches from the cached catalog
    pub initial_cache: bool,
    /// Delay re-derivation until input settles
    pub debounce: bool,
    pub debounce_ms: u64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            initial_cache: false,
            debounce: false,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    pub api_base: String,
    /// Page size of the bulk listing request
    pub limit: usize,
    pub optimizations: OptimizationConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            limit: DEFAULT_LIMIT,
            optimizations: OptimizationConfig::default(),
        }
    }
}

impl CatalogConfig {
    /// Apply `POKEDEX_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base) = lookup(ENV_API_BASE).filter(|value| !value.trim().is_empty()) {
            self.api_base = base;
        }
        if let Some(limit) = lookup(ENV_LIMIT).and_then(|value| value.trim().parse::<usize>().ok())
        {
            if limit > 0 {
                self.limit = limit;
            }
        }
        self.api_base = self.api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn listing_url(&self) -> String {
        format!("{}/pokemon?limit={}", self.api_base, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_observed_runtime() {
        let config = CatalogConfig::default();
        assert_eq!(config.limit, 300);
        assert!(!config.optimizations.initial_cache);
        assert!(!config.optimizations.debounce);
        assert_eq!(config.optimizations.debounce_ms, 500);
        assert_eq!(
            config.listing_url(),
            "https://pokeapi.co/api/v2/pokemon?limit=300"
        );
    }

    #[test]
    fn test_env_overrides() {
        let config = CatalogConfig::default().with_overrides(lookup(&[
            (ENV_API_BASE, "http://localhost:8080/api/"),
            (ENV_LIMIT, "12"),
        ]));
        assert_eq!(config.api_base, "http://localhost:8080/api");
        assert_eq!(config.listing_url(), "http://localhost:8080/api/pokemon?limit=12");
    }

    #[test]
    fn test_invalid_limit_is_ignored() {
        let config = CatalogConfig::default().with_overrides(lookup(&[(ENV_LIMIT, "zero")]));
        assert_eq!(config.limit, DEFAULT_LIMIT);

        let config = CatalogConfig::default().with_overrides(lookup(&[(ENV_LIMIT, "0")]));
        assert_eq!(config.limit, DEFAULT_LIMIT);
    }
}
