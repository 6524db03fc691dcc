use std::env;

use crate::routing::SearchLimits;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub db_max_connections: u32,
    pub listen_addr: String,
    /// Load the sample catalog into an empty database at startup
    pub seed_sample_catalog: bool,
    pub route_max_paths_per_pair: usize,
    pub route_max_paths_total: usize,
    pub route_max_expansions: usize,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        let limits = SearchLimits::default();
        Self {
            db_path: get_env("DB_PATH", "/data/panels.db"),
            db_max_connections: get_env("DB_MAX_CONNECTIONS", "5")
                .parse()
                .unwrap_or(5),
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:8080"),
            seed_sample_catalog: parse_bool(&get_env("SEED_SAMPLE_CATALOG", "false")),
            route_max_paths_per_pair: get_env("ROUTE_MAX_PATHS_PER_PAIR", "")
                .parse()
                .unwrap_or(limits.max_paths_per_pair),
            route_max_paths_total: get_env("ROUTE_MAX_PATHS_TOTAL", "")
                .parse()
                .unwrap_or(limits.max_paths_total),
            route_max_expansions: get_env("ROUTE_MAX_EXPANSIONS", "")
                .parse()
                .unwrap_or(limits.max_expansions),
        }
    }

    /// Path-enumeration budget for one route query
    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_paths_per_pair: self.route_max_paths_per_pair,
            max_paths_total: self.route_max_paths_total,
            max_expansions: self.route_max_expansions,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let limits = SearchLimits::default();
        Self {
            db_path: ":memory:".to_string(),
            db_max_connections: 1,
            listen_addr: "127.0.0.1:8080".to_string(),
            seed_sample_catalog: false,
            route_max_paths_per_pair: limits.max_paths_per_pair,
            route_max_paths_total: limits.max_paths_total,
            route_max_expansions: limits.max_expansions,
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
