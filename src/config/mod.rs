use std::env;
use std::time::Duration;

use crate::models::MemoryPolicy;

/// Where the fleet inventory comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryKind {
    Static,
    Sqlite,
}

impl InventoryKind {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Some(InventoryKind::Static),
            "sqlite" | "db" => Some(InventoryKind::Sqlite),
            _ => None,
        }
    }
}

fn inventory_kind(raw: &str) -> InventoryKind {
    InventoryKind::parse(raw).unwrap_or_else(|| {
        tracing::warn!(
            "Unknown INVENTORY_SOURCE '{}', falling back to the static demo fleet",
            raw
        );
        InventoryKind::Static
    })
}

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub inventory_source: InventoryKind,
    pub db_path: String,
    pub db_max_connections: u32,
    pub inventory_timeout_ms: u64,
    pub registry_refresh_secs: u64,
    pub memory_policy: MemoryPolicy,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            listen_addr: get("LISTEN_ADDR", "0.0.0.0:8080"),
            inventory_source: inventory_kind(&get("INVENTORY_SOURCE", "static")),
            db_path: get("DB_PATH", "/data/clusters.db"),
            db_max_connections: get("DB_MAX_CONNECTIONS", "5").parse().unwrap_or(5),
            inventory_timeout_ms: get("INVENTORY_TIMEOUT_MS", "2000").parse().unwrap_or(2000),
            registry_refresh_secs: get("REGISTRY_REFRESH_SECS", "0").parse().unwrap_or(0),
            memory_policy: get("MEMORY_POLICY", "reject").parse().unwrap_or_default(),
        }
    }

    pub fn inventory_timeout(&self) -> Duration {
        Duration::from_millis(self.inventory_timeout_ms)
    }

    /// None when periodic refresh is disabled
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.registry_refresh_secs > 0).then(|| Duration::from_secs(self.registry_refresh_secs))
    }
}
