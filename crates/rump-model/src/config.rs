use serde::{Deserialize, Serialize};

use crate::{
    domain::{DEFAULT_BUS_CAPACITY, DEFAULT_SCAN_COUNT, Endpoint, Flag},
    error::{ModelError, ModelResult},
};

/// Options for a single transfer run.
///
/// Built by the CLI layer, validated with [`RunConfig::validate`] and then
/// split between the connection layer (`source`, `target`, `workers`) and the
/// pipeline (`bus_capacity`, `scan_count`, `silent`, `sync_ttl`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// Store to read from.
    pub source: Endpoint,
    /// Store to restore into. Existing keys are overwritten.
    pub target: Endpoint,
    /// Suppress per-key progress output.
    #[serde(default)]
    pub silent: Flag,
    /// Copy remaining expirations from the source (one extra round-trip per key).
    #[serde(default)]
    pub sync_ttl: Flag,
    /// Number of restore workers; `None` means host parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Capacity of the bus between the extractor and the workers.
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
    /// `COUNT` hint for each `SCAN` call.
    #[serde(default = "default_scan_count")]
    pub scan_count: usize,
}

fn default_bus_capacity() -> usize {
    DEFAULT_BUS_CAPACITY
}

fn default_scan_count() -> usize {
    DEFAULT_SCAN_COUNT
}

impl RunConfig {
    /// Config with defaults for everything but the two endpoints.
    pub fn new(source: Endpoint, target: Endpoint) -> Self {
        Self {
            source,
            target,
            silent: Flag::disabled(),
            sync_ttl: Flag::disabled(),
            workers: None,
            bus_capacity: DEFAULT_BUS_CAPACITY,
            scan_count: DEFAULT_SCAN_COUNT,
        }
    }

    /// Check invariants that serde and the CLI cannot express.
    ///
    /// Rules:
    /// - `source` and `target` differ;
    /// - `bus_capacity`, `scan_count` and an explicit `workers` are non-zero.
    pub fn validate(&self) -> ModelResult<()> {
        if self.source == self.target {
            return Err(ModelError::SameEndpoint(self.source.to_string()));
        }
        if self.bus_capacity == 0 {
            return Err(ModelError::Invalid("bus capacity must be at least 1".into()));
        }
        if self.scan_count == 0 {
            return Err(ModelError::Invalid("scan count must be at least 1".into()));
        }
        if self.workers == Some(0) {
            return Err(ModelError::Invalid("worker count must be at least 1".into()));
        }
        Ok(())
    }

    /// Worker count, falling back to `fallback` (usually host parallelism).
    pub fn workers_or(&self, fallback: usize) -> usize {
        self.workers.unwrap_or(fallback).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> (Endpoint, Endpoint) {
        (
            Endpoint::new("redis://src:6379/0").unwrap(),
            Endpoint::new("redis://dst:6379/0").unwrap(),
        )
    }

    #[test]
    fn defaults_match_transfer_constants() {
        let (s, t) = endpoints();
        let cfg = RunConfig::new(s, t);

        assert_eq!(cfg.bus_capacity, 100);
        assert_eq!(cfg.scan_count, 10);
        assert!(cfg.silent.is_disabled());
        assert!(cfg.sync_ttl.is_disabled());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_same_endpoint() {
        let (s, _) = endpoints();
        let cfg = RunConfig::new(s.clone(), s);
        assert!(matches!(cfg.validate(), Err(ModelError::SameEndpoint(_))));
    }

    #[test]
    fn rejects_zero_sizes() {
        let (s, t) = endpoints();

        let mut cfg = RunConfig::new(s.clone(), t.clone());
        cfg.bus_capacity = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = RunConfig::new(s.clone(), t.clone());
        cfg.scan_count = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = RunConfig::new(s, t);
        cfg.workers = Some(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn workers_fall_back_to_host_parallelism() {
        let (s, t) = endpoints();
        let mut cfg = RunConfig::new(s, t);

        assert_eq!(cfg.workers_or(8), 8);
        cfg.workers = Some(3);
        assert_eq!(cfg.workers_or(8), 3);
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"source": "redis://a:1", "target": "redis://b:1", "syncTtl": true}"#;
        let cfg: RunConfig = serde_json::from_str(json).unwrap();

        assert!(cfg.sync_ttl.is_enabled());
        assert!(cfg.silent.is_disabled());
        assert_eq!(cfg.workers, None);
        assert_eq!(cfg.bus_capacity, DEFAULT_BUS_CAPACITY);
        assert_eq!(cfg.scan_count, DEFAULT_SCAN_COUNT);
    }

    #[test]
    fn deserialize_rejects_invalid_endpoint() {
        let json = r#"{"source": "a:1", "target": "redis://b:1"}"#;
        assert!(serde_json::from_str::<RunConfig>(json).is_err());
    }
}
