//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files, and
//! every section has defaults so an empty file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RegcacheConfig {
    /// Pattern cache lifetimes and eviction settings.
    pub cache: CacheConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Pattern cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Absolute lifetime of a cache entry in seconds, regardless of use.
    pub ttl_secs: u64,

    /// How often expired entries are swept, in seconds.
    pub sweep_interval_secs: u64,

    /// Interval between free memory samples, in seconds.
    pub pressure_tick_secs: u64,

    /// Free memory (MiB) below which idle entries are evicted early.
    pub low_memory_mb: u64,

    /// Idle time (seconds) after which a compiled pattern is evicted under pressure.
    pub pattern_idle_secs: u64,

    /// Idle time (seconds) after which a placeholder pattern is evicted under pressure.
    pub param_idle_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 2 * 60 * 60,
            sweep_interval_secs: 60 * 60,
            pressure_tick_secs: 10,
            low_memory_mb: 200,
            pattern_idle_secs: 10 * 60,
            param_idle_secs: 30 * 60,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn pressure_tick(&self) -> Duration {
        Duration::from_secs(self.pressure_tick_secs)
    }

    pub fn pattern_idle(&self) -> Duration {
        Duration::from_secs(self.pattern_idle_secs)
    }

    pub fn param_idle(&self) -> Duration {
        Duration::from_secs(self.param_idle_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegcacheConfig::default();
        assert_eq!(config.cache.ttl(), Duration::from_secs(7200));
        assert_eq!(config.cache.sweep_interval(), Duration::from_secs(3600));
        assert_eq!(config.cache.pressure_tick(), Duration::from_secs(10));
        assert_eq!(config.cache.low_memory_mb, 200);
        assert_eq!(config.cache.pattern_idle(), Duration::from_secs(600));
        assert_eq!(config.cache.param_idle(), Duration::from_secs(1800));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_partial_toml() {
        let config: RegcacheConfig = toml::from_str(
            r#"
            [cache]
            low_memory_mb = 512
            "#,
        )
        .unwrap();
        assert_eq!(config.cache.low_memory_mb, 512);
        assert_eq!(config.cache.ttl_secs, 7200);
        assert_eq!(config.observability, ObservabilityConfig::default());
    }
}
