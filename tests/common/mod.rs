//! Shared utilities for integration tests.

use std::sync::Arc;
use std::time::Duration;

use regcache::config::CacheConfig;
use regcache::{EvictionHandle, PatternCache, StaticMemory};

/// Config with short intervals so paused-time tests stay readable.
#[allow(dead_code)]
pub fn fast_config() -> CacheConfig {
    CacheConfig {
        ttl_secs: 600,
        sweep_interval_secs: 120,
        pressure_tick_secs: 1,
        low_memory_mb: 200,
        pattern_idle_secs: 60,
        param_idle_secs: 180,
    }
}

/// Start a cache whose eviction task reads `free_mb` from a settable probe.
#[allow(dead_code)]
pub fn start_with_memory(
    config: CacheConfig,
    free_mb: u64,
) -> (Arc<PatternCache>, Arc<StaticMemory>, EvictionHandle) {
    let probe = Arc::new(StaticMemory::mebibytes(free_mb));
    let (cache, handle) = PatternCache::start(config, probe.clone());
    (cache, probe, handle)
}

/// Let spawned tasks observe a time jump.
#[allow(dead_code)]
pub async fn advance(secs: u64) {
    tokio::time::advance(Duration::from_secs(secs)).await;
    tokio::task::yield_now().await;
}

#[allow(dead_code)]
pub fn text(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).unwrap()
}
