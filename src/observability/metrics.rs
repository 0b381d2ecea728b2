//! Metrics collection.
//!
//! # Metrics
//! - `regcache_lookups_total` (counter): lookups by cache, outcome (hit/miss)
//! - `regcache_entries` (gauge): current entry count by cache
//! - `regcache_evictions_total` (counter): removed entries by cache, reason (ttl/pressure)
//! - `regcache_compile_errors_total` (counter): rejected patterns
//! - `regcache_free_memory_bytes` (gauge): last free memory sample
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the embedding application
//!   chooses the exporter, and without one every call is a no-op
//! - Labels are static strings

use metrics::{counter, gauge};

pub fn record_cache_lookup(cache: &'static str, hit: bool) {
    let outcome = if hit { "hit" } else { "miss" };
    counter!("regcache_lookups_total", "cache" => cache, "outcome" => outcome).increment(1);
}

pub fn record_cache_size(cache: &'static str, entries: usize) {
    gauge!("regcache_entries", "cache" => cache).set(entries as f64);
}

pub fn record_eviction(cache: &'static str, reason: &'static str, count: usize) {
    counter!("regcache_evictions_total", "cache" => cache, "reason" => reason)
        .increment(count as u64);
}

pub fn record_compile_error() {
    counter!("regcache_compile_errors_total").increment(1);
}

pub fn record_free_memory(sample: Option<u64>) {
    if let Some(bytes) = sample {
        gauge!("regcache_free_memory_bytes").set(bytes as f64);
    }
}
