//! The compiled pattern cache service.

use std::sync::Arc;

use crate::cache::eviction::{EvictionHandle, EvictionTask};
use crate::cache::memory::MemoryProbe;
use crate::cache::ttl::{CacheStats, TtlCache};
use crate::config::CacheConfig;
use crate::observability::metrics;
use crate::pattern::{preprocess, Pattern, PatternResult};

/// Stats for both caches owned by a [`PatternCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternCacheStats {
    pub patterns: CacheStats,
    pub params: CacheStats,
}

/// Compiles patterns through preprocessing and caches the results.
///
/// One instance is meant to be built at startup and shared as
/// `Arc<PatternCache>`. It owns two TTL caches: canonical pattern text to
/// compiled [`Pattern`], and placeholder pattern text to compiled placeholder.
pub struct PatternCache {
    patterns: TtlCache<Pattern>,
    params: TtlCache<Pattern>,
    config: CacheConfig,
}

impl PatternCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            patterns: TtlCache::new("patterns", config.ttl()),
            params: TtlCache::new("params", config.ttl()),
            config,
        }
    }

    /// Build the cache and start its eviction task on the current runtime.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: CacheConfig, probe: Arc<dyn MemoryProbe>) -> (Arc<Self>, EvictionHandle) {
        let cache = Arc::new(Self::new(config));
        let handle = cache.spawn_eviction(probe);
        (cache, handle)
    }

    /// Start the background eviction task for this cache.
    pub fn spawn_eviction(self: &Arc<Self>, probe: Arc<dyn MemoryProbe>) -> EvictionHandle {
        EvictionTask::new(self.clone(), probe).spawn()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Compiled pattern cache.
    pub fn patterns(&self) -> &TtlCache<Pattern> {
        &self.patterns
    }

    /// Placeholder pattern cache.
    pub fn params(&self) -> &TtlCache<Pattern> {
        &self.params
    }

    /// Canonicalize `raw` with `params`. Does not touch the compiled cache.
    pub fn preprocess<S: AsRef<str>>(&self, raw: &str, params: &[S]) -> PatternResult<String> {
        preprocess::preprocess(raw, params, &self.params)
    }

    /// Compile `raw` with `params`, returning the error on failure.
    pub fn try_compile<S: AsRef<str>>(&self, raw: &str, params: &[S]) -> PatternResult<Pattern> {
        let canonical = self.preprocess(raw, params)?;
        self.patterns
            .get_or_compile(&canonical, || {
                tracing::debug!(pattern = %canonical, "Compiling pattern");
                Pattern::new(&canonical)
            })
            .inspect_err(|e| {
                metrics::record_compile_error();
                tracing::warn!(error = %e, "Pattern rejected");
            })
    }

    /// Compile `raw` with `params`.
    ///
    /// Intended for patterns fixed in source code, where a syntax error is a
    /// programming mistake.
    ///
    /// # Panics
    ///
    /// Panics if the canonical pattern does not compile. Use
    /// [`try_compile`](Self::try_compile) for patterns from untrusted input.
    pub fn compile<S: AsRef<str>>(&self, raw: &str, params: &[S]) -> Pattern {
        match self.try_compile(raw, params) {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::error!(pattern = raw, error = %e, "Fatal pattern compile error");
                panic!("{}", e);
            }
        }
    }

    /// Drop entries past their TTL from both caches.
    pub fn purge_expired(&self) -> usize {
        self.patterns.purge_expired() + self.params.purge_expired()
    }

    /// Evict entries idle past their early eviction thresholds.
    pub fn relieve_pressure(&self) -> usize {
        self.patterns.clear_idle_older_than(self.config.pattern_idle())
            + self.params.clear_idle_older_than(self.config.param_idle())
    }

    pub fn stats(&self) -> PatternCacheStats {
        PatternCacheStats {
            patterns: self.patterns.stats(),
            params: self.params.stats(),
        }
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
