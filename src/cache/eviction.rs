//! Background eviction for the pattern cache.
//!
//! # Responsibilities
//! - Sweep entries past their TTL on a slow interval
//! - Sample free memory on a fast tick and evict idle entries when low
//!
//! # Design Decisions
//! - One task per cache, owned through an `EvictionHandle`
//! - Never blocks callers: it only reads touch times and removes entries
//! - Dropping the handle closes the shutdown channel, which also stops the task

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::cache::memory::{is_low_memory, MemoryProbe};
use crate::cache::pattern_cache::PatternCache;
use crate::observability::metrics;

/// Periodic TTL sweep plus memory-pressure eviction.
pub struct EvictionTask {
    cache: Arc<PatternCache>,
    probe: Arc<dyn MemoryProbe>,
}

impl EvictionTask {
    pub fn new(cache: Arc<PatternCache>, probe: Arc<dyn MemoryProbe>) -> Self {
        Self { cache, probe }
    }

    /// Spawn the task on the current tokio runtime.
    pub fn spawn(self) -> EvictionHandle {
        let (shutdown, rx) = broadcast::channel(1);
        let task = tokio::spawn(self.run(rx));
        EvictionHandle { shutdown, task }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let config = self.cache.config().clone();

        tracing::info!(
            tick_secs = config.pressure_tick_secs,
            sweep_secs = config.sweep_interval_secs,
            low_memory_mb = config.low_memory_mb,
            "Pattern cache eviction starting"
        );

        let mut pressure = time::interval(config.pressure_tick());
        pressure.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let first_sweep = Instant::now() + config.sweep_interval();
        let mut sweep = time::interval_at(first_sweep, config.sweep_interval());
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = pressure.tick() => {
                    self.tick();
                }
                _ = sweep.tick() => {
                    let removed = self.cache.purge_expired();
                    if removed > 0 {
                        tracing::info!(removed, "Swept expired patterns");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Pattern cache eviction received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One memory-pressure check. Returns how many entries were evicted.
    pub fn tick(&self) -> usize {
        let sample = self.probe.free_memory_bytes();
        metrics::record_free_memory(sample);

        if !is_low_memory(sample, self.cache.config().low_memory_mb) {
            return 0;
        }

        let removed = self.cache.relieve_pressure();
        if removed > 0 {
            tracing::info!(
                removed,
                free_bytes = sample.unwrap_or_default(),
                "Low memory, evicted idle patterns"
            );
        }
        removed
    }
}

/// Owner handle for a running [`EvictionTask`].
pub struct EvictionHandle {
    shutdown: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl EvictionHandle {
    /// Signal the task and wait for it to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Eviction task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::StaticMemory;
    use crate::config::CacheConfig;
    use std::time::Duration;

    const NO_PARAMS: &[&str] = &[];

    fn task(free_mb: u64) -> (Arc<PatternCache>, Arc<StaticMemory>, EvictionTask) {
        let cache = Arc::new(PatternCache::new(CacheConfig::default()));
        let probe = Arc::new(StaticMemory::mebibytes(free_mb));
        let task = EvictionTask::new(cache.clone(), probe.clone());
        (cache, probe, task)
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_evicts_idle_under_pressure() {
        let (cache, _probe, task) = task(100);
        cache.compile("idle", NO_PARAMS);
        time::advance(Duration::from_secs(5 * 60)).await;
        cache.compile("recent", NO_PARAMS);
        time::advance(Duration::from_secs(5 * 60 + 1)).await;

        assert_eq!(task.tick(), 1);
        assert!(!cache.patterns().contains_key("idle"));
        assert!(cache.patterns().contains_key("recent"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_ignores_plenty_of_memory() {
        let (cache, probe, task) = task(4096);
        cache.compile("idle", NO_PARAMS);
        time::advance(Duration::from_secs(60 * 60)).await;

        assert_eq!(task.tick(), 0);
        assert!(cache.patterns().contains_key("idle"));

        probe.set(None);
        assert_eq!(task.tick(), 0);
        probe.set(Some(0));
        assert_eq!(task.tick(), 0);
        assert!(cache.patterns().contains_key("idle"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_param_cache_has_longer_threshold() {
        let (cache, _probe, task) = task(100);
        cache.compile("a%1", &["b"]);
        time::advance(Duration::from_secs(11 * 60)).await;

        // compiled pattern goes, placeholder pattern stays
        assert_eq!(task.tick(), 1);
        assert!(cache.patterns().is_empty());
        assert_eq!(cache.params().len(), 1);

        time::advance(Duration::from_secs(20 * 60)).await;
        assert_eq!(task.tick(), 1);
        assert!(cache.params().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop() {
        let (_cache, _probe, task) = task(4096);
        let handle = task.spawn();
        time::sleep(Duration::from_secs(30)).await;
        assert!(!handle.is_finished());
        handle.stop().await;
    }
}
