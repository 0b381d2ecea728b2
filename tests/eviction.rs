//! Background eviction under paused time.

use std::time::Duration;

mod common;

const NO_PARAMS: &[&str] = &[];

/// Advance in small steps so every pressure tick runs.
async fn run_for(secs: u64) {
    for _ in 0..secs {
        common::advance(1).await;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn test_low_memory_evicts_idle_patterns() {
    let (cache, _probe, handle) = common::start_with_memory(common::fast_config(), 100);

    cache.compile("idle", NO_PARAMS);
    cache.compile("busy", NO_PARAMS);

    for _ in 0..4 {
        run_for(20).await;
        // keeps "busy" under the idle threshold
        cache.compile("busy", NO_PARAMS);
    }

    assert!(!cache.patterns().contains_key("idle"));
    assert!(cache.patterns().contains_key("busy"));

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_idle_entries_survive_without_pressure() {
    let (cache, probe, handle) = common::start_with_memory(common::fast_config(), 8192);

    cache.compile("idle", NO_PARAMS);
    run_for(90).await;
    assert!(cache.patterns().contains_key("idle"));

    // unreadable memory is never treated as pressure
    probe.set(None);
    run_for(30).await;
    assert!(cache.patterns().contains_key("idle"));

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_pressure_arriving_later() {
    let (cache, probe, handle) = common::start_with_memory(common::fast_config(), 8192);

    cache.compile("x%1", &["y"]);
    run_for(90).await;
    assert_eq!(cache.patterns().len(), 1);

    probe.set(Some(50 * 1024 * 1024));
    run_for(2).await;

    // compiled pattern past 60s idle, placeholder still under 180s
    assert!(cache.patterns().is_empty());
    assert_eq!(cache.params().len(), 1);

    run_for(100).await;
    assert!(cache.params().is_empty());

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_sweep_removes_expired_entries() {
    let (cache, _probe, handle) = common::start_with_memory(common::fast_config(), 8192);

    cache.compile("short-lived", NO_PARAMS);
    run_for(300).await;
    // used recently, but TTL counts from creation
    cache.compile("short-lived", NO_PARAMS);
    assert_eq!(cache.patterns().len(), 1);

    run_for(420).await;
    assert!(!cache.patterns().contains_key("short-lived"));

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_ends_task() {
    let (_cache, _probe, handle) = common::start_with_memory(common::fast_config(), 8192);
    run_for(5).await;
    assert!(!handle.is_finished());
    handle.stop().await;
}
