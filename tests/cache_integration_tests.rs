//! Integration Tests for the public cache API
//!
//! Each scenario is written once against `TtlCache` and run for both variants.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use easycache::{
    new_concurrent_cache, new_simple_cache, CacheError, ConcurrentTtlCache, SimpleTtlCache,
    TtlCache,
};
use tokio::task::LocalSet;

// == Helper Functions ==

async fn local<F: Future>(f: F) -> F::Output {
    LocalSet::new().run_until(f).await
}

async fn set_and_get<C: TtlCache<String>>(cache: &C) {
    cache.set("username", "john_doe".to_string(), Duration::from_secs(5));

    assert_eq!(cache.get_with_check("username"), Some("john_doe".to_string()));
}

async fn expiration<C: TtlCache<String>>(cache: &C) {
    cache.set("temp", "expired_value".to_string(), Duration::from_millis(20));

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(
        cache.get_with_check("temp").is_some(),
        "Expected 'temp' key to be present before expiry"
    );

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(cache.get_with_check("temp"), None);
}

async fn no_expiration<C: TtlCache<String>>(cache: &C) {
    cache.set("name", "Alice".to_string(), Duration::ZERO);

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(cache.get_without_check("name"), Some("Alice".to_string()));
    assert_eq!(cache.get_with_check("name"), Some("Alice".to_string()));
}

async fn sweep_without_reads<C: TtlCache<String>>(cache: &C) {
    cache.set("swept", "value".to_string(), Duration::from_millis(15));
    assert_eq!(cache.len(), 1);

    tokio::time::sleep(Duration::from_millis(40)).await;

    assert_eq!(cache.len(), 0, "Sweep should have removed the entry");
}

async fn delete<C: TtlCache<String>>(cache: &C) {
    cache.set("to_delete", "value".to_string(), Duration::ZERO);
    cache.delete("to_delete");

    assert_eq!(cache.get_with_check("to_delete"), None);
    assert_eq!(cache.get_without_check("to_delete"), None);

    // Deleting a missing key is a no-op
    cache.delete("to_delete");
    cache.delete("never_existed");
    assert!(cache.is_empty());
}

async fn clear<C: TtlCache<String>>(cache: &C) {
    cache.set("key1", "value1".to_string(), Duration::ZERO);
    cache.set("key2", "value2".to_string(), Duration::from_secs(60));
    cache.set("key3", "value3".to_string(), Duration::from_millis(1));
    cache.clear();

    for key in ["key1", "key2", "key3"] {
        assert_eq!(cache.get_with_check(key), None);
        assert_eq!(cache.get_without_check(key), None);
    }
    assert!(cache.is_empty());
}

async fn stale_read_paths<C: TtlCache<String>>(cache: &C) {
    cache.set("stale", "old".to_string(), Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(cache.get_without_check("stale"), Some("old".to_string()));
    assert_eq!(cache.get_with_check("stale"), None);
    assert_eq!(cache.get_without_check("stale"), None);
}

async fn overwrite<C: TtlCache<String>>(cache: &C) {
    cache.set("key", "v1".to_string(), Duration::from_millis(20));
    cache.set("key", "v2".to_string(), Duration::from_secs(60));
    assert_eq!(cache.get_with_check("key"), Some("v2".to_string()));

    tokio::time::sleep(Duration::from_millis(40)).await;

    assert_eq!(cache.get_with_check("key"), Some("v2".to_string()));
    assert_eq!(cache.len(), 1);
}

// == Concurrent Variant ==

fn concurrent(interval_ms: u64) -> ConcurrentTtlCache<String> {
    new_concurrent_cache(Duration::from_millis(interval_ms))
}

#[tokio::test]
async fn test_concurrent_set_and_get() {
    set_and_get(&concurrent(1000)).await;
}

#[tokio::test]
async fn test_concurrent_expiration() {
    expiration(&concurrent(10)).await;
}

#[tokio::test]
async fn test_concurrent_no_expiration() {
    no_expiration(&concurrent(10)).await;
}

#[tokio::test]
async fn test_concurrent_sweep_without_reads() {
    sweep_without_reads(&concurrent(10)).await;
}

#[tokio::test]
async fn test_concurrent_delete() {
    delete(&concurrent(1000)).await;
}

#[tokio::test]
async fn test_concurrent_clear() {
    clear(&concurrent(1000)).await;
}

#[tokio::test]
async fn test_concurrent_stale_read_paths() {
    stale_read_paths(&concurrent(1000)).await;
}

#[tokio::test]
async fn test_concurrent_overwrite() {
    overwrite(&concurrent(10)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_shared_across_tasks() {
    let cache = Arc::new(concurrent(5));

    let writers: Vec<_> = (0..4)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                for i in 0..100 {
                    cache.set(format!("key{}", i), format!("w{}", worker), Duration::ZERO);
                    cache.set(format!("tmp{}-{}", worker, i), "x".to_string(), Duration::from_millis(1));
                }
            })
        })
        .collect();

    for writer in writers {
        writer.await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Every shared key holds one writer's value, and all temporaries are swept
    assert_eq!(cache.len(), 100);
    for i in 0..100 {
        let value = cache.get_with_check(&format!("key{}", i)).unwrap();
        assert!(value.starts_with('w'));
    }
}

#[test]
fn test_concurrent_requires_runtime() {
    let result = ConcurrentTtlCache::<String>::try_new(Duration::from_secs(1));
    assert!(matches!(result, Err(CacheError::NoRuntime(_))));
}

// == Simple Variant ==

fn simple(interval_ms: u64) -> SimpleTtlCache<String> {
    new_simple_cache(Duration::from_millis(interval_ms))
}

#[tokio::test]
async fn test_simple_set_and_get() {
    local(async { set_and_get(&simple(1000)).await }).await;
}

#[tokio::test]
async fn test_simple_expiration() {
    local(async { expiration(&simple(10)).await }).await;
}

#[tokio::test]
async fn test_simple_no_expiration() {
    local(async { no_expiration(&simple(10)).await }).await;
}

#[tokio::test]
async fn test_simple_sweep_without_reads() {
    local(async { sweep_without_reads(&simple(10)).await }).await;
}

#[tokio::test]
async fn test_simple_delete() {
    local(async { delete(&simple(1000)).await }).await;
}

#[tokio::test]
async fn test_simple_clear() {
    local(async { clear(&simple(1000)).await }).await;
}

#[tokio::test]
async fn test_simple_stale_read_paths() {
    local(async { stale_read_paths(&simple(1000)).await }).await;
}

#[tokio::test]
async fn test_simple_overwrite() {
    local(async { overwrite(&simple(10)).await }).await;
}

#[tokio::test]
async fn test_simple_zero_interval_rejected() {
    let result = SimpleTtlCache::<String>::try_new(Duration::ZERO);
    assert!(matches!(result, Err(CacheError::InvalidInterval)));
}
