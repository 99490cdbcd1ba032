use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use geecache::cache::{CacheError, Getter, LoadError, Registry};

fn slow_db(calls: Arc<AtomicUsize>) -> Arc<dyn Getter> {
    let db: Arc<HashMap<String, String>> = Arc::new(
        (0..64)
            .map(|i| (format!("key{i}"), format!("value{i}")))
            .collect(),
    );
    Arc::new(move |key: String| {
        let db = Arc::clone(&db);
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            db.get(&key)
                .map(|v| v.clone().into_bytes())
                .ok_or_else(|| LoadError::not_found(key))
        }
    })
}

#[tokio::test]
async fn scores_end_to_end() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let getter: Arc<dyn Getter> = Arc::new(move |key: String| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move {
            match key.as_str() {
                "Tom" => Ok(b"630".to_vec()),
                _ => Err(LoadError::not_found(key)),
            }
        }
    });

    let registry = Registry::new();
    registry.new_group("scores", 2 << 10, Some(getter)).unwrap();
    let scores = registry.get_group("scores").unwrap();

    assert_eq!(scores.get("Tom").await.unwrap().to_string(), "630");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(scores.get("Tom").await.unwrap().to_string(), "630");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(scores.stats().hits, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_readers_see_consistent_values() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(Registry::new());
    registry
        .new_group("kv", 0, Some(slow_db(Arc::clone(&calls))))
        .unwrap();

    let mut tasks = Vec::new();
    for t in 0..16 {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            let group = registry.get_group("kv").unwrap();
            for i in 0..64 {
                let idx = (i + t) % 64;
                let view = group.get(&format!("key{idx}")).await.unwrap();
                assert_eq!(view.to_string(), format!("value{idx}"));
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let group = registry.get_group("kv").unwrap();
    assert_eq!(group.cached_entries(), 64);
    // Concurrent misses are not coalesced, so each key loads at least once.
    let loads = calls.load(Ordering::SeqCst);
    assert!((64..=16 * 64).contains(&loads), "loads = {loads}");
}

#[tokio::test]
async fn bounded_group_evicts_and_reloads() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = Registry::new();
    // "key0" + "value0" = 10 bytes; room for two entries.
    let group = registry
        .new_group("small", 20, Some(slow_db(Arc::clone(&calls))))
        .unwrap();

    group.get("key0").await.unwrap();
    group.get("key1").await.unwrap();
    group.get("key0").await.unwrap();
    group.get("key2").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(group.cached_entries(), 2);

    group.get("key0").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    group.get("key1").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn construction_without_getter_is_an_error() {
    let registry = Registry::new();
    let result = registry.new_group("orphan", 64, None);
    assert!(matches!(result, Err(CacheError::MissingGetter { .. })));
    assert!(registry.get_group("orphan").is_none());
}
