//! Tests for [`ResponseCache`], the expiring store for non-streaming answers.

use std::time::Duration;

use muninn::ResponseCache;

#[tokio::test(start_paused = true)]
async fn lookup_hits_strictly_before_expiry() {
    let cache = ResponseCache::new();
    cache.store("k".into(), "four".into(), Duration::from_secs(60));

    assert_eq!(cache.lookup("k").as_deref(), Some("four"));

    tokio::time::advance(Duration::from_secs(59)).await;
    assert_eq!(cache.lookup("k").as_deref(), Some("four"));
}

#[tokio::test(start_paused = true)]
async fn lookup_misses_at_and_after_expiry() {
    let cache = ResponseCache::new();
    cache.store("k".into(), "four".into(), Duration::from_secs(60));

    // Exactly at the expiration instant the entry is already gone.
    tokio::time::advance(Duration::from_secs(60)).await;
    assert!(cache.lookup("k").is_none());

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(cache.lookup("k").is_none());
}

#[tokio::test(start_paused = true)]
async fn expired_entries_linger_until_swept() {
    let cache = ResponseCache::new();
    cache.store("k".into(), "four".into(), Duration::from_secs(1));

    tokio::time::advance(Duration::from_secs(2)).await;

    // Lookup already refuses the entry; the map still holds it.
    assert!(cache.lookup("k").is_none());
    assert_eq!(cache.len(), 1);

    assert_eq!(cache.sweep(), 1);
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn sweep_keeps_live_entries() {
    let cache = ResponseCache::new();
    cache.store("old".into(), "a".into(), Duration::from_secs(10));
    cache.store("new".into(), "b".into(), Duration::from_secs(120));

    tokio::time::advance(Duration::from_secs(30)).await;

    assert_eq!(cache.sweep(), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.lookup("new").as_deref(), Some("b"));
}

#[tokio::test]
async fn store_overwrites_existing_key() {
    let cache = ResponseCache::new();
    cache.store("k".into(), "first".into(), Duration::from_secs(60));
    cache.store("k".into(), "second".into(), Duration::from_secs(60));

    assert_eq!(cache.lookup("k").as_deref(), Some("second"));
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn missing_key_is_a_miss() {
    let cache = ResponseCache::new();
    assert!(cache.lookup("absent").is_none());
}
