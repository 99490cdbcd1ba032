//! Byte-bounded least-recently-used cache.
//!
//! [`LruCache`] accounts for memory as `len(key) + len(value)` per entry and
//! evicts from the least-recently-used end whenever usage exceeds the
//! configured maximum. Recency ordering comes from an unbounded
//! [`lru::LruCache`]; this type layers byte accounting and the eviction
//! callback on top.
//!
//! The cache is not synchronized. Wrap it in [`SharedCache`](super::SharedCache)
//! (or another lock) before sharing it across tasks.

use std::fmt;

use super::Value;

/// Callback invoked with the key and value of every evicted entry.
pub type EvictionCallback<V> = Box<dyn FnMut(String, V) + Send>;

/// A fixed-capacity, byte-accounted LRU cache keyed by `String`.
///
/// A `max_bytes` of `0` disables eviction entirely; usage is still tracked.
///
/// # Examples
///
/// ```
/// use geecache::cache::LruCache;
///
/// let mut cache: LruCache<String> = LruCache::new(10);
/// cache.add("k1", "aa".to_string()); // 4 bytes
/// cache.add("k2", "bb".to_string()); // 8 bytes
/// cache.get("k1");                   // k1 is now most recent
/// cache.add("k3", "cc".to_string()); // 12 bytes > 10, evicts k2
///
/// assert!(cache.get("k2").is_none());
/// assert_eq!(cache.len(), 2);
/// ```
pub struct LruCache<V> {
    max_bytes: usize,
    used_bytes: usize,
    entries: lru::LruCache<String, V>,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: Value> LruCache<V> {
    /// Creates an empty cache bounded to `max_bytes` (`0` = unbounded).
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            entries: lru::LruCache::unbounded(),
            on_evicted: None,
        }
    }

    /// Creates an empty cache that calls `callback` for each evicted entry.
    pub fn with_eviction_callback(
        max_bytes: usize,
        callback: impl FnMut(String, V) + Send + 'static,
    ) -> Self {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(Box::new(callback));
        cache
    }

    /// Looks up `key`, promoting it to most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Inserts or updates `key`, then evicts until usage fits the capacity.
    ///
    /// Updating an existing key adjusts usage by the difference between the
    /// new and old value lengths. A single entry larger than the capacity is
    /// evicted immediately after insertion.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let key_len = key.len();
        let value_len = value.len();

        // `put` promotes an existing key and hands back the replaced value.
        match self.entries.put(key, value) {
            Some(old) => self.used_bytes = self.used_bytes - old.len() + value_len,
            None => self.used_bytes += key_len + value_len,
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            self.remove_oldest();
        }
    }

    /// Evicts the least recently used entry, if any.
    pub fn remove_oldest(&mut self) {
        let Some((key, value)) = self.entries.pop_lru() else {
            return;
        };
        self.used_bytes -= key.len() + value.len();

        if let Some(callback) = self.on_evicted.as_mut() {
            callback(key, value);
        }
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the bytes currently accounted to keys and values.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Returns the configured capacity in bytes (`0` = unbounded).
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    fn size(key: &str, value: &str) -> usize {
        key.len() + value.len()
    }

    #[test]
    fn get_hit_and_miss() {
        let mut cache = LruCache::new(0);
        cache.add("key1", "1234".to_string());
        assert_eq!(cache.get("key1").map(String::as_str), Some("1234"));
        assert!(cache.get("key2").is_none());
    }

    #[test]
    fn evicts_least_recently_used() {
        let cap = size("k1", "v1") + size("k2", "v2");
        let mut cache = LruCache::new(cap);
        cache.add("k1", "v1".to_string());
        cache.add("k2", "v2".to_string());
        assert!(cache.get("k1").is_some());
        cache.add("k3", "v3".to_string());

        assert!(cache.get("k2").is_none());
        assert!(cache.get("k1").is_some());
        assert!(cache.get("k3").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn update_adjusts_usage_by_delta() {
        let mut cache = LruCache::new(0);
        cache.add("key", "ab".to_string());
        assert_eq!(cache.used_bytes(), 5);

        cache.add("key", "abcdef".to_string());
        assert_eq!(cache.used_bytes(), 9);
        assert_eq!(cache.len(), 1);

        cache.add("key", "a".to_string());
        assert_eq!(cache.used_bytes(), 4);
    }

    #[test]
    fn update_promotes_entry() {
        let cap = size("a", "1") + size("b", "1");
        let mut cache = LruCache::new(cap);
        cache.add("a", "1".to_string());
        cache.add("b", "1".to_string());
        cache.add("a", "2".to_string());
        cache.add("c", "1".to_string());

        assert!(cache.get("b").is_none());
        assert_eq!(cache.get("a").map(String::as_str), Some("2"));
    }

    #[test]
    fn oversized_entry_evicts_itself() {
        let mut cache = LruCache::new(4);
        cache.add("big", "value".to_string());
        assert!(cache.is_empty());
        assert_eq!(cache.used_bytes(), 0);
    }

    #[test]
    fn zero_capacity_never_evicts() {
        let mut cache = LruCache::new(0);
        for i in 0..100 {
            cache.add(format!("key{i}"), "x".repeat(64));
        }
        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn usage_never_exceeds_capacity() {
        let cap = 50;
        let mut cache = LruCache::new(cap);
        for i in 0..200usize {
            let value = "v".repeat(i % 17);
            cache.add(format!("k{}", i % 23), value);
            assert!(cache.used_bytes() <= cap, "usage {} > {cap}", cache.used_bytes());
            if i % 3 == 0 {
                cache.get(&format!("k{}", (i * 7) % 23));
            }
        }
    }

    #[test]
    fn eviction_callback_receives_entries() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let mut cache = LruCache::with_eviction_callback(10, move |key, _value: String| {
            sink.lock().push(key);
        });

        cache.add("key1", "123456".to_string());
        cache.add("k2", "k2".to_string());
        cache.add("k3", "k3".to_string());
        cache.add("k4", "k4".to_string());

        assert_eq!(*evicted.lock(), vec!["key1", "k2"]);
    }

    #[test]
    fn remove_oldest_on_empty_is_noop() {
        let mut cache: LruCache<String> = LruCache::new(8);
        cache.remove_oldest();
        assert!(cache.is_empty());
    }

    #[test]
    fn churn_keeps_only_latest_entry() {
        let mut cache = LruCache::new(size("k0", "v"));
        for i in 0..10 {
            cache.add(format!("k{i}"), "v".to_string());
        }
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.used_bytes(), size("k9", "v"));
        assert!(cache.get("k9").is_some());
    }
}
