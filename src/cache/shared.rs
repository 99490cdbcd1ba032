//! Mutex-guarded, lazily allocated wrapper around [`LruCache`].

use parking_lot::Mutex;

use super::{ByteView, LruCache};

/// Serializes access to one [`LruCache`] of [`ByteView`]s.
///
/// The underlying cache is not allocated until the first [`add`](Self::add),
/// so a namespace that is registered but never populated costs nothing beyond
/// this struct. A single exclusive lock is used because every miss is
/// immediately followed by a write.
#[derive(Debug)]
pub struct SharedCache {
    max_bytes: usize,
    inner: Mutex<Option<LruCache<ByteView>>>,
}

impl SharedCache {
    /// Creates a wrapper whose cache will be bounded to `max_bytes` once allocated.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(None),
        }
    }

    /// Returns a clone of the cached view for `key`, promoting it on a hit.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        self.inner.lock().as_mut()?.get(key).cloned()
    }

    /// Stores `value` under `key`, allocating the cache on first use.
    pub fn add(&self, key: &str, value: ByteView) {
        self.inner
            .lock()
            .get_or_insert_with(|| LruCache::new(self.max_bytes))
            .add(key, value);
    }

    /// Returns the number of cached entries (`0` before allocation).
    pub fn len(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, LruCache::len)
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the bytes currently accounted (`0` before allocation).
    pub fn used_bytes(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, LruCache::used_bytes)
    }

    /// Returns `true` once the first [`add`](Self::add) has allocated the cache.
    pub fn is_allocated(&self) -> bool {
        self.inner.lock().is_some()
    }
}
