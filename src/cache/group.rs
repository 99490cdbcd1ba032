//! Cache namespaces backed by a data-source callback.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use super::{ByteView, CacheError, LoadError, SharedCache};

/// Boxed future returned by [`Getter::get`].
pub type GetterFuture = Pin<Box<dyn Future<Output = Result<Vec<u8>, LoadError>> + Send>>;

/// Data source a [`Group`] consults on a cache miss.
///
/// Any `Fn(String) -> impl Future<Output = Result<Vec<u8>, LoadError>>`
/// closure that is `Send + Sync + 'static` implements this trait through the
/// blanket impl below, so most callers never implement it by hand.
///
/// The getter may perform arbitrary I/O. It runs without a timeout; callers
/// that need bounded latency should wrap [`Group::get`] in their own deadline.
pub trait Getter: Send + Sync + 'static {
    /// Loads the value for `key` from the underlying source.
    fn get(&self, key: &str) -> GetterFuture;
}

impl<T, F> Getter for T
where
    T: Fn(String) -> F + Send + Sync + 'static,
    F: Future<Output = Result<Vec<u8>, LoadError>> + Send + 'static,
{
    fn get(&self, key: &str) -> GetterFuture {
        Box::pin((self)(key.to_owned()))
    }
}

/// Snapshot of a group's hit and load counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupStats {
    /// Requests answered from the cache.
    pub hits: u64,
    /// Requests that invoked the getter.
    pub loads: u64,
    /// Getter invocations that failed.
    pub load_errors: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    loads: AtomicU64,
    load_errors: AtomicU64,
}

/// A named cache namespace.
///
/// A group owns its [`SharedCache`] and shares its [`Getter`] with whoever
/// supplied it. Groups are created through
/// [`Registry::new_group`](super::Registry::new_group).
///
/// Concurrent misses for the same key are not coalesced: each one invokes the
/// getter and the last write wins.
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: SharedCache,
    counters: Counters,
}

impl Group {
    pub(crate) fn new(name: String, cache_bytes: usize, getter: Arc<dyn Getter>) -> Self {
        Self {
            name,
            getter,
            main_cache: SharedCache::new(cache_bytes),
            counters: Counters::default(),
        }
    }

    /// Returns the namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value for `key`, loading it through the getter on a miss.
    ///
    /// # Errors
    ///
    /// - [`CacheError::EmptyKey`] if `key` is empty.
    /// - [`CacheError::Load`] if the getter fails. The cache is left untouched.
    pub async fn get(&self, key: &str) -> Result<ByteView, CacheError> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(view) = self.main_cache.get(key) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            debug!(group = %self.name, key, "cache hit");
            return Ok(view);
        }

        self.load(key).await
    }

    /// Returns a snapshot of the hit and load counters.
    pub fn stats(&self) -> GroupStats {
        GroupStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            loads: self.counters.loads.load(Ordering::Relaxed),
            load_errors: self.counters.load_errors.load(Ordering::Relaxed),
        }
    }

    /// Returns the number of entries currently cached.
    pub fn cached_entries(&self) -> usize {
        self.main_cache.len()
    }

    async fn load(&self, key: &str) -> Result<ByteView, CacheError> {
        self.counters.loads.fetch_add(1, Ordering::Relaxed);

        let bytes = match self.getter.get(key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.counters.load_errors.fetch_add(1, Ordering::Relaxed);
                debug!(group = %self.name, key, error = %e, "load failed");
                return Err(e.into());
            }
        };

        let view = ByteView::from(bytes);
        self.main_cache.add(key, view.clone());
        Ok(view)
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .finish_non_exhaustive()
    }
}
