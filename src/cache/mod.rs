//! Group-based caching layer.
//!
//! The building blocks, leaves first:
//!
//! - [`ByteView`] — immutable cached payload; reads always copy.
//! - [`LruCache`] — byte-bounded least-recently-used eviction, unsynchronized.
//! - [`SharedCache`] — mutex-guarded, lazily allocated [`LruCache`] of [`ByteView`]s.
//! - [`Group`] — a named namespace that resolves misses through a [`Getter`].
//! - [`Registry`] — name → [`Group`] lookup shared by the serving layer.
//!
//! ```
//! use std::sync::Arc;
//! use geecache::cache::{Getter, LoadError, Registry};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = Registry::new();
//! let getter: Arc<dyn Getter> = Arc::new(|key: String| async move {
//!     match key.as_str() {
//!         "Tom" => Ok(b"630".to_vec()),
//!         _ => Err(LoadError::not_found(key)),
//!     }
//! });
//!
//! let scores = registry.new_group("scores", 2 << 10, Some(getter)).unwrap();
//! assert_eq!(scores.get("Tom").await.unwrap().to_string(), "630");
//! # }
//! ```

mod byteview;
mod error;
mod group;
mod lru;
mod registry;
mod shared;

pub use byteview::ByteView;
pub use error::{BoxError, CacheError, LoadError};
pub use group::{Getter, GetterFuture, Group, GroupStats};
pub use lru::{EvictionCallback, LruCache};
pub use registry::Registry;
pub use shared::SharedCache;

/// A cacheable value with a known size in bytes.
///
/// [`LruCache`] charges `key.len() + value.len()` against its capacity.
pub trait Value {
    /// Returns the size of the value in bytes.
    fn len(&self) -> usize;

    /// Returns `true` if the value occupies no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl Value for String {
    fn len(&self) -> usize {
        String::len(self)
    }
}

impl Value for bytes::Bytes {
    fn len(&self) -> usize {
        bytes::Bytes::len(self)
    }
}
