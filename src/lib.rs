//! # geecache
//!
//! Group-based in-memory caching with byte-bounded LRU eviction, lazily
//! populated through per-namespace data sources, and served to other nodes
//! over a small HTTP protocol.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use geecache::cache::{Getter, LoadError, Registry};
//! use geecache::peer::HttpPool;
//! use geecache::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(Registry::new());
//!     let getter: Arc<dyn Getter> = Arc::new(|key: String| async move {
//!         match key.as_str() {
//!             "Tom" => Ok(b"630".to_vec()),
//!             _ => Err(LoadError::not_found(key)),
//!         }
//!     });
//!     registry.new_group("scores", 2 << 10, Some(getter))?;
//!
//!     let server = Server::bind("127.0.0.1:9999").await?;
//!     let pool = HttpPool::new("127.0.0.1:9999", registry);
//!     // GET /_geecache/scores/Tom -> 200 "630"
//!     server.serve_pool(pool).await?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod http;
pub mod peer;
pub mod server;

pub use cache::{ByteView, CacheError, Getter, Group, LoadError, Registry};
pub use peer::{DEFAULT_BASE_PATH, HttpPool};
pub use server::{Server, ServerError};
