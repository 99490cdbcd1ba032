//! Serves the "scores" namespace backed by a slow in-memory database.
//!
//! ```text
//! GEECACHE_ADDR=localhost:9999 cargo run --example scores_server
//! curl http://localhost:9999/_geecache/scores/Tom
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use geecache::cache::{Getter, LoadError, Registry};
use geecache::peer::HttpPool;
use geecache::server::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "localhost:9999";
const DEFAULT_CACHE_BYTES: usize = 2 << 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("GEECACHE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());
    let cache_bytes = match std::env::var("GEECACHE_CACHE_BYTES") {
        Ok(raw) => raw.parse()?,
        Err(_) => DEFAULT_CACHE_BYTES,
    };

    let db: Arc<HashMap<&str, &str>> =
        Arc::new(HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]));
    let getter: Arc<dyn Getter> = Arc::new(move |key: String| {
        let db = Arc::clone(&db);
        async move {
            info!(%key, "[SlowDB] search key");
            tokio::time::sleep(Duration::from_millis(50)).await;
            db.get(key.as_str())
                .map(|v| v.as_bytes().to_vec())
                .ok_or_else(|| LoadError::not_found(key))
        }
    });

    let registry = Arc::new(Registry::new());
    registry.new_group("scores", cache_bytes, Some(getter))?;

    let server = Server::bind(&addr).await?;
    let pool = HttpPool::new(addr.clone(), registry);
    info!(%addr, "geecache is running");

    server
        .serve_pool_until(pool, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
