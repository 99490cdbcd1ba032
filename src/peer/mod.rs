//! HTTP endpoint that serves cached values to other nodes.
//!
//! Wire contract for `GET <base_path><group>/<key>`:
//!
//! | Outcome                                   | Status | Body                  |
//! |-------------------------------------------|--------|-----------------------|
//! | value resolved                            | 200    | raw bytes             |
//! | path does not split into group and key    | 400    | `bad request`         |
//! | group not registered                      | 404    | `no such group: <g>`  |
//! | getter failed                             | 500    | the failure's message |
//!
//! Successful responses carry `Content-Type: application/octet-stream`. The
//! pool is server-only: it never forwards a miss to another node.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{CacheError, Registry};
use crate::http::{OCTET_STREAM, Request, Response, StatusCode};

/// Default URL prefix routed to the pool.
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";

/// Serves `GET <base_path><group>/<key>` out of a [`Registry`].
///
/// ```
/// use std::sync::Arc;
/// use geecache::cache::Registry;
/// use geecache::peer::{HttpPool, DEFAULT_BASE_PATH};
///
/// let pool = HttpPool::new("localhost:9999", Arc::new(Registry::new()));
/// assert_eq!(pool.base_path(), DEFAULT_BASE_PATH);
/// assert_eq!(pool.self_addr(), "localhost:9999");
/// ```
#[derive(Debug, Clone)]
pub struct HttpPool {
    self_addr: String,
    base_path: String,
    registry: Arc<Registry>,
}

impl HttpPool {
    /// Creates a pool identified by `self_addr` serving groups from `registry`.
    pub fn new(self_addr: impl Into<String>, registry: Arc<Registry>) -> Self {
        Self {
            self_addr: self_addr.into(),
            base_path: DEFAULT_BASE_PATH.to_owned(),
            registry,
        }
    }

    /// Overrides the URL prefix. A trailing `/` is appended if missing.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        let mut base_path = base_path.into();
        if !base_path.ends_with('/') {
            base_path.push('/');
        }
        self.base_path = base_path;
        self
    }

    /// Returns the address this node identifies itself with.
    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    /// Returns the URL prefix this pool owns, always ending in `/`.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Handles one request addressed to the pool.
    ///
    /// # Panics
    ///
    /// Panics if the request path does not start with the base path. That
    /// means the upstream router sent the pool a request it does not own.
    pub async fn handle(&self, request: Request) -> Response {
        if !request.path().starts_with(&self.base_path) {
            panic!("HttpPool serving unexpected path: {}", request.path());
        }

        info!(
            server = %self.self_addr,
            method = %request.method(),
            path = %request.path(),
            "serving peer request"
        );

        let Ok(path) = request.decoded_path() else {
            return Response::error(StatusCode::BadRequest, "bad request");
        };
        let Some((group_name, key)) = path
            .strip_prefix(self.base_path.as_str())
            .and_then(split_group_key)
        else {
            return Response::error(StatusCode::BadRequest, "bad request");
        };

        match self.lookup(group_name, key).await {
            Ok(bytes) => Response::new(StatusCode::Ok)
                .content_type(OCTET_STREAM)
                .body(bytes),
            Err(e) => {
                warn!(server = %self.self_addr, group = group_name, key, error = %e, "lookup failed");
                Response::error(status_for(&e), e.to_string())
            }
        }
    }

    async fn lookup(&self, group_name: &str, key: &str) -> Result<Vec<u8>, CacheError> {
        let group = self.registry.require_group(group_name)?;
        let view = group.get(key).await?;
        Ok(view.byte_slice())
    }
}

/// Splits `<group>/<key>` on the first `/`. Both parts must be non-empty;
/// the key may itself contain `/`.
fn split_group_key(rest: &str) -> Option<(&str, &str)> {
    match rest.split_once('/') {
        Some((group, key)) if !group.is_empty() && !key.is_empty() => Some((group, key)),
        _ => None,
    }
}

fn status_for(error: &CacheError) -> StatusCode {
    match error {
        CacheError::EmptyKey => StatusCode::BadRequest,
        CacheError::NoSuchGroup { .. } => StatusCode::NotFound,
        CacheError::MissingGetter { .. } | CacheError::Load(_) => StatusCode::InternalServerError,
    }
}
