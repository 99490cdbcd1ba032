//! Async TCP server using Tokio.
//!
//! Accepts TCP connections and dispatches HTTP/1.1 requests to a handler,
//! typically an [`HttpPool`]. Connections are persistent (keep-alive) unless
//! the client asks otherwise.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::http::{
    StatusCode,
    request::{Request, RequestError},
    response::Response,
};
use crate::peer::HttpPool;

/// Errors produced by the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Maximum size of a complete HTTP request we will buffer before rejecting it (8 MiB).
const MAX_REQUEST_SIZE: usize = 8 * 1024 * 1024;

/// Initial read buffer capacity per connection.
const INITIAL_BUF_SIZE: usize = 4096;

/// TCP front end for the cache.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use geecache::cache::Registry;
/// use geecache::peer::HttpPool;
/// use geecache::server::Server;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let registry = Arc::new(Registry::new());
///     let server = Server::bind("127.0.0.1:9999").await?;
///     let pool = HttpPool::new(server.local_addr().to_string(), registry);
///     server.serve_pool(pool).await?;
///     Ok(())
/// }
/// ```
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds the server to the given TCP address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn bind(addr: impl AsRef<str>) -> Result<Self, ServerError> {
        let addr = addr.as_ref();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.to_owned(),
                source: e,
            })?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves `pool` until the process exits.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the listener itself fails.
    pub async fn serve_pool(self, pool: HttpPool) -> Result<(), ServerError> {
        self.serve_pool_until(pool, std::future::pending()).await
    }

    /// Serves `pool` until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the listener itself fails.
    pub async fn serve_pool_until(
        self,
        pool: HttpPool,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ServerError> {
        let pool = Arc::new(pool);
        let handler = move |request: Request| {
            let pool = Arc::clone(&pool);
            async move { pool.handle(request).await }
        };
        self.run_until_shutdown(handler, shutdown).await
    }

    /// Accepts connections forever, dispatching each request to `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the listener itself fails.
    pub async fn run<H, F>(self, handler: H) -> Result<(), ServerError>
    where
        H: Fn(Request) -> F + Send + Sync + 'static,
        F: Future<Output = Response> + Send + 'static,
    {
        self.run_until_shutdown(handler, std::future::pending()).await
    }

    /// Accepts connections until `shutdown` resolves.
    ///
    /// Connections already accepted keep running on their own tasks; only the
    /// accept loop stops.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the listener itself fails.
    pub async fn run_until_shutdown<H, F>(
        self,
        handler: H,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ServerError>
    where
        H: Fn(Request) -> F + Send + Sync + 'static,
        F: Future<Output = Response> + Send + 'static,
    {
        let handler = Arc::new(handler);
        info!(address = %self.local_addr, "geecache listening");

        tokio::pin!(shutdown);

        loop {
            let accepted = tokio::select! {
                _ = &mut shutdown => {
                    info!(address = %self.local_addr, "shutdown requested, no longer accepting");
                    return Ok(());
                }
                accepted = self.listener.accept() => accepted,
            };

            let (stream, peer_addr) = match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            debug!(peer = %peer_addr, "connection accepted");
            let handler = Arc::clone(&handler);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer_addr, handler).await {
                    warn!(peer = %peer_addr, error = %e, "connection closed with error");
                }
            });
        }
    }
}

/// Reads requests off one connection until the peer closes it or opts out of
/// keep-alive.
async fn handle_connection<H, F>(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    handler: Arc<H>,
) -> Result<(), std::io::Error>
where
    H: Fn(Request) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    let mut buf = BytesMut::with_capacity(INITIAL_BUF_SIZE);

    loop {
        let bytes_read = stream.read_buf(&mut buf).await?;

        if bytes_read == 0 {
            debug!(peer = %peer_addr, "connection closed by peer");
            break;
        }

        if buf.len() > MAX_REQUEST_SIZE {
            warn!(peer = %peer_addr, "request too large — sending 413");
            let response = Response::error(StatusCode::PayloadTooLarge, "Request entity too large")
                .keep_alive(false);
            stream.write_all(&response.into_bytes()).await?;
            break;
        }

        // A single read may carry several pipelined requests.
        while !buf.is_empty() {
            let (request, body_offset) = match Request::parse(&buf) {
                Ok(pair) => pair,
                Err(RequestError::Incomplete) => break,
                Err(e) => {
                    warn!(peer = %peer_addr, error = %e, "bad request — sending 400");
                    let response =
                        Response::error(StatusCode::BadRequest, format!("Bad Request: {e}"))
                            .keep_alive(false);
                    stream.write_all(&response.into_bytes()).await?;
                    return Ok(());
                }
            };

            let total_needed = match body_offset
                .checked_add(request.content_length().unwrap_or(0))
            {
                Some(total) if total <= MAX_REQUEST_SIZE => total,
                _ => {
                    warn!(peer = %peer_addr, "declared body too large — sending 413");
                    let response =
                        Response::error(StatusCode::PayloadTooLarge, "Request entity too large")
                            .keep_alive(false);
                    stream.write_all(&response.into_bytes()).await?;
                    return Ok(());
                }
            };
            if buf.len() < total_needed {
                break;
            }

            let keep_alive = request.is_keep_alive();

            debug!(
                peer = %peer_addr,
                method = %request.method(),
                path = %request.path(),
                "dispatching request"
            );

            let response = handler(request).await.keep_alive(keep_alive);
            stream.write_all(&response.into_bytes()).await?;
            stream.flush().await?;

            let _ = buf.split_to(total_needed);

            if !keep_alive {
                debug!(peer = %peer_addr, "Connection: close — shutting down");
                return Ok(());
            }
        }
    }

    Ok(())
}
