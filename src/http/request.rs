//! HTTP/1.1 request parsing using the [`httparse`] crate.

use thiserror::Error;

use super::{Headers, Method};

/// Errors that can occur while parsing an HTTP/1.1 request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request is incomplete — more data needed")]
    Incomplete,

    #[error("HTTP parse error: {0}")]
    Parse(#[from] httparse::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
}

/// A parsed HTTP/1.1 request.
///
/// The request target is split into a path and an optional raw query string.
/// The path is kept exactly as received; [`decoded_path`](Self::decoded_path)
/// percent-decodes it on demand.
///
/// ```
/// use geecache::http::Request;
///
/// let raw = b"GET /_geecache/scores/Tom%20Hanks?v=1 HTTP/1.1\r\nHost: localhost\r\n\r\n";
/// let (request, _offset) = Request::parse(raw).unwrap();
///
/// assert_eq!(request.path(), "/_geecache/scores/Tom%20Hanks");
/// assert_eq!(request.decoded_path().unwrap(), "/_geecache/scores/Tom Hanks");
/// assert_eq!(request.query_string(), Some("v=1"));
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    /// HTTP minor version: 0 for HTTP/1.0, 1 for HTTP/1.1.
    version: u8,
    headers: Headers,
    query: Option<String>,
}

impl Request {
    const MAX_HEADERS: usize = 64;

    /// Parses a request head from `buf`.
    ///
    /// Returns the request and the offset at which the body begins. The body
    /// itself is not retained; callers skip `Content-Length` bytes past the
    /// offset.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Incomplete`] — the header block has not fully arrived.
    /// - [`RequestError::Parse`] — the data is not a valid HTTP/1.x request.
    /// - [`RequestError::MissingField`] — method, path, or version is absent.
    pub fn parse(buf: &[u8]) -> Result<(Self, usize), RequestError> {
        let mut headers = [httparse::EMPTY_HEADER; Self::MAX_HEADERS];
        let mut raw_req = httparse::Request::new(&mut headers);

        let body_offset = match raw_req.parse(buf)? {
            httparse::Status::Complete(offset) => offset,
            httparse::Status::Partial => return Err(RequestError::Incomplete),
        };

        let method: Method = match raw_req.method {
            Some(token) => match token.parse() {
                Ok(method) => method,
                Err(never) => match never {},
            },
            None => return Err(RequestError::MissingField { field: "method" }),
        };

        let target = raw_req
            .path
            .ok_or(RequestError::MissingField { field: "path" })?;
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_owned(), Some(query.to_owned())),
            None => (target.to_owned(), None),
        };

        let version = raw_req
            .version
            .ok_or(RequestError::MissingField { field: "version" })?;

        let mut header_map = Headers::with_capacity(raw_req.headers.len());
        for header in raw_req.headers.iter() {
            if let Ok(value) = std::str::from_utf8(header.value) {
                header_map.insert(header.name, value);
            }
        }

        let request = Self {
            method,
            path,
            version,
            headers: header_map,
            query,
        };

        Ok((request, body_offset))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the raw request path, without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the path with percent-escapes decoded.
    ///
    /// # Errors
    ///
    /// Fails if the decoded bytes are not valid UTF-8.
    pub fn decoded_path(&self) -> Result<String, std::string::FromUtf8Error> {
        urlencoding::decode(&self.path).map(|path| path.into_owned())
    }

    /// Returns the HTTP minor version number (0 = HTTP/1.0, 1 = HTTP/1.1).
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the raw query string (without the leading `?`), if any.
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns `true` if the connection should stay open after this request.
    ///
    /// HTTP/1.1 defaults to keep-alive; HTTP/1.0 only with an explicit
    /// `Connection: keep-alive`.
    pub fn is_keep_alive(&self) -> bool {
        match self.headers.get("connection") {
            Some(conn) => conn.eq_ignore_ascii_case("keep-alive"),
            None => self.version == 1,
        }
    }

    /// Returns `Content-Length` parsed as a `usize`, if present and valid.
    pub fn content_length(&self) -> Option<usize> {
        self.headers.get("content-length")?.trim().parse().ok()
    }
}
