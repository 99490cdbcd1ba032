//! HTTP/1.1 response builder and wire serialization.

use bytes::{BufMut, Bytes, BytesMut};

use super::{Headers, StatusCode, TEXT_PLAIN};

/// An HTTP/1.1 response, ready to be serialized and sent.
///
/// ```
/// use geecache::http::{Response, StatusCode, OCTET_STREAM};
///
/// let response = Response::new(StatusCode::Ok)
///     .content_type(OCTET_STREAM)
///     .body(b"630".to_vec());
///
/// let bytes = response.into_bytes();
/// let text = std::str::from_utf8(&bytes).unwrap();
/// assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
/// assert!(text.contains("Content-Type: application/octet-stream\r\n"));
/// assert!(text.ends_with("Content-Length: 3\r\n\r\n630"));
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Bytes,
    keep_alive: bool,
}

impl Response {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Bytes::new(),
            keep_alive: true,
        }
    }

    /// Creates a plain-text error response whose body is `message`.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::new(status)
            .content_type(TEXT_PLAIN)
            .header("X-Content-Type-Options", "nosniff")
            .body(message)
    }

    /// Appends a response header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets `Content-Type`, replacing any previous value.
    #[must_use]
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.headers.set("Content-Type", value);
        self
    }

    /// Sets the response body.
    ///
    /// `Content-Length` is written by [`into_bytes`](Self::into_bytes).
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Chooses between `Connection: keep-alive` and `Connection: close`.
    #[must_use]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Serializes the response in HTTP/1.1 wire format.
    ///
    /// Adds `Content-Type: text/plain; charset=utf-8` when a body is present
    /// without a type, and always writes `Connection` and `Content-Length`.
    pub fn into_bytes(mut self) -> BytesMut {
        let content_length = self.body.len();

        if !self.body.is_empty() && !self.headers.contains("content-type") {
            self.headers.insert("Content-Type", TEXT_PLAIN);
        }

        let connection = if self.keep_alive {
            "keep-alive"
        } else {
            "close"
        };
        self.headers.set("Connection", connection);

        let mut buf = BytesMut::with_capacity(128 + self.headers.len() * 64 + content_length);

        buf.put(
            format!(
                "HTTP/1.1 {} {}\r\n",
                self.status.as_u16(),
                self.status.canonical_reason()
            )
            .as_bytes(),
        );
        buf.put(self.headers.to_string().as_bytes());
        buf.put(format!("Content-Length: {content_length}\r\n\r\n").as_bytes());
        buf.put(self.body);

        buf
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::OCTET_STREAM;

    fn to_string(bytes: BytesMut) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn binary_body_keeps_declared_type() {
        let r = Response::new(StatusCode::Ok)
            .content_type(OCTET_STREAM)
            .body(vec![0u8, 159, 146, 150]);
        let bytes = r.into_bytes();
        assert!(bytes.ends_with(&[b'\n', 0, 159, 146, 150]));
        let head = String::from_utf8_lossy(&bytes);
        assert!(head.contains("Content-Type: application/octet-stream\r\n"));
        assert!(!head.contains("text/plain"));
        assert!(head.contains("Content-Length: 4\r\n"));
    }

    #[test]
    fn error_response_is_plain_text() {
        let r = Response::error(StatusCode::NotFound, "no such group: missing");
        assert_eq!(r.status(), StatusCode::NotFound);
        assert_eq!(r.body_bytes(), b"no such group: missing");
        let s = to_string(r.into_bytes());
        assert!(s.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(s.contains("Content-Type: text/plain; charset=utf-8\r\n"));
    }

    #[test]
    fn empty_body_has_no_content_type() {
        let s = to_string(Response::new(StatusCode::Ok).into_bytes());
        assert!(!s.contains("Content-Type"));
        assert!(s.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn connection_close() {
        let s = to_string(Response::new(StatusCode::Ok).keep_alive(false).into_bytes());
        assert!(s.contains("Connection: close\r\n"));
        assert!(!s.contains("keep-alive"));
    }
}
