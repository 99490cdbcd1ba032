//! Read-only view over a cached byte payload.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

use super::Value;

/// An immutable byte payload stored in the cache.
///
/// The payload is never handed out by reference. [`byte_slice`](Self::byte_slice)
/// returns a fresh copy on every call, so callers cannot mutate a cached value
/// through aliasing. Cloning a `ByteView` is cheap: the underlying [`Bytes`]
/// buffer is reference counted and never written to after construction.
///
/// # Examples
///
/// ```
/// use geecache::cache::ByteView;
///
/// let view = ByteView::from("630");
/// assert_eq!(view.len(), 3);
/// assert_eq!(view.to_string(), "630");
///
/// let mut copy = view.byte_slice();
/// copy[0] = b'9';
/// assert_eq!(view.byte_slice(), b"630");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Copies `data` into a new view.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(data),
        }
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns a newly allocated copy of the payload.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Returns the payload as text, replacing invalid UTF-8 sequences.
    pub fn as_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl Value for ByteView {
    fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(data: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(data),
        }
    }
}

impl From<&[u8]> for ByteView {
    fn from(data: &[u8]) -> Self {
        Self::copy_from_slice(data)
    }
}

impl From<&str> for ByteView {
    fn from(data: &str) -> Self {
        Self::copy_from_slice(data.as_bytes())
    }
}

impl From<String> for ByteView {
    fn from(data: String) -> Self {
        Self::from(data.into_bytes())
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_counts_bytes() {
        assert_eq!(ByteView::from("héllo").len(), 6);
        assert!(ByteView::default().is_empty());
    }

    #[test]
    fn byte_slice_never_aliases() {
        let view = ByteView::from("630");
        let mut first = view.byte_slice();
        let second = view.byte_slice();

        first[0] = b'x';
        first.push(b'!');

        assert_eq!(second, b"630");
        assert_eq!(view.byte_slice(), b"630");
    }

    #[test]
    fn copy_from_slice_detaches_from_source() {
        let mut source = b"abc".to_vec();
        let view = ByteView::copy_from_slice(&source);
        source[0] = b'z';
        assert_eq!(view.to_string(), "abc");
    }

    #[test]
    fn lossy_text_for_invalid_utf8() {
        let view = ByteView::from(vec![b'o', b'k', 0xff]);
        assert_eq!(view.as_str_lossy(), "ok\u{fffd}");
    }
}
