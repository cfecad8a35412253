//! Opaque byte-offset source positions carried by diagnostics.

use serde::{Deserialize, Serialize};

/// A byte offset range locating a diagnostic in host source text.
///
/// The layer treats spans as opaque tokens: they are created by the host's
/// analysis passes and carried through reclassification unchanged. The
/// `start` is inclusive and `end` is exclusive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the start of the span (inclusive).
    pub start: u32,
    /// Byte offset of the end of the span (exclusive).
    pub end: u32,
}

impl Span {
    /// A dummy span used when no source location is available.
    pub const DUMMY: Span = Span {
        start: u32::MAX,
        end: u32::MAX,
    };

    /// Creates a new span with the given byte range.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` if this span has zero length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if this is the dummy span.
    pub fn is_dummy(&self) -> bool {
        *self == Span::DUMMY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct() {
        let s = Span::new(10, 20);
        assert_eq!(s.start, 10);
        assert_eq!(s.end, 20);
        assert_eq!(s.len(), 10);
        assert!(!s.is_empty());
        assert!(!s.is_dummy());
    }

    #[test]
    fn dummy() {
        assert!(Span::DUMMY.is_dummy());
        assert!(!Span::new(0, 0).is_dummy());
    }

    #[test]
    fn serde_roundtrip() {
        let s = Span::new(3, 7);
        let json = serde_json::to_string(&s).unwrap();
        let back: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
