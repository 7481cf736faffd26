//! DNS label handling.
//!
//! A label is a single component of a domain name, up to 63 bytes.

use std::fmt;

/// A single DNS label (component of a domain name), borrowed from the
/// name's wire form without its length prefix.
#[derive(Clone, Copy)]
pub struct Label<'a> {
    bytes: &'a [u8],
}

impl<'a> Label<'a> {
    /// Creates a label from a byte slice.
    #[inline]
    pub const fn from_bytes(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes of the label.
    #[inline]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns the length of the label in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the label has no bytes.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the label as a string, if it's valid UTF-8.
    #[inline]
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.bytes).ok()
    }

    /// Case-insensitive comparison with another label.
    #[inline]
    pub fn eq_ignore_ascii_case(&self, other: &Label<'_>) -> bool {
        self.bytes.eq_ignore_ascii_case(other.bytes)
    }
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.bytes {
            if byte == b'.' || byte == b'\\' {
                write!(f, "\\{}", byte as char)?;
            } else if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\{byte:03}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label(\"{self}\")")
    }
}

impl PartialEq for Label<'_> {
    /// Case-insensitive equality per DNS semantics.
    fn eq(&self, other: &Self) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl Eq for Label<'_> {}

/// Iterator over the non-root labels of an uncompressed wire-format name.
pub struct LabelIter<'a> {
    wire: &'a [u8],
    pos: usize,
}

impl<'a> LabelIter<'a> {
    /// Creates a new label iterator from wire format bytes.
    #[inline]
    pub const fn new(wire: &'a [u8]) -> Self {
        Self { wire, pos: 0 }
    }
}

impl<'a> Iterator for LabelIter<'a> {
    type Item = Label<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = *self.wire.get(self.pos)? as usize;
        if len == 0 {
            return None;
        }

        let start = self.pos + 1;
        let label = self.wire.get(start..start + len)?;
        self.pos = start + len;
        Some(Label::from_bytes(label))
    }
}

impl std::iter::FusedIterator for LabelIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_basics() {
        let label = Label::from_bytes(b"example");
        assert_eq!(label.len(), 7);
        assert!(!label.is_empty());
        assert_eq!(label.as_str(), Some("example"));
        assert_eq!(label.to_string(), "example");
    }

    #[test]
    fn test_label_escaping() {
        assert_eq!(Label::from_bytes(b"a.b").to_string(), "a\\.b");
        assert_eq!(Label::from_bytes(b"a\\b").to_string(), "a\\\\b");
        assert_eq!(Label::from_bytes(&[b'x', 0x07]).to_string(), "x\\007");
    }

    #[test]
    fn test_case_insensitive_comparison() {
        let lower = Label::from_bytes(b"example");
        let upper = Label::from_bytes(b"EXAMPLE");
        assert_eq!(lower, upper);
        assert_ne!(lower, Label::from_bytes(b"exampl"));
    }

    #[test]
    fn test_label_iteration() {
        let wire = [3, b'w', b'w', b'w', 3, b'c', b'o', b'm', 0];
        let labels: Vec<String> = LabelIter::new(&wire).map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["www", "com"]);

        assert_eq!(LabelIter::new(&[0]).count(), 0);
        // Truncated label stops iteration instead of panicking.
        assert_eq!(LabelIter::new(&[5, b'a']).count(), 0);
    }
}
