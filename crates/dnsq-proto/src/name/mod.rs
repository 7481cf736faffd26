//! DNS domain name representation and operations.
//!
//! This module covers both directions of the name codec:
//!
//! - Encoding a dotted name into length-prefixed wire labels ([`Name::from_str`],
//!   [`encode`])
//! - Decoding wire labels, following compression pointers, back into a dotted
//!   name ([`NameParser`], [`decode`])

mod label;
mod parse;

pub use label::{Label, LabelIter};
pub use parse::{NameParser, MAX_COMPRESSION_JUMPS};

use crate::error::{Error, Result};
use crate::wire::WireWriter;
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A DNS domain name.
///
/// # Wire Format
///
/// A name is a sequence of labels, each prefixed by a length byte,
/// terminated by a zero-length label (the root). `www.example.com` is:
///
/// ```text
/// 03 'w' 'w' 'w' 07 'e' 'x' 'a' 'm' 'p' 'l' 'e' 03 'c' 'o' 'm' 00
/// ```
///
/// The stored form is always uncompressed and always ends with the root
/// byte, so it can be written to a message as-is.
///
/// # Comparison Semantics
///
/// DNS names are compared case-insensitively per RFC 1035.
///
/// # Example
///
/// ```rust
/// use dnsq_proto::name::Name;
/// use std::str::FromStr;
///
/// let name = Name::from_str("www.example.com").unwrap();
/// assert_eq!(name.label_count(), 3);
/// assert_eq!(name.wire_len(), 17);
/// assert_eq!(Name::from_str("WWW.EXAMPLE.COM.").unwrap(), name);
/// ```
#[derive(Clone)]
pub struct Name {
    /// Uncompressed wire form, including the terminating zero byte.
    wire: SmallVec<[u8; 64]>,
}

impl Name {
    /// Creates the root name.
    #[inline]
    pub fn root() -> Self {
        let mut wire = SmallVec::new();
        wire.push(0);
        Self { wire }
    }

    /// Wraps wire bytes already validated by the caller.
    #[inline]
    pub(crate) fn from_validated_wire(wire: SmallVec<[u8; 64]>) -> Self {
        debug_assert_eq!(wire.last(), Some(&0));
        Self { wire }
    }

    /// Returns the wire format representation.
    #[inline]
    pub fn as_wire(&self) -> &[u8] {
        &self.wire
    }

    /// Returns the wire format length (including terminating zero).
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.wire.len()
    }

    /// Returns the number of labels, not counting the root.
    #[inline]
    pub fn label_count(&self) -> usize {
        self.labels().count()
    }

    /// Returns true if this is the root domain.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.wire.as_slice() == [0]
    }

    /// Returns an iterator over the non-root labels of the name.
    #[inline]
    pub fn labels(&self) -> LabelIter<'_> {
        LabelIter::new(&self.wire)
    }

    /// Returns the dotted form without a trailing dot; the root is `""`.
    ///
    /// Label bytes are copied as-is, so the result encodes back to the same
    /// wire form. Use [`Display`](fmt::Display) for an escaped rendering.
    pub fn to_dotted(&self) -> String {
        let mut out = String::with_capacity(self.wire.len());
        for (i, label) in self.labels().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&String::from_utf8_lossy(label.as_bytes()));
        }
        out
    }

    /// Returns true if this name ends with `suffix` (label-wise,
    /// case-insensitive).
    pub fn ends_with(&self, suffix: &Name) -> bool {
        let ours: SmallVec<[Label<'_>; 16]> = self.labels().collect();
        let theirs: SmallVec<[Label<'_>; 16]> = suffix.labels().collect();
        theirs.len() <= ours.len()
            && ours
                .iter()
                .rev()
                .zip(theirs.iter().rev())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Writes the name in wire format.
    #[inline]
    pub fn write_wire(&self, writer: &mut WireWriter) {
        writer.write_bytes(&self.wire);
    }
}

impl FromStr for Name {
    type Err = Error;

    /// Encodes a dotted name.
    ///
    /// A single trailing dot is accepted. Labels longer than 63 bytes or an
    /// encoded form longer than 255 bytes fail with [`Error::NameTooLong`];
    /// an empty label anywhere else fails with [`Error::MalformedName`].
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s == "." {
            return Ok(Self::root());
        }

        let trimmed = s.strip_suffix('.').unwrap_or(s);
        let mut wire = SmallVec::<[u8; 64]>::with_capacity(trimmed.len() + 2);
        let mut position = 0;

        for part in trimmed.split('.') {
            if part.is_empty() {
                return Err(Error::malformed_name(position, "empty label"));
            }
            if part.len() > MAX_LABEL_LENGTH {
                return Err(Error::name_too_long(part.len(), MAX_LABEL_LENGTH));
            }

            wire.push(part.len() as u8);
            wire.extend_from_slice(part.as_bytes());
            position += part.len() + 1;
        }

        wire.push(0);

        if wire.len() > MAX_NAME_LENGTH {
            return Err(Error::name_too_long(wire.len(), MAX_NAME_LENGTH));
        }

        Ok(Self { wire })
    }
}

/// Encodes a dotted name to wire labels.
///
/// `""` encodes to the single root byte.
pub fn encode(name: &str) -> Result<Vec<u8>> {
    Name::from_str(name).map(|n| n.as_wire().to_vec())
}

/// Decodes a possibly-compressed name at `offset` in `buffer`.
///
/// Returns the dotted name and the number of bytes consumed at `offset`:
/// exactly 2 once a compression pointer is reached, regardless of how much
/// is read at the pointer's target.
pub fn decode(buffer: &[u8], offset: usize) -> Result<(String, usize)> {
    NameParser::new(buffer)
        .parse_name(offset)
        .map(|(name, consumed)| (name.to_dotted(), consumed))
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for (i, label) in self.labels().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{label}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(\"{self}\")")
    }
}

impl PartialEq for Name {
    /// Case-insensitive comparison per DNS semantics.
    fn eq(&self, other: &Self) -> bool {
        self.wire.eq_ignore_ascii_case(&other.wire)
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in &self.wire {
            byte.to_ascii_lowercase().hash(state);
        }
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::root()
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_dotted())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_name() {
        let root = Name::root();
        assert!(root.is_root());
        assert_eq!(root.label_count(), 0);
        assert_eq!(root.to_dotted(), "");
        assert_eq!(root.to_string(), ".");
        assert_eq!(encode("").unwrap(), vec![0]);
        assert_eq!(Name::from_str(".").unwrap(), root);
    }

    #[test]
    fn test_encode() {
        assert_eq!(
            encode("www.example.com").unwrap(),
            b"\x03www\x07example\x03com\x00".to_vec()
        );
        // Trailing dot is the same name.
        assert_eq!(encode("example.com.").unwrap(), encode("example.com").unwrap());
    }

    #[test]
    fn test_decode_returns_raw_label_text() {
        for input in ["a\\b.com", "a\tb.com", "under_score.example", "sp ace.org"] {
            let wire = encode(input).unwrap();
            let (decoded, consumed) = decode(&wire, 0).unwrap();
            assert_eq!(decoded, input);
            assert_eq!(consumed, wire.len());
            assert_eq!(encode(&decoded).unwrap(), wire);
        }
    }

    #[test]
    fn test_display_escapes() {
        let name = Name::from_str("a\\b.x\ty").unwrap();
        assert_eq!(name.to_dotted(), "a\\b.x\ty");
        assert_eq!(name.to_string(), "a\\\\b.x\\009y");
    }

    #[test]
    fn test_case_insensitive_comparison() {
        let lower = Name::from_str("www.example.com").unwrap();
        let upper = Name::from_str("WWW.EXAMPLE.COM").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.to_dotted(), "WWW.EXAMPLE.COM");
    }

    #[test]
    fn test_label_too_long() {
        let long_label = "a".repeat(64);
        assert_eq!(
            Name::from_str(&long_label),
            Err(Error::NameTooLong {
                length: 64,
                max: 63
            })
        );
        assert!(Name::from_str(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn test_name_too_long() {
        // 4 labels of 63 bytes: 4 * 64 + 1 = 257 bytes encoded.
        let label = "a".repeat(63);
        let name = [label.as_str(); 4].join(".");
        assert!(matches!(
            Name::from_str(&name),
            Err(Error::NameTooLong { length: 257, max: 255 })
        ));

        // 3 * 64 + 62 + 1 = 255 bytes exactly.
        let name = format!("{label}.{label}.{label}.{}", "b".repeat(61));
        assert_eq!(Name::from_str(&name).unwrap().wire_len(), 255);
    }

    #[test]
    fn test_empty_label_rejected() {
        assert!(matches!(
            Name::from_str("a..b"),
            Err(Error::MalformedName { offset: 2, .. })
        ));
        assert!(matches!(
            Name::from_str(".example"),
            Err(Error::MalformedName { offset: 0, .. })
        ));
    }

    #[test]
    fn test_ends_with() {
        let name = Name::from_str("10.1.168.192.in-addr.arpa").unwrap();
        assert!(name.ends_with(&Name::from_str("IN-ADDR.ARPA").unwrap()));
        assert!(name.ends_with(&Name::root()));
        assert!(!name.ends_with(&Name::from_str("ip6.arpa").unwrap()));
        assert!(!Name::from_str("arpa").unwrap().ends_with(&name));
    }

    #[test]
    fn test_serde_as_dotted_string() {
        let name = Name::from_str("example.com").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"example.com\"");
        let back: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
