//! DNS record types.
//!
//! The codec interprets a fixed set of record types (RFC 1035, RFC 3596);
//! every other type value is carried as [`Type::Unknown`] and its data passes
//! through opaque.

use crate::error::{Error, Result};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DNS record type understood by the codec.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
pub enum RecordType {
    /// IPv4 address - RFC 1035
    A = 1,

    /// Authoritative name server - RFC 1035
    NS = 2,

    /// Canonical name (alias) - RFC 1035
    CNAME = 5,

    /// Start of authority - RFC 1035
    SOA = 6,

    /// Domain name pointer - RFC 1035
    PTR = 12,

    /// IPv6 address - RFC 3596
    AAAA = 28,
}

/// Mnemonic lookup table, in the order the CLI lists them.
const MNEMONICS: [(&str, RecordType); 6] = [
    ("A", RecordType::A),
    ("AAAA", RecordType::AAAA),
    ("PTR", RecordType::PTR),
    ("CNAME", RecordType::CNAME),
    ("NS", RecordType::NS),
    ("SOA", RecordType::SOA),
];

impl RecordType {
    /// Returns the numeric value of the record type.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Creates a record type from its numeric value.
    #[inline]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Looks up a record type by mnemonic, ignoring ASCII case.
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        MNEMONICS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, rtype)| rtype)
    }

    /// Returns every supported record type.
    pub fn all() -> impl Iterator<Item = Self> {
        MNEMONICS.iter().map(|&(_, rtype)| rtype)
    }

    /// Returns true if this type's RDATA is a single domain name.
    #[inline]
    pub const fn has_name_rdata(self) -> bool {
        matches!(self, Self::NS | Self::CNAME | Self::PTR)
    }

    /// Returns the RDATA length this type requires, if it is fixed.
    #[inline]
    pub const fn fixed_length(self) -> Option<usize> {
        match self {
            Self::A => Some(4),
            Self::AAAA => Some(16),
            _ => None,
        }
    }

    /// Returns the mnemonic of the record type.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::PTR => "PTR",
            Self::AAAA => "AAAA",
        }
    }

    /// Returns a description of the record type.
    #[inline]
    pub const fn description(self) -> &'static str {
        match self {
            Self::A => "IPv4 address",
            Self::NS => "Name server",
            Self::CNAME => "Canonical name (alias)",
            Self::SOA => "Start of authority",
            Self::PTR => "Pointer record (reverse DNS)",
            Self::AAAA => "IPv6 address",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for RecordType {
    fn default() -> Self {
        Self::A
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_mnemonic(s).ok_or_else(|| {
            Error::malformed_record(s, "unsupported record type mnemonic")
        })
    }
}

/// A type value that can represent both supported types and unknown values.
///
/// Unknown values are kept verbatim so records of any type can be decoded
/// and re-encoded without loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
    /// A supported record type.
    Known(RecordType),
    /// An unknown type value (TYPE#### format per RFC 3597).
    Unknown(u16),
}

impl Type {
    /// Creates a type from a u16 value.
    #[inline]
    pub fn from_u16(value: u16) -> Self {
        RecordType::from_u16(value)
            .map(Self::Known)
            .unwrap_or(Self::Unknown(value))
    }

    /// Returns the numeric value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Known(t) => t.to_u16(),
            Self::Unknown(v) => v,
        }
    }

    /// Returns the supported type if known.
    #[inline]
    pub const fn as_known(self) -> Option<RecordType> {
        match self {
            Self::Known(t) => Some(t),
            Self::Unknown(_) => None,
        }
    }

    /// Returns true if this is an A record type.
    #[inline]
    pub const fn is_a(self) -> bool {
        matches!(self, Self::Known(RecordType::A))
    }
}

impl From<RecordType> for Type {
    fn from(t: RecordType) -> Self {
        Self::Known(t)
    }
}

impl From<u16> for Type {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(t) => write!(f, "{t}"),
            Self::Unknown(v) => write!(f, "TYPE{v}"),
        }
    }
}

impl Default for Type {
    fn default() -> Self {
        Self::Known(RecordType::A)
    }
}
