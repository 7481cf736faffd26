//! DNS operation codes (OpCodes).
//!
//! OpCodes specify the kind of query in a DNS message header.
//! Defined in RFC 1035 Section 4.1.1 with extensions from subsequent RFCs.

use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};

/// DNS operation code.
///
/// The header field is 4 bits wide. Values without an assigned meaning are
/// kept as [`OpCode::Unassigned`] so a decoded header can be reproduced
/// exactly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    FromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum OpCode {
    /// Standard query (QUERY) - RFC 1035
    Query = 0,

    /// Inverse query (IQUERY) - RFC 1035, obsoleted by RFC 3425
    IQuery = 1,

    /// Server status request (STATUS) - RFC 1035
    Status = 2,

    /// Notify - RFC 1996
    Notify = 4,

    /// Update - RFC 2136
    Update = 5,

    /// DNS Stateful Operations (DSO) - RFC 8490
    Dso = 6,

    /// Any other 4-bit value.
    #[num_enum(catch_all)]
    Unassigned(u8),
}

impl OpCode {
    /// Returns the numeric value of the opcode.
    #[inline]
    pub fn to_u8(self) -> u8 {
        self.into()
    }

    /// Creates an opcode from the low 4 bits of `value`.
    #[inline]
    pub fn from_u8(value: u8) -> Self {
        Self::from_primitive(value & 0x0F)
    }

    /// Returns the human-readable name of the opcode, if assigned.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Self::Query => Some("QUERY"),
            Self::IQuery => Some("IQUERY"),
            Self::Status => Some("STATUS"),
            Self::Notify => Some("NOTIFY"),
            Self::Update => Some("UPDATE"),
            Self::Dso => Some("DSO"),
            Self::Unassigned(_) => None,
        }
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "OPCODE{}", self.to_u8()),
        }
    }
}

impl Default for OpCode {
    fn default() -> Self {
        Self::Query
    }
}
