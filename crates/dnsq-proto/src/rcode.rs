//! DNS response codes (RCODEs).
//!
//! Only the 4-bit header RCODE is modelled; extended codes need EDNS0.

use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};

/// DNS response code from the message header.
///
/// See RFC 1035 Section 4.1.1 and RFC 2136.
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
pub enum ResponseCode {
    /// No error condition - RFC 1035
    NoError = 0,

    /// Format error - RFC 1035
    ///
    /// The name server was unable to interpret the query.
    FormErr = 1,

    /// Server failure - RFC 1035
    ServFail = 2,

    /// Name error - RFC 1035
    ///
    /// The domain name referenced in the query does not exist.
    NXDomain = 3,

    /// Not implemented - RFC 1035
    NotImp = 4,

    /// Query refused - RFC 1035
    Refused = 5,

    /// Name exists when it should not - RFC 2136
    YXDomain = 6,

    /// RR set exists when it should not - RFC 2136
    YXRRSet = 7,

    /// RR set that should exist does not - RFC 2136
    NXRRSet = 8,

    /// Server not authoritative for zone - RFC 2136
    NotAuth = 9,

    /// Name not contained in zone - RFC 2136
    NotZone = 10,

    /// DSO-TYPE not implemented - RFC 8490
    DsoTypeNI = 11,

    /// Any other 4-bit value.
    #[num_enum(catch_all)]
    Unassigned(u8),
}

impl ResponseCode {
    /// Returns the numeric value of the response code.
    #[inline]
    pub fn to_u8(self) -> u8 {
        self.into()
    }

    /// Creates a response code from the low 4 bits of `value`.
    #[inline]
    pub fn from_header(value: u8) -> Self {
        Self::from_primitive(value & 0x0F)
    }

    /// Returns true if this response indicates success.
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::NoError)
    }

    /// Returns true if this response indicates the name does not exist.
    #[inline]
    pub const fn is_nxdomain(self) -> bool {
        matches!(self, Self::NXDomain)
    }

    /// Returns the human-readable name of the response code, if assigned.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Self::NoError => Some("NOERROR"),
            Self::FormErr => Some("FORMERR"),
            Self::ServFail => Some("SERVFAIL"),
            Self::NXDomain => Some("NXDOMAIN"),
            Self::NotImp => Some("NOTIMP"),
            Self::Refused => Some("REFUSED"),
            Self::YXDomain => Some("YXDOMAIN"),
            Self::YXRRSet => Some("YXRRSET"),
            Self::NXRRSet => Some("NXRRSET"),
            Self::NotAuth => Some("NOTAUTH"),
            Self::NotZone => Some("NOTZONE"),
            Self::DsoTypeNI => Some("DSOTYPENI"),
            Self::Unassigned(_) => None,
        }
    }

    /// Returns a description of the response code.
    #[inline]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NoError => "No error condition",
            Self::FormErr => "Format error - unable to interpret query",
            Self::ServFail => "Server failure - unable to process query",
            Self::NXDomain => "Non-existent domain",
            Self::NotImp => "Not implemented",
            Self::Refused => "Query refused",
            Self::YXDomain => "Name exists when it should not",
            Self::YXRRSet => "RR set exists when it should not",
            Self::NXRRSet => "RR set that should exist does not",
            Self::NotAuth => "Not authoritative",
            Self::NotZone => "Name not contained in zone",
            Self::DsoTypeNI => "DSO-TYPE not implemented",
            Self::Unassigned(_) => "Unassigned response code",
        }
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "RCODE{}", self.to_u8()),
        }
    }
}

impl Default for ResponseCode {
    fn default() -> Self {
        Self::NoError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rcode_values() {
        assert_eq!(ResponseCode::NoError.to_u8(), 0);
        assert_eq!(ResponseCode::FormErr.to_u8(), 1);
        assert_eq!(ResponseCode::ServFail.to_u8(), 2);
        assert_eq!(ResponseCode::NXDomain.to_u8(), 3);
        assert_eq!(ResponseCode::DsoTypeNI.to_u8(), 11);
    }

    #[test]
    fn test_rcode_from_header() {
        assert_eq!(ResponseCode::from_header(3), ResponseCode::NXDomain);
        // Only the low nibble belongs to the RCODE.
        assert_eq!(ResponseCode::from_header(0x83), ResponseCode::NXDomain);
        assert_eq!(ResponseCode::from_header(12), ResponseCode::Unassigned(12));
        assert_eq!(ResponseCode::from_header(12).to_string(), "RCODE12");
    }

    #[test]
    fn test_rcode_predicates() {
        assert!(ResponseCode::NoError.is_success());
        assert!(!ResponseCode::NXDomain.is_success());
        assert!(ResponseCode::NXDomain.is_nxdomain());
    }
}
