//! DNS record data (RDATA) types.
//!
//! The data field is interpreted according to the record's declared type:
//!
//! - **Address records**: A, AAAA
//! - **Name records**: NS, CNAME, PTR
//! - **Authority records**: SOA
//! - everything else is kept as opaque bytes ([`Unknown`])

pub mod address;
pub mod authority;
pub mod unknown;

pub use authority::Soa;
pub use unknown::Unknown;

use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::rtype::{RecordType, Type};
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// DNS record data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RData {
    /// IPv4 address (A record)
    A(Ipv4Addr),

    /// IPv6 address (AAAA record)
    AAAA(Ipv6Addr),

    /// Name server (NS record)
    NS(Name),

    /// Canonical name (CNAME record)
    CNAME(Name),

    /// Pointer (PTR record)
    PTR(Name),

    /// Start of authority (SOA record)
    SOA(Soa),

    /// Any other record type, preserved as raw bytes
    Unknown(Unknown),
}

impl RData {
    /// Parses RDATA from wire format.
    ///
    /// Returns the data and the number of bytes consumed at `offset`.
    ///
    /// # Arguments
    ///
    /// * `rtype` - The record type
    /// * `message` - The complete message (for name compression)
    /// * `offset` - Offset to the start of the RDATA
    /// * `rd_length` - Declared length of the RDATA
    ///
    /// For name-bearing types the consumed count comes from the name decoder
    /// and may differ from `rd_length`; only opaque data is sized by it.
    pub fn parse(
        rtype: Type,
        message: &[u8],
        offset: usize,
        rd_length: u16,
    ) -> Result<(Self, usize)> {
        let Type::Known(known) = rtype else {
            return Self::parse_opaque(rtype.to_u16(), message, offset, rd_length);
        };

        match known {
            RecordType::A => Ok((
                Self::A(address::parse_a(message, offset, rd_length)?),
                usize::from(rd_length),
            )),
            RecordType::AAAA => Ok((
                Self::AAAA(address::parse_aaaa(message, offset, rd_length)?),
                usize::from(rd_length),
            )),
            RecordType::NS | RecordType::CNAME | RecordType::PTR => {
                let (target, consumed) = NameParser::new(message).parse_name(offset)?;
                let rdata = match known {
                    RecordType::NS => Self::NS(target),
                    RecordType::CNAME => Self::CNAME(target),
                    _ => Self::PTR(target),
                };
                Ok((rdata, consumed))
            }
            RecordType::SOA => {
                let (soa, consumed) = Soa::parse(message, offset)?;
                Ok((Self::SOA(soa), consumed))
            }
        }
    }

    fn parse_opaque(
        type_code: u16,
        message: &[u8],
        offset: usize,
        rd_length: u16,
    ) -> Result<(Self, usize)> {
        let data = WireReader::at(message, offset).read_bytes(usize::from(rd_length))?;
        Ok((Self::Unknown(Unknown::new(type_code, data)), data.len()))
    }

    /// Returns the record type for this RDATA.
    pub fn record_type(&self) -> Type {
        match self {
            Self::A(_) => RecordType::A.into(),
            Self::AAAA(_) => RecordType::AAAA.into(),
            Self::NS(_) => RecordType::NS.into(),
            Self::CNAME(_) => RecordType::CNAME.into(),
            Self::PTR(_) => RecordType::PTR.into(),
            Self::SOA(_) => RecordType::SOA.into(),
            Self::Unknown(u) => Type::from_u16(u.type_code()),
        }
    }

    /// Returns the uncompressed wire format length of this RDATA.
    pub fn wire_len(&self) -> usize {
        match self {
            Self::A(_) => 4,
            Self::AAAA(_) => 16,
            Self::NS(n) | Self::CNAME(n) | Self::PTR(n) => n.wire_len(),
            Self::SOA(soa) => soa.wire_len(),
            Self::Unknown(u) => u.wire_len(),
        }
    }

    /// Writes this RDATA to wire format, without compression.
    pub fn write_to(&self, writer: &mut WireWriter) {
        match self {
            Self::A(addr) => writer.write_bytes(&addr.octets()),
            Self::AAAA(addr) => writer.write_bytes(&addr.octets()),
            Self::NS(n) | Self::CNAME(n) | Self::PTR(n) => n.write_wire(writer),
            Self::SOA(soa) => soa.write_to(writer),
            Self::Unknown(u) => u.write_to(writer),
        }
    }

    /// Returns the IPv4 address if this is an A record.
    pub fn as_a(&self) -> Option<Ipv4Addr> {
        match self {
            Self::A(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Returns the IPv6 address if this is an AAAA record.
    pub fn as_aaaa(&self) -> Option<Ipv6Addr> {
        match self {
            Self::AAAA(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Returns the embedded name for NS, CNAME and PTR records.
    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Self::NS(n) | Self::CNAME(n) | Self::PTR(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(addr) => write!(f, "{addr}"),
            Self::AAAA(addr) => write!(f, "{addr}"),
            Self::NS(n) | Self::CNAME(n) | Self::PTR(n) => f.write_str(&n.to_dotted()),
            Self::SOA(soa) => write!(f, "{soa}"),
            Self::Unknown(u) => write!(f, "{u}"),
        }
    }
}
