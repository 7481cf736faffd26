//! Authority record types (SOA).

use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SOA record - Start of Authority (RFC 1035).
///
/// # Wire Format
///
/// ```text
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     MNAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     RNAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    SERIAL                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    REFRESH                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     RETRY                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    EXPIRE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    MINIMUM                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Soa {
    /// Primary name server for the zone.
    pub mname: Name,
    /// Mailbox of the responsible person, first label being the local part.
    pub rname: Name,
    /// Zone serial number.
    pub serial: u32,
    /// Refresh interval (seconds).
    pub refresh: u32,
    /// Retry interval (seconds).
    pub retry: u32,
    /// Expire time (seconds).
    pub expire: u32,
    /// Minimum TTL / negative caching TTL (seconds).
    pub minimum: u32,
}

/// Size of the five fixed 32-bit fields after the two names.
const SOA_FIXED_LEN: usize = 20;

impl Soa {
    /// Parses SOA RDATA at `offset`.
    ///
    /// Both names may be compressed; the returned count is the bytes actually
    /// consumed at `offset`.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let parser = NameParser::new(message);

        let (mname, mname_len) = parser.parse_name(offset)?;
        let (rname, rname_len) = parser.parse_name(offset + mname_len)?;

        let mut reader = WireReader::at(message, offset + mname_len + rname_len);
        let soa = Self {
            mname,
            rname,
            serial: reader.read_u32()?,
            refresh: reader.read_u32()?,
            retry: reader.read_u32()?,
            expire: reader.read_u32()?,
            minimum: reader.read_u32()?,
        };

        Ok((soa, mname_len + rname_len + SOA_FIXED_LEN))
    }

    /// Returns the uncompressed wire format length.
    pub fn wire_len(&self) -> usize {
        self.mname.wire_len() + self.rname.wire_len() + SOA_FIXED_LEN
    }

    /// Writes the SOA record to wire format.
    pub fn write_to(&self, writer: &mut WireWriter) {
        self.mname.write_wire(writer);
        self.rname.write_wire(writer);
        writer.write_u32(self.serial);
        writer.write_u32(self.refresh);
        writer.write_u32(self.retry);
        writer.write_u32(self.expire);
        writer.write_u32(self.minimum);
    }
}

impl fmt::Display for Soa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname,
            self.rname,
            self.serial,
            self.refresh,
            self.retry,
            self.expire,
            self.minimum
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::str::FromStr;

    fn sample() -> Soa {
        Soa {
            mname: Name::from_str("ns1.example.com").unwrap(),
            rname: Name::from_str("hostmaster.example.com").unwrap(),
            serial: 2024010101,
            refresh: 3600,
            retry: 900,
            expire: 604800,
            minimum: 86400,
        }
    }

    #[test]
    fn test_soa_parse_uncompressed() {
        let soa = sample();
        let mut writer = WireWriter::new(soa.wire_len());
        soa.write_to(&mut writer);

        let (parsed, consumed) = Soa::parse(writer.as_bytes(), 0).unwrap();
        assert_eq!(parsed, soa);
        assert_eq!(consumed, soa.wire_len());
    }

    #[test]
    fn test_soa_parse_compressed() {
        // example.com at 0; SOA rdata at 13 uses pointers into it.
        let mut wire = b"\x07example\x03com\x00".to_vec();
        wire.extend_from_slice(b"\x03ns1\xC0\x00");
        wire.extend_from_slice(b"\x0Ahostmaster\xC0\x00");
        for value in [1u32, 2, 3, 4, 5] {
            wire.extend_from_slice(&value.to_be_bytes());
        }

        let (soa, consumed) = Soa::parse(&wire, 13).unwrap();
        assert_eq!(soa.mname.to_dotted(), "ns1.example.com");
        assert_eq!(soa.rname.to_dotted(), "hostmaster.example.com");
        assert_eq!(soa.minimum, 5);
        assert_eq!(consumed, wire.len() - 13);
    }

    #[test]
    fn test_soa_truncated_counters() {
        let soa = sample();
        let mut writer = WireWriter::new(soa.wire_len());
        soa.write_to(&mut writer);
        let wire = writer.as_bytes();

        assert!(matches!(
            Soa::parse(&wire[..wire.len() - 1], 0),
            Err(Error::TruncatedBuffer { .. })
        ));
    }

    #[test]
    fn test_soa_display() {
        assert_eq!(
            sample().to_string(),
            "ns1.example.com hostmaster.example.com 2024010101 3600 900 604800 86400"
        );
    }
}
