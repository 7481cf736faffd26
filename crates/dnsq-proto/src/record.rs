//! DNS resource records.
//!
//! A resource record (RR) is the fundamental unit of DNS data,
//! containing a name, type, class, TTL, and record-specific data.

use crate::class::Class;
use crate::error::{Error, Result};
use crate::name::{Name, NameParser};
use crate::rdata::RData;
use crate::rtype::{RecordType, Type};
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

/// Size of TYPE, CLASS, TTL and RDLENGTH following the owner name.
const FIXED_FIELDS_LEN: usize = 10;

/// Smallest possible record on the wire: root owner name plus fixed fields.
pub(crate) const MIN_RECORD_LEN: usize = 1 + FIXED_FIELDS_LEN;

/// A DNS resource record.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                      NAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TYPE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     CLASS                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TTL                      |
/// |                                               |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                   RDLENGTH                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     RDATA                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// The domain name this record is for.
    name: Name,
    /// The record type.
    rtype: Type,
    /// The record class.
    rclass: Class,
    /// Time to live in seconds.
    ttl: u32,
    /// RDLENGTH as transmitted (or the uncompressed length when built locally).
    rd_length: u16,
    /// The record data.
    rdata: RData,
}

impl ResourceRecord {
    /// Creates a new resource record.
    ///
    /// Fails with [`Error::PayloadTooLarge`] if the data does not fit a
    /// 16-bit RDLENGTH.
    pub fn new(name: Name, rtype: Type, rclass: Class, ttl: u32, rdata: RData) -> Result<Self> {
        let len = rdata.wire_len();
        let rd_length = u16::try_from(len)
            .map_err(|_| Error::PayloadTooLarge {
                size: len,
                max: usize::from(u16::MAX),
            })?;

        Ok(Self {
            name,
            rtype,
            rclass,
            ttl,
            rd_length,
            rdata,
        })
    }

    /// Creates an IN-class record whose type is taken from its data.
    pub fn from_rdata(name: Name, ttl: u32, rdata: RData) -> Result<Self> {
        let rtype = rdata.record_type();
        Self::new(name, rtype, Class::IN, ttl, rdata)
    }

    /// Creates an A record.
    pub fn a(name: Name, ttl: u32, addr: Ipv4Addr) -> Self {
        Self {
            name,
            rtype: RecordType::A.into(),
            rclass: Class::IN,
            ttl,
            rd_length: 4,
            rdata: RData::A(addr),
        }
    }

    /// Creates an AAAA record.
    pub fn aaaa(name: Name, ttl: u32, addr: Ipv6Addr) -> Self {
        Self {
            name,
            rtype: RecordType::AAAA.into(),
            rclass: Class::IN,
            ttl,
            rd_length: 16,
            rdata: RData::AAAA(addr),
        }
    }

    /// Creates a CNAME record.
    pub fn cname(name: Name, ttl: u32, target: Name) -> Self {
        let rd_length = target.wire_len() as u16;
        Self {
            name,
            rtype: RecordType::CNAME.into(),
            rclass: Class::IN,
            ttl,
            rd_length,
            rdata: RData::CNAME(target),
        }
    }

    /// Returns the record name.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the record type.
    #[inline]
    pub fn rtype(&self) -> Type {
        self.rtype
    }

    /// Returns the record type if known.
    #[inline]
    pub fn record_type(&self) -> Option<RecordType> {
        self.rtype.as_known()
    }

    /// Returns the record class.
    #[inline]
    pub fn rclass(&self) -> Class {
        self.rclass
    }

    /// Returns the TTL in seconds.
    #[inline]
    pub const fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the TTL as a Duration.
    #[inline]
    pub fn ttl_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.ttl))
    }

    /// Returns the declared RDATA length.
    ///
    /// For name-bearing types this can exceed the bytes the data actually
    /// occupied once decoded; see [`RData::parse`].
    #[inline]
    pub const fn rd_length(&self) -> u16 {
        self.rd_length
    }

    /// Returns the record data.
    #[inline]
    pub fn rdata(&self) -> &RData {
        &self.rdata
    }

    /// Parses a resource record from wire format.
    ///
    /// Returns the record and the number of bytes consumed at `offset`.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (name, name_len) = NameParser::new(data).parse_name(offset)?;

        let mut reader = WireReader::at(data, offset + name_len);
        let rtype = Type::from_u16(reader.read_u16()?);
        let rclass = Class::from_u16(reader.read_u16()?);
        let ttl = reader.read_u32()?;
        let rd_length = reader.read_u16()?;

        let (rdata, rdata_len) = RData::parse(rtype, data, reader.position(), rd_length)?;

        let record = Self {
            name,
            rtype,
            rclass,
            ttl,
            rd_length,
            rdata,
        };
        Ok((record, name_len + FIXED_FIELDS_LEN + rdata_len))
    }

    /// Returns the uncompressed wire format length.
    pub fn wire_len(&self) -> usize {
        self.name.wire_len() + FIXED_FIELDS_LEN + self.rdata.wire_len()
    }

    /// Writes the resource record to wire format, without compression.
    ///
    /// RDLENGTH is recomputed from the data being written.
    pub fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        self.name.write_wire(writer);
        writer.write_u16(self.rtype.to_u16());
        writer.write_u16(self.rclass.to_u16());
        writer.write_u32(self.ttl);

        let length_at = writer.len();
        writer.write_u16(0);
        let start = writer.len();
        self.rdata.write_to(writer);
        let written = writer.len() - start;
        writer.write_u16_at(length_at, written as u16)
    }

    /// Converts the record to wire format bytes.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut writer = WireWriter::new(self.wire_len());
        self.write_to(&mut writer)?;
        Ok(writer.as_bytes().to_vec())
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, self.rclass, self.rtype, self.rdata
        )
    }
}

/// Parser for resource record sections.
///
/// Threads a single cursor through every record so that compressed names
/// never desynchronize the offset.
#[derive(Debug)]
pub struct RecordParser<'a> {
    /// The message data.
    data: &'a [u8],
    /// Current offset in the message.
    offset: usize,
    /// Number of records remaining.
    remaining: u16,
}

impl<'a> RecordParser<'a> {
    /// Creates a new record parser.
    #[inline]
    pub const fn new(data: &'a [u8], offset: usize, count: u16) -> Self {
        Self {
            data,
            offset,
            remaining: count,
        }
    }

    /// Returns the current offset.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of remaining records.
    #[inline]
    pub const fn remaining(&self) -> u16 {
        self.remaining
    }

    /// Parses the next record.
    pub fn next(&mut self) -> Result<Option<ResourceRecord>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let (record, consumed) = ResourceRecord::parse(self.data, self.offset)?;
        self.offset += consumed;
        self.remaining -= 1;

        Ok(Some(record))
    }

    /// Collects all remaining records into a vector.
    ///
    /// The up-front allocation is bounded by how many records the unread
    /// bytes could possibly hold.
    pub fn collect_all(&mut self) -> Result<Vec<ResourceRecord>> {
        let fit = self.data.len().saturating_sub(self.offset) / MIN_RECORD_LEN;
        let mut records = Vec::with_capacity(usize::from(self.remaining).min(fit));
        while let Some(r) = self.next()? {
            records.push(r);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdata::Unknown;
    use std::str::FromStr;

    #[test]
    fn test_resource_record_a() {
        let name = Name::from_str("example.com").unwrap();
        let rr = ResourceRecord::a(name.clone(), 300, Ipv4Addr::new(192, 0, 2, 1));

        assert_eq!(rr.name(), &name);
        assert_eq!(rr.record_type(), Some(RecordType::A));
        assert_eq!(rr.ttl(), 300);
        assert_eq!(rr.ttl_duration(), Duration::from_secs(300));
        assert_eq!(rr.rd_length(), 4);
        assert_eq!(rr.rdata().as_a(), Some(Ipv4Addr::new(192, 0, 2, 1)));
    }

    #[test]
    fn test_resource_record_roundtrip() {
        let name = Name::from_str("www.example.com").unwrap();
        let original = ResourceRecord::a(name, 3600, Ipv4Addr::new(10, 0, 0, 1));

        let wire = original.to_wire().unwrap();
        let (parsed, consumed) = ResourceRecord::parse(&wire, 0).unwrap();

        assert_eq!(consumed, wire.len());
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_compressed_cname_advances_by_consumed() {
        // Owner "example.com" at 0 inside a fake preamble, then a CNAME
        // record whose owner and target are both compressed.
        let mut wire = b"\x07example\x03com\x00".to_vec();
        wire.extend_from_slice(&[0xC0, 0x00]); // owner -> example.com
        wire.extend_from_slice(&[0x00, 0x05, 0x00, 0x01]); // CNAME IN
        wire.extend_from_slice(&60u32.to_be_bytes());
        wire.extend_from_slice(&[0x00, 0x06]); // rdlength
        wire.extend_from_slice(b"\x03www\xC0\x00");

        let (rr, consumed) = ResourceRecord::parse(&wire, 13).unwrap();
        assert_eq!(consumed, wire.len() - 13);
        assert_eq!(rr.name().to_dotted(), "example.com");
        assert_eq!(rr.rdata().to_string(), "www.example.com");
        assert_eq!(rr.rd_length(), 6);
    }

    #[test]
    fn test_unknown_type_passthrough() {
        let mut wire = vec![0x00]; // root owner
        wire.extend_from_slice(&[0x00, 0x10, 0x00, 0x01]); // TYPE16 IN
        wire.extend_from_slice(&0u32.to_be_bytes());
        wire.extend_from_slice(&[0x00, 0x03, 0x02, b'h', b'i']);

        let (rr, consumed) = ResourceRecord::parse(&wire, 0).unwrap();
        assert_eq!(consumed, wire.len());
        assert_eq!(rr.rtype(), Type::Unknown(16));
        assert_eq!(rr.rdata(), &RData::Unknown(Unknown::new(16, vec![2, b'h', b'i'])));
        assert_eq!(rr.to_wire().unwrap(), wire);
    }

    #[test]
    fn test_truncated_fixed_fields() {
        let wire = [0x00, 0x00, 0x01, 0x00, 0x01, 0x00];
        assert!(matches!(
            ResourceRecord::parse(&wire, 0),
            Err(Error::TruncatedBuffer { .. })
        ));
    }

    #[test]
    fn test_from_rdata() {
        let name = Name::from_str("1.0.0.127.in-addr.arpa").unwrap();
        let target = Name::from_str("localhost").unwrap();
        let rr = ResourceRecord::from_rdata(name, 86400, RData::PTR(target)).unwrap();
        assert_eq!(rr.record_type(), Some(RecordType::PTR));
        assert_eq!(rr.rclass(), Class::IN);
        assert_eq!(rr.rd_length(), 11);
    }

    #[test]
    fn test_oversized_rdata_rejected() {
        let rdata = RData::Unknown(Unknown::new(99, vec![0u8; 70_000]));
        assert!(matches!(
            ResourceRecord::from_rdata(Name::root(), 0, rdata),
            Err(Error::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_record_parser_cursor() {
        let a = ResourceRecord::a(Name::from_str("a.test").unwrap(), 1, Ipv4Addr::LOCALHOST);
        let b = ResourceRecord::aaaa(Name::from_str("b.test").unwrap(), 2, Ipv6Addr::LOCALHOST);
        let mut wire = a.to_wire().unwrap();
        wire.extend_from_slice(&b.to_wire().unwrap());

        let mut parser = RecordParser::new(&wire, 0, 2);
        let records = parser.collect_all().unwrap();
        assert_eq!(records, vec![a, b]);
        assert_eq!(parser.offset(), wire.len());
        assert_eq!(parser.remaining(), 0);
    }

    #[test]
    fn test_record_parser_hostile_count() {
        // A count far beyond what the bytes could hold fails cleanly.
        let wire = [0u8; 4];
        let mut parser = RecordParser::new(&wire, 0, u16::MAX);
        assert!(matches!(
            parser.collect_all(),
            Err(Error::TruncatedBuffer { .. })
        ));
    }

    #[test]
    fn test_record_display() {
        let name = Name::from_str("example.com").unwrap();
        let rr = ResourceRecord::a(name, 300, Ipv4Addr::new(192, 0, 2, 1));
        assert_eq!(rr.to_string(), "example.com\t300\tIN\tA\t192.0.2.1");
    }
}
