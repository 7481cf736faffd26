//! DNS message header.
//!
//! The DNS header is a fixed 12-byte structure at the start of every DNS message.
//! It contains control information and counts of the sections that follow.

use crate::error::{Error, Result};
use crate::opcode::OpCode;
use crate::rcode::ResponseCode;
use crate::wire::{WireReader, WireWriter};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the DNS header in bytes.
pub const HEADER_SIZE: usize = 12;

const OPCODE_SHIFT: u16 = 11;
const OPCODE_MASK: u16 = 0x7800;
const RCODE_MASK: u16 = 0x000F;

bitflags! {
    /// DNS header flag bits, excluding the opcode and rcode fields.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct HeaderFlags: u16 {
        /// Query/Response flag: 0 = query, 1 = response
        const QR = 0x8000;

        /// Authoritative Answer: server is authoritative for the domain
        const AA = 0x0400;

        /// Truncation: message was truncated
        const TC = 0x0200;

        /// Recursion Desired: client wants recursive resolution
        const RD = 0x0100;

        /// Recursion Available: server supports recursion
        const RA = 0x0080;

        /// Reserved 3-bit field; zero in every message we build
        const Z = 0x0070;
    }
}

impl Default for HeaderFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// DNS message header.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      ID                       |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    QDCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ANCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    NSCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ARCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Message identifier for matching requests to responses.
    pub id: u16,

    /// Single-bit flags and the Z field.
    pub flags: HeaderFlags,

    /// Operation code.
    pub opcode: OpCode,

    /// Response code.
    pub rcode: ResponseCode,

    /// Number of questions.
    pub qd_count: u16,

    /// Number of answer records.
    pub an_count: u16,

    /// Number of authority records.
    pub ns_count: u16,

    /// Number of additional records.
    pub ar_count: u16,
}

impl Header {
    /// Creates a new header with the given message ID.
    #[inline]
    pub const fn new(id: u16) -> Self {
        Self {
            id,
            flags: HeaderFlags::empty(),
            opcode: OpCode::Query,
            rcode: ResponseCode::NoError,
            qd_count: 0,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    /// Creates a request header: QR, AA, TC, Z and RCODE all zero.
    pub fn request(id: u16, opcode: OpCode, recursion_desired: bool) -> Self {
        let mut header = Self::new(id);
        header.opcode = opcode;
        header.set_recursion_desired(recursion_desired);
        header
    }

    /// Creates a response header from a query header.
    pub fn response_from(query: &Header) -> Self {
        Self {
            id: query.id,
            flags: HeaderFlags::QR | (query.flags & HeaderFlags::RD),
            opcode: query.opcode,
            rcode: ResponseCode::NoError,
            qd_count: query.qd_count,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    /// Returns true if this is a query.
    #[inline]
    pub fn is_query(&self) -> bool {
        !self.flags.contains(HeaderFlags::QR)
    }

    /// Returns true if this is a response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.flags.contains(HeaderFlags::QR)
    }

    /// Returns true if the response is from an authoritative server.
    #[inline]
    pub fn is_authoritative(&self) -> bool {
        self.flags.contains(HeaderFlags::AA)
    }

    /// Returns true if the message was truncated.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.flags.contains(HeaderFlags::TC)
    }

    /// Returns true if recursion was requested.
    #[inline]
    pub fn recursion_desired(&self) -> bool {
        self.flags.contains(HeaderFlags::RD)
    }

    /// Returns true if recursion is available.
    #[inline]
    pub fn recursion_available(&self) -> bool {
        self.flags.contains(HeaderFlags::RA)
    }

    /// Returns the 3-bit Z field.
    #[inline]
    pub fn z(&self) -> u8 {
        ((self.flags & HeaderFlags::Z).bits() >> 4) as u8
    }

    /// Sets the QR flag (marks as response).
    #[inline]
    pub fn set_response(&mut self, response: bool) {
        self.flags.set(HeaderFlags::QR, response);
    }

    /// Sets the RD flag.
    #[inline]
    pub fn set_recursion_desired(&mut self, rd: bool) {
        self.flags.set(HeaderFlags::RD, rd);
    }

    /// Sets the RA flag.
    #[inline]
    pub fn set_recursion_available(&mut self, ra: bool) {
        self.flags.set(HeaderFlags::RA, ra);
    }

    /// Returns the total record count across the three record sections.
    #[inline]
    pub fn total_record_count(&self) -> usize {
        usize::from(self.an_count) + usize::from(self.ns_count) + usize::from(self.ar_count)
    }

    /// Parses a header from the first 12 bytes of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::truncated(0, HEADER_SIZE, data.len()));
        }

        let mut reader = WireReader::new(data);
        let id = reader.read_u16()?;
        let flags_raw = reader.read_u16()?;

        Ok(Self {
            id,
            flags: HeaderFlags::from_bits_truncate(flags_raw),
            opcode: OpCode::from_u8(((flags_raw & OPCODE_MASK) >> OPCODE_SHIFT) as u8),
            rcode: ResponseCode::from_header((flags_raw & RCODE_MASK) as u8),
            qd_count: reader.read_u16()?,
            an_count: reader.read_u16()?,
            ns_count: reader.read_u16()?,
            ar_count: reader.read_u16()?,
        })
    }

    /// Returns the 16-bit flags word as transmitted.
    pub fn flags_word(&self) -> u16 {
        self.flags.bits()
            | (u16::from(self.opcode.to_u8()) << OPCODE_SHIFT) & OPCODE_MASK
            | u16::from(self.rcode.to_u8()) & RCODE_MASK
    }

    /// Writes the header in wire format.
    pub fn write_to(&self, writer: &mut WireWriter) {
        writer.write_u16(self.id);
        writer.write_u16(self.flags_word());
        writer.write_u16(self.qd_count);
        writer.write_u16(self.an_count);
        writer.write_u16(self.ns_count);
        writer.write_u16(self.ar_count);
    }

    /// Serializes the header to wire format.
    pub fn to_wire(&self) -> [u8; HEADER_SIZE] {
        let mut writer = WireWriter::new(HEADER_SIZE);
        self.write_to(&mut writer);

        let mut buf = [0u8; HEADER_SIZE];
        buf.copy_from_slice(writer.as_bytes());
        buf
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            ";; ->>HEADER<<- opcode: {}, status: {}, id: {}",
            self.opcode, self.rcode, self.id
        )?;

        write!(f, ";; flags:")?;
        if self.is_response() {
            write!(f, " qr")?;
        }
        if self.is_authoritative() {
            write!(f, " aa")?;
        }
        if self.is_truncated() {
            write!(f, " tc")?;
        }
        if self.recursion_desired() {
            write!(f, " rd")?;
        }
        if self.recursion_available() {
            write!(f, " ra")?;
        }

        write!(
            f,
            "; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
            self.qd_count, self.an_count, self.ns_count, self.ar_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_header_wire() {
        let mut header = Header::request(0x0001, OpCode::Query, true);
        header.qd_count = 1;

        assert_eq!(
            header.to_wire(),
            [0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );

        let header = Header::request(0xBEEF, OpCode::Status, false);
        assert_eq!(header.flags_word(), 0x1000);
    }

    #[test]
    fn test_header_roundtrip() {
        let mut header = Header::request(0x1234, OpCode::Notify, true);
        header.set_response(true);
        header.set_recursion_available(true);
        header.rcode = ResponseCode::NXDomain;
        header.qd_count = 1;
        header.an_count = 2;
        header.ns_count = 3;
        header.ar_count = 4;

        let parsed = Header::parse(&header.to_wire()).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.total_record_count(), 9);
    }

    #[test]
    fn test_header_field_extraction() {
        // QR, opcode 2, AA, TC, RD, RA, Z=5, rcode 5
        let wire = [0x12, 0x34, 0x97, 0xD5, 0, 0, 0, 0, 0, 0, 0, 0];
        let header = Header::parse(&wire).unwrap();

        assert!(header.is_response());
        assert_eq!(header.opcode, OpCode::Status);
        assert!(header.is_authoritative());
        assert!(header.is_truncated());
        assert!(header.recursion_desired());
        assert!(header.recursion_available());
        assert_eq!(header.z(), 5);
        assert_eq!(header.rcode, ResponseCode::Refused);
        assert_eq!(header.flags_word(), 0x97D5);
    }

    #[test]
    fn test_unassigned_codes_survive() {
        let wire = [0, 0, 0x18, 0x0C, 0, 0, 0, 0, 0, 0, 0, 0];
        let header = Header::parse(&wire).unwrap();
        assert_eq!(header.opcode, OpCode::Unassigned(3));
        assert_eq!(header.rcode, ResponseCode::Unassigned(12));
        assert_eq!(header.to_wire(), wire);
    }

    #[test]
    fn test_header_parse_too_short() {
        assert_eq!(
            Header::parse(&[0; 10]),
            Err(Error::TruncatedBuffer {
                offset: 0,
                needed: 12,
                len: 10
            })
        );
    }

    #[test]
    fn test_response_from_query() {
        let query = Header::request(7, OpCode::Query, true);
        let response = Header::response_from(&query);

        assert_eq!(query.id, response.id);
        assert!(query.is_query());
        assert!(response.is_response());
        assert!(response.recursion_desired());
    }

    #[test]
    fn test_header_display() {
        let mut header = Header::request(0xABCD, OpCode::Query, true);
        header.set_response(true);

        let display = header.to_string();
        assert!(display.contains("opcode: QUERY, status: NOERROR, id: 43981"));
        assert!(display.contains("flags: qr rd;"));
    }
}
