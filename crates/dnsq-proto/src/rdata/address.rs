//! Address record data (A, AAAA).
//!
//! Both types have a fixed RDATA size: 4 bytes for A and 16 for AAAA, each
//! holding the address in network byte order.

use crate::error::{Error, Result};
use crate::rtype::RecordType;
use crate::wire::WireReader;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Reads an IPv4 address from A RDATA.
pub fn parse_a(message: &[u8], offset: usize, rd_length: u16) -> Result<Ipv4Addr> {
    read_fixed::<4>(RecordType::A, message, offset, rd_length).map(Ipv4Addr::from)
}

/// Reads an IPv6 address from AAAA RDATA.
pub fn parse_aaaa(message: &[u8], offset: usize, rd_length: u16) -> Result<Ipv6Addr> {
    read_fixed::<16>(RecordType::AAAA, message, offset, rd_length).map(Ipv6Addr::from)
}

fn read_fixed<const N: usize>(
    rtype: RecordType,
    message: &[u8],
    offset: usize,
    rd_length: u16,
) -> Result<[u8; N]> {
    if usize::from(rd_length) != N {
        return Err(Error::malformed_record(
            rtype.name(),
            format!("RDLENGTH is {rd_length}, expected {N}"),
        ));
    }
    WireReader::at(message, offset).read_array::<N>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a_parse() {
        let data = [0xFF, 8, 8, 8, 8];
        assert_eq!(parse_a(&data, 1, 4).unwrap(), Ipv4Addr::new(8, 8, 8, 8));
    }

    #[test]
    fn test_aaaa_parse() {
        let data: [u8; 16] = [
            0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x01,
        ];
        let addr = parse_aaaa(&data, 0, 16).unwrap();
        assert_eq!(addr, Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1));
        assert_eq!(addr.to_string(), "2001:db8::1");
    }

    #[test]
    fn test_wrong_length_is_malformed() {
        let data = [0u8; 16];
        assert!(matches!(
            parse_a(&data, 0, 5),
            Err(Error::MalformedRecord { .. })
        ));
        assert!(matches!(
            parse_a(&data, 0, 0),
            Err(Error::MalformedRecord { .. })
        ));
        assert!(matches!(
            parse_aaaa(&data, 0, 4),
            Err(Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_short_buffer_is_truncated() {
        let data = [8, 8, 8];
        assert_eq!(
            parse_a(&data, 0, 4),
            Err(Error::TruncatedBuffer {
                offset: 0,
                needed: 4,
                len: 3
            })
        );
    }
}
