//! Raw IPv4/UDP datagrams.
//!
//! For transports that send through a raw socket with `IP_HDRINCL`, the
//! encoded DNS message has to be wrapped in UDP and IPv4 headers by hand:
//!
//! ```text
//! +----------------------+------------------+-------------------+
//! | IPv4 header (20)     | UDP header (8)   | DNS message       |
//! +----------------------+------------------+-------------------+
//! ```
//!
//! [`parse_ipv4_udp`] undoes this on receive.

use crate::error::{Error, Result};
use crate::wire::{WireReader, WireWriter};
use bytes::Bytes;
use std::net::{Ipv4Addr, SocketAddrV4};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of an IPv4 header without options.
pub const IPV4_HEADER_LEN: usize = 20;

/// Length of a UDP header.
pub const UDP_HEADER_LEN: usize = 8;

/// IP protocol number for UDP.
pub const PROTO_UDP: u8 = 17;

/// Default time-to-live for outgoing datagrams.
pub const DEFAULT_TTL: u8 = 64;

/// Largest payload that fits the 16-bit IPv4 total length.
pub const MAX_UDP_PAYLOAD: usize = u16::MAX as usize - IPV4_HEADER_LEN - UDP_HEADER_LEN;

const VERSION_IHL: u8 = 0x45;
const FLAG_DONT_FRAGMENT: u16 = 0x4000;
const FLAG_MORE_FRAGMENTS: u16 = 0x2000;
const FRAGMENT_OFFSET_MASK: u16 = 0x1FFF;
const IPV4_CHECKSUM_OFFSET: usize = 10;
const UDP_CHECKSUM_OFFSET: usize = IPV4_HEADER_LEN + 6;

// ---------------------------------------------------------------------------
// Checksums
// ---------------------------------------------------------------------------

/// Computes the RFC 1071 internet checksum of `data`.
///
/// The data is summed as big-endian 16-bit words (an odd trailing byte is
/// padded with zero), carries are folded back into the low 16 bits, and the
/// one's complement of the result is returned. Summing a header that already
/// carries a valid checksum yields `0`.
pub fn internet_checksum(data: &[u8]) -> u16 {
    !fold(sum_words(data, 0))
}

/// Computes the UDP checksum of `segment` (UDP header plus payload) sent
/// from `source` to `destination`.
///
/// The checksum field inside `segment` must be zero. Covers the IPv4
/// pseudo-header. A computed value of zero is returned as `0xFFFF`, since a
/// transmitted zero means "no checksum".
pub fn udp_checksum(source: Ipv4Addr, destination: Ipv4Addr, segment: &[u8]) -> u16 {
    let mut pseudo = [0u8; 12];
    pseudo[..4].copy_from_slice(&source.octets());
    pseudo[4..8].copy_from_slice(&destination.octets());
    pseudo[9] = PROTO_UDP;
    pseudo[10..].copy_from_slice(&(segment.len() as u16).to_be_bytes());

    match !fold(sum_words(segment, sum_words(&pseudo, 0))) {
        0 => 0xFFFF,
        sum => sum,
    }
}

fn sum_words(data: &[u8], initial: u64) -> u64 {
    let mut chunks = data.chunks_exact(2);
    let mut sum = initial;
    for word in &mut chunks {
        sum += u64::from(u16::from_be_bytes([word[0], word[1]]));
    }
    if let [last] = chunks.remainder() {
        sum += u64::from(*last) << 8;
    }
    sum
}

fn fold(mut sum: u64) -> u16 {
    while sum > 0xFFFF {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds IPv4/UDP datagrams around a payload.
///
/// # Example
///
/// ```rust
/// use dnsq_proto::packet::UdpPacketBuilder;
/// use std::net::{Ipv4Addr, SocketAddrV4};
///
/// let builder = UdpPacketBuilder::new(
///     SocketAddrV4::new(Ipv4Addr::new(192, 0, 2, 10), 40000),
///     SocketAddrV4::new(Ipv4Addr::new(192, 0, 2, 53), 53),
/// );
/// let datagram = builder.build(b"hello").unwrap();
/// assert_eq!(datagram.len(), 20 + 8 + 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpPacketBuilder {
    /// Source address and port.
    pub source: SocketAddrV4,
    /// Destination address and port.
    pub destination: SocketAddrV4,
    /// IPv4 time-to-live.
    pub ttl: u8,
    /// IPv4 identification field.
    pub identification: u16,
    /// Whether to compute the UDP checksum; when false the field is sent as
    /// zero.
    pub udp_checksum: bool,
}

impl UdpPacketBuilder {
    /// Creates a builder with default TTL, zero identification and UDP
    /// checksums enabled.
    pub fn new(source: SocketAddrV4, destination: SocketAddrV4) -> Self {
        Self {
            source,
            destination,
            ttl: DEFAULT_TTL,
            identification: 0,
            udp_checksum: true,
        }
    }

    /// Sets the identification field.
    #[must_use]
    pub fn with_identification(mut self, identification: u16) -> Self {
        self.identification = identification;
        self
    }

    /// Enables or disables the UDP checksum.
    #[must_use]
    pub fn with_udp_checksum(mut self, enabled: bool) -> Self {
        self.udp_checksum = enabled;
        self
    }

    /// Builds the complete datagram carrying `payload`.
    ///
    /// Fails with [`Error::PayloadTooLarge`] if the datagram would not fit
    /// the IPv4 total length field.
    pub fn build(&self, payload: &[u8]) -> Result<Bytes> {
        if payload.len() > MAX_UDP_PAYLOAD {
            return Err(Error::PayloadTooLarge {
                size: payload.len(),
                max: MAX_UDP_PAYLOAD,
            });
        }

        let udp_len = UDP_HEADER_LEN + payload.len();
        let total_len = IPV4_HEADER_LEN + udp_len;
        let mut writer = WireWriter::new(total_len);

        // IPv4 header, checksum patched below.
        writer.write_u8(VERSION_IHL);
        writer.write_u8(0);
        writer.write_u16(total_len as u16);
        writer.write_u16(self.identification);
        writer.write_u16(FLAG_DONT_FRAGMENT);
        writer.write_u8(self.ttl);
        writer.write_u8(PROTO_UDP);
        writer.write_u16(0);
        writer.write_bytes(&self.source.ip().octets());
        writer.write_bytes(&self.destination.ip().octets());

        let ip_checksum = internet_checksum(&writer.as_bytes()[..IPV4_HEADER_LEN]);
        writer.write_u16_at(IPV4_CHECKSUM_OFFSET, ip_checksum)?;

        // UDP header.
        writer.write_u16(self.source.port());
        writer.write_u16(self.destination.port());
        writer.write_u16(udp_len as u16);
        writer.write_u16(0);
        writer.write_bytes(payload);

        if self.udp_checksum {
            let checksum = udp_checksum(
                *self.source.ip(),
                *self.destination.ip(),
                &writer.as_bytes()[IPV4_HEADER_LEN..],
            );
            writer.write_u16_at(UDP_CHECKSUM_OFFSET, checksum)?;
        }

        Ok(writer.freeze())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A UDP datagram with its IPv4 and UDP headers stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpDatagram<'a> {
    /// Sender address and port.
    pub source: SocketAddrV4,
    /// Receiver address and port.
    pub destination: SocketAddrV4,
    /// UDP payload.
    pub payload: &'a [u8],
}

/// Parses an IPv4 packet carrying UDP, as read from a raw socket.
///
/// IPv4 options are skipped. Returns an error if:
/// - The buffer is shorter than either header or the IPv4 total length
/// - The packet is not IPv4 or does not carry UDP
/// - The packet is a fragment
/// - The UDP length is inconsistent with the IPv4 total length
///
/// Checksums are not verified.
pub fn parse_ipv4_udp(data: &[u8]) -> Result<UdpDatagram<'_>> {
    if data.len() < IPV4_HEADER_LEN {
        return Err(Error::truncated(0, IPV4_HEADER_LEN, data.len()));
    }

    let mut reader = WireReader::new(data);
    let version_ihl = reader.read_u8()?;
    if version_ihl >> 4 != 4 {
        return Err(Error::malformed_packet(format!(
            "IP version {} is not 4",
            version_ihl >> 4
        )));
    }
    let header_len = usize::from(version_ihl & 0x0F) * 4;
    if header_len < IPV4_HEADER_LEN {
        return Err(Error::malformed_packet(format!(
            "IPv4 header length {header_len} is below the minimum"
        )));
    }

    reader.advance(1)?;
    let total_len = usize::from(reader.read_u16()?);
    reader.advance(2)?;
    let fragment = reader.read_u16()?;
    reader.advance(1)?;
    let protocol = reader.read_u8()?;
    reader.advance(2)?;
    let source_ip = Ipv4Addr::from(reader.read_array::<4>()?);
    let destination_ip = Ipv4Addr::from(reader.read_array::<4>()?);

    if protocol != PROTO_UDP {
        return Err(Error::malformed_packet(format!(
            "IP protocol {protocol} is not UDP"
        )));
    }
    if fragment & (FLAG_MORE_FRAGMENTS | FRAGMENT_OFFSET_MASK) != 0 {
        return Err(Error::malformed_packet("fragmented datagram"));
    }
    if total_len > data.len() {
        return Err(Error::truncated(0, total_len, data.len()));
    }
    if total_len < header_len + UDP_HEADER_LEN {
        return Err(Error::malformed_packet(format!(
            "IPv4 total length {total_len} cannot hold a UDP header"
        )));
    }

    let mut udp = WireReader::at(&data[..total_len], header_len);
    let source_port = udp.read_u16()?;
    let destination_port = udp.read_u16()?;
    let udp_len = usize::from(udp.read_u16()?);
    udp.advance(2)?;

    if udp_len < UDP_HEADER_LEN || header_len + udp_len > total_len {
        return Err(Error::malformed_packet(format!(
            "UDP length {udp_len} is inconsistent with IPv4 total length {total_len}"
        )));
    }

    Ok(UdpDatagram {
        source: SocketAddrV4::new(source_ip, source_port),
        destination: SocketAddrV4::new(destination_ip, destination_port),
        payload: udp.read_bytes(udp_len - UDP_HEADER_LEN)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> UdpPacketBuilder {
        UdpPacketBuilder::new(
            SocketAddrV4::new(Ipv4Addr::new(192, 168, 0, 1), 40000),
            SocketAddrV4::new(Ipv4Addr::new(192, 168, 0, 199), 53),
        )
    }

    #[test]
    fn test_internet_checksum_rfc1071() {
        let data = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
        assert_eq!(internet_checksum(&data), 0x220d);
    }

    #[test]
    fn test_internet_checksum_ipv4_header() {
        let header = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 0xc0, 0xa8,
            0x00, 0x01, 0xc0, 0xa8, 0x00, 0xc7,
        ];
        assert_eq!(internet_checksum(&header), 0xb861);

        let mut with_checksum = header;
        with_checksum[10..12].copy_from_slice(&0xb861u16.to_be_bytes());
        assert_eq!(internet_checksum(&with_checksum), 0);
    }

    #[test]
    fn test_odd_length_is_padded() {
        assert_eq!(internet_checksum(&[0xAB]), !0xAB00);
    }

    #[test]
    fn test_build_headers() {
        let datagram = builder().with_identification(0x1234).build(b"dns!").unwrap();
        assert_eq!(datagram.len(), 32);

        assert_eq!(datagram[0], 0x45);
        assert_eq!(&datagram[2..4], &32u16.to_be_bytes());
        assert_eq!(&datagram[4..6], &0x1234u16.to_be_bytes());
        assert_eq!(&datagram[6..8], &0x4000u16.to_be_bytes());
        assert_eq!(datagram[8], DEFAULT_TTL);
        assert_eq!(datagram[9], PROTO_UDP);
        assert_eq!(internet_checksum(&datagram[..20]), 0);

        assert_eq!(&datagram[20..22], &40000u16.to_be_bytes());
        assert_eq!(&datagram[22..24], &53u16.to_be_bytes());
        assert_eq!(&datagram[24..26], &12u16.to_be_bytes());
        assert_eq!(&datagram[28..], b"dns!");
    }

    #[test]
    fn test_udp_checksum_matches_recomputation() {
        let b = builder();
        let datagram = b.build(b"\x00\x01\x01\x00").unwrap();
        let transmitted = u16::from_be_bytes([datagram[26], datagram[27]]);
        assert_ne!(transmitted, 0);

        let mut segment = datagram[20..].to_vec();
        segment[6] = 0;
        segment[7] = 0;
        assert_eq!(
            udp_checksum(*b.source.ip(), *b.destination.ip(), &segment),
            transmitted
        );
    }

    #[test]
    fn test_udp_checksum_zero_sent_as_ones() {
        // A segment whose pseudo-header and body sum to 0xFFFF.
        let src = Ipv4Addr::new(0, 0, 0, 0);
        let dst = Ipv4Addr::new(0, 0, 0, 0);
        // Pseudo-header contributes 0x0011 + 0x000A; the body word fills the rest.
        let mut segment = vec![0u8; 10];
        let filler = 0xFFFF - 0x0011 - 0x000A - 0x000A;
        segment[8..10].copy_from_slice(&(filler as u16).to_be_bytes());
        segment[4..6].copy_from_slice(&10u16.to_be_bytes());
        assert_eq!(udp_checksum(src, dst, &segment), 0xFFFF);
    }

    #[test]
    fn test_udp_checksum_disabled() {
        let datagram = builder().with_udp_checksum(false).build(b"abc").unwrap();
        assert_eq!(&datagram[26..28], &[0, 0]);
    }

    #[test]
    fn test_payload_too_large() {
        let payload = vec![0u8; MAX_UDP_PAYLOAD + 1];
        assert_eq!(
            builder().build(&payload),
            Err(Error::PayloadTooLarge {
                size: MAX_UDP_PAYLOAD + 1,
                max: MAX_UDP_PAYLOAD
            })
        );
        assert!(builder().build(&payload[1..]).is_ok());
    }

    #[test]
    fn test_parse_built_datagram() {
        let b = builder();
        let datagram = b.build(b"response").unwrap();
        let parsed = parse_ipv4_udp(&datagram).unwrap();

        assert_eq!(parsed.source, b.source);
        assert_eq!(parsed.destination, b.destination);
        assert_eq!(parsed.payload, b"response");
    }

    #[test]
    fn test_parse_skips_options_and_trailer() {
        let mut datagram = builder().build(b"xy").unwrap().to_vec();
        // Insert 4 bytes of options and bump IHL and total length.
        datagram.splice(20..20, [1, 1, 1, 0]);
        datagram[0] = 0x46;
        datagram[2..4].copy_from_slice(&34u16.to_be_bytes());
        // Link-layer padding past the total length is ignored.
        datagram.extend_from_slice(&[0xEE; 6]);

        let parsed = parse_ipv4_udp(&datagram).unwrap();
        assert_eq!(parsed.payload, b"xy");
    }

    #[test]
    fn test_parse_rejects_bad_datagrams() {
        let good = builder().build(b"abcd").unwrap().to_vec();

        assert!(matches!(
            parse_ipv4_udp(&good[..19]),
            Err(Error::TruncatedBuffer { .. })
        ));
        assert!(matches!(
            parse_ipv4_udp(&good[..30]),
            Err(Error::TruncatedBuffer { .. })
        ));

        let mut tcp = good.clone();
        tcp[9] = 6;
        assert!(matches!(parse_ipv4_udp(&tcp), Err(Error::MalformedPacket { .. })));

        let mut v6 = good.clone();
        v6[0] = 0x65;
        assert!(matches!(parse_ipv4_udp(&v6), Err(Error::MalformedPacket { .. })));

        let mut fragment = good.clone();
        fragment[6] = 0x20;
        assert!(matches!(parse_ipv4_udp(&fragment), Err(Error::MalformedPacket { .. })));

        let mut long_udp = good;
        long_udp[24..26].copy_from_slice(&100u16.to_be_bytes());
        assert!(matches!(parse_ipv4_udp(&long_udp), Err(Error::MalformedPacket { .. })));
    }
}
