//! Reverse lookup names.
//!
//! Builds the `in-addr.arpa` / `ip6.arpa` owner name used for PTR queries
//! from an address literal:
//!
//! ```text
//! 192.168.1.10  ->  10.1.168.192.in-addr.arpa
//! 2001:db8::1   ->  1.0.0.0.(...).8.b.d.0.1.0.0.2.ip6.arpa
//! ```

use crate::error::{Error, Result};
use crate::name::Name;
use smallvec::SmallVec;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

/// Zone under which IPv4 reverse names live.
pub const IPV4_REVERSE_ZONE: &str = "in-addr.arpa";

/// Zone under which IPv6 reverse names live.
pub const IPV6_REVERSE_ZONE: &str = "ip6.arpa";

/// Builds the reverse name for an IPv4 or IPv6 address literal.
///
/// Input containing `:` is treated as IPv6, anything else as IPv4.
///
/// # Example
///
/// ```rust
/// use dnsq_proto::reverse::reverse_name;
///
/// let name = reverse_name("192.168.1.10").unwrap();
/// assert_eq!(name.to_dotted(), "10.1.168.192.in-addr.arpa");
/// ```
pub fn reverse_name(input: &str) -> Result<Name> {
    if input.contains(':') {
        ipv6_reverse_name(input)
    } else {
        ipv4_reverse_name(input)
    }
}

/// Builds the `in-addr.arpa` name for a dotted-quad literal.
///
/// The literal must be exactly four decimal octets. The octet strings are
/// reversed as written, so `010.1.1.1` becomes `1.1.1.010.in-addr.arpa`.
pub fn ipv4_reverse_name(input: &str) -> Result<Name> {
    let mut octets = [""; 4];
    let mut count = 0;

    for part in input.split('.') {
        if count == octets.len() {
            return Err(Error::invalid_address(input, "more than 4 octets"));
        }
        check_octet(input, part)?;
        octets[count] = part;
        count += 1;
    }

    if count != octets.len() {
        return Err(Error::invalid_address(
            input,
            format!("expected 4 octets, found {count}"),
        ));
    }

    Ok(in_zone(
        octets.iter().rev().map(|o| o.as_bytes()),
        IPV4_REVERSE_ZONE,
    ))
}

fn check_octet(input: &str, part: &str) -> Result<()> {
    if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_address(
            input,
            format!("octet {part:?} is not a decimal number"),
        ));
    }
    part.parse::<u8>()
        .map(drop)
        .map_err(|_| Error::invalid_address(input, format!("octet {part} is out of range")))
}

/// Builds the `ip6.arpa` name for an IPv6 literal.
///
/// `::` zero compression is expanded to the full 32 nibbles before they are
/// reversed.
pub fn ipv6_reverse_name(input: &str) -> Result<Name> {
    let addr = Ipv6Addr::from_str(input)
        .map_err(|e| Error::invalid_address(input, e.to_string()))?;
    Ok(v6_name(addr))
}

/// Builds the reverse name for an already parsed address.
pub fn reverse_name_for(addr: IpAddr) -> Name {
    match addr {
        IpAddr::V4(v4) => {
            let octets: Vec<String> = v4.octets().iter().rev().map(u8::to_string).collect();
            in_zone(octets.iter().map(|o| o.as_bytes()), IPV4_REVERSE_ZONE)
        }
        IpAddr::V6(v6) => v6_name(v6),
    }
}

/// Returns true if `name` is inside one of the reverse zones.
pub fn is_reverse_name(name: &Name) -> bool {
    [IPV4_REVERSE_ZONE, IPV6_REVERSE_ZONE]
        .iter()
        .any(|zone| name.ends_with(&in_zone(std::iter::empty(), zone)))
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn v6_name(addr: Ipv6Addr) -> Name {
    let octets = addr.octets();
    let nibbles = octets.iter().rev().flat_map(|&byte| {
        [
            std::slice::from_ref(&HEX_DIGITS[usize::from(byte & 0x0F)]),
            std::slice::from_ref(&HEX_DIGITS[usize::from(byte >> 4)]),
        ]
    });
    in_zone(nibbles, IPV6_REVERSE_ZONE)
}

/// Appends `labels` and then the labels of `zone`.
///
/// Callers pass at most 32 one-byte or 4 three-byte labels, so the result
/// always fits the name limits.
fn in_zone<'a>(labels: impl Iterator<Item = &'a [u8]>, zone: &'a str) -> Name {
    let mut wire = SmallVec::<[u8; 64]>::new();
    for label in labels.chain(zone.split('.').map(str::as_bytes)) {
        wire.push(label.len() as u8);
        wire.extend_from_slice(label);
    }
    wire.push(0);
    Name::from_validated_wire(wire)
}
