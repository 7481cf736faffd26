//! DNS name parsing from wire format with compression support.
//!
//! This module handles parsing domain names from DNS wire format,
//! including support for name compression (RFC 1035 Section 4.1.4).

use super::Name;
use crate::error::{Error, Result};
use crate::MAX_NAME_LENGTH;
use smallvec::SmallVec;

/// Maximum number of compression pointer jumps followed for one name.
pub const MAX_COMPRESSION_JUMPS: usize = 16;

/// Top two bits of a length byte marking a compression pointer.
const POINTER_MASK: u8 = 0xC0;

/// Parser for reading domain names from DNS wire format.
///
/// This parser handles both uncompressed names and names using compression
/// pointers. It holds the whole message buffer so pointers can be resolved.
#[derive(Debug, Clone, Copy)]
pub struct NameParser<'a> {
    /// The complete message buffer (for compression pointer resolution).
    message: &'a [u8],
}

impl<'a> NameParser<'a> {
    /// Creates a new name parser with the given message buffer.
    #[inline]
    pub const fn new(message: &'a [u8]) -> Self {
        Self { message }
    }

    /// Parses a domain name starting at the given offset.
    ///
    /// Returns the parsed name and the number of bytes consumed from the
    /// starting position. Once a compression pointer is met the consumed
    /// count is fixed at the pointer's end, however far the pointer leads.
    ///
    /// Pointers must point strictly backwards from their own offset, and at
    /// most [`MAX_COMPRESSION_JUMPS`] are followed; both guard against loops
    /// in hostile input.
    pub fn parse_name(&self, offset: usize) -> Result<(Name, usize)> {
        let mut wire = SmallVec::<[u8; 64]>::new();
        let mut consumed = None;
        let mut pos = offset;
        let mut jumps = 0;

        loop {
            let len_byte = *self
                .message
                .get(pos)
                .ok_or_else(|| Error::truncated(pos, 1, self.message.len()))?;

            match len_byte & POINTER_MASK {
                POINTER_MASK => {
                    let low = *self
                        .message
                        .get(pos + 1)
                        .ok_or_else(|| Error::truncated(pos, 2, self.message.len()))?;
                    let target = usize::from(u16::from_be_bytes([len_byte & !POINTER_MASK, low]));

                    if target >= pos {
                        return Err(Error::malformed_name(
                            pos,
                            format!("compression pointer to {target} does not point backwards"),
                        ));
                    }

                    jumps += 1;
                    if jumps > MAX_COMPRESSION_JUMPS {
                        return Err(Error::malformed_name(
                            pos,
                            format!("more than {MAX_COMPRESSION_JUMPS} compression jumps"),
                        ));
                    }

                    consumed.get_or_insert(pos + 2 - offset);
                    pos = target;
                }
                0x00 => {
                    let len = usize::from(len_byte);

                    if len == 0 {
                        wire.push(0);
                        let consumed = *consumed.get_or_insert(pos + 1 - offset);
                        return Ok((Name::from_validated_wire(wire), consumed));
                    }

                    let label = self
                        .message
                        .get(pos + 1..pos + 1 + len)
                        .ok_or_else(|| Error::truncated(pos + 1, len, self.message.len()))?;

                    // Room must remain for the terminating root byte.
                    if wire.len() + 1 + len + 1 > MAX_NAME_LENGTH {
                        return Err(Error::malformed_name(
                            pos,
                            format!("name exceeds {MAX_NAME_LENGTH} bytes"),
                        ));
                    }

                    wire.push(len_byte);
                    wire.extend_from_slice(label);
                    pos += 1 + len;
                }
                _ => {
                    return Err(Error::malformed_name(
                        pos,
                        format!("reserved label type 0x{len_byte:02X}"),
                    ));
                }
            }
        }
    }

    /// Parses a name and returns only the name (ignoring consumed bytes).
    #[inline]
    pub fn parse(&self, offset: usize) -> Result<Name> {
        self.parse_name(offset).map(|(name, _)| name)
    }
}
