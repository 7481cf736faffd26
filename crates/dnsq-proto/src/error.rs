//! DNS protocol error types.
//!
//! Every failure the codec can report is locally detected and final: the
//! decoder never substitutes defaults or continues past a structural error,
//! since the read cursor can no longer be trusted once one occurs.

use thiserror::Error;

/// Result type alias for DNS protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// DNS protocol errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Decoding Errors
    // =========================================================================
    /// A read would run past the end of the buffer.
    #[error("truncated buffer: reading {needed} bytes at offset {offset} exceeds length {len}")]
    TruncatedBuffer {
        /// Offset the read started at.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Total buffer length.
        len: usize,
    },

    /// Invalid or cyclic compression pointer, reserved label type, or a
    /// name that cannot be represented.
    #[error("malformed name at offset {offset}: {reason}")]
    MalformedName {
        /// Offset of the offending byte.
        offset: usize,
        /// Description of the fault.
        reason: String,
    },

    /// RDATA length inconsistent with its type's fixed size.
    #[error("malformed {rtype} record: {message}")]
    MalformedRecord {
        /// Record type mnemonic.
        rtype: String,
        /// Error description.
        message: String,
    },

    /// A raw IPv4/UDP datagram whose headers are inconsistent or not UDP.
    #[error("malformed datagram: {reason}")]
    MalformedPacket {
        /// Description of the fault.
        reason: String,
    },

    // =========================================================================
    // Encoding Errors
    // =========================================================================
    /// A label or the whole encoded name exceeds its RFC 1035 limit.
    #[error("name too long: {length} bytes exceeds maximum of {max}")]
    NameTooLong {
        /// Offending length in bytes.
        length: usize,
        /// The limit that was exceeded (63 for labels, 255 for names).
        max: usize,
    },

    /// A section holds more entries than its 16-bit header count can express.
    #[error("too many entries in {section} section: {count}")]
    TooManyEntries {
        /// Section name.
        section: &'static str,
        /// Number of entries supplied.
        count: usize,
    },

    /// A raw datagram would not fit the 16-bit IPv4 total length field.
    #[error("payload too large: {size} bytes exceeds maximum of {max}")]
    PayloadTooLarge {
        /// Payload size in bytes.
        size: usize,
        /// Largest payload accepted.
        max: usize,
    },

    // =========================================================================
    // Address Errors
    // =========================================================================
    /// The reverse-name builder was given a non-conforming address literal.
    #[error("invalid address {input:?}: {reason}")]
    InvalidAddress {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl Error {
    /// Creates a new `TruncatedBuffer` error.
    #[inline]
    pub fn truncated(offset: usize, needed: usize, len: usize) -> Self {
        Self::TruncatedBuffer {
            offset,
            needed,
            len,
        }
    }

    /// Creates a new `MalformedName` error.
    #[inline]
    pub fn malformed_name(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedName {
            offset,
            reason: reason.into(),
        }
    }

    /// Creates a new `MalformedRecord` error.
    #[inline]
    pub fn malformed_record(rtype: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            rtype: rtype.into(),
            message: message.into(),
        }
    }

    /// Creates a new `MalformedPacket` error.
    #[inline]
    pub fn malformed_packet(reason: impl Into<String>) -> Self {
        Self::MalformedPacket {
            reason: reason.into(),
        }
    }

    /// Creates a new `NameTooLong` error.
    #[inline]
    pub fn name_too_long(length: usize, max: usize) -> Self {
        Self::NameTooLong { length, max }
    }

    /// Creates a new `InvalidAddress` error.
    #[inline]
    pub fn invalid_address(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error was caused by the bytes received rather
    /// than by the caller's input.
    #[inline]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::TruncatedBuffer { .. }
                | Self::MalformedName { .. }
                | Self::MalformedRecord { .. }
                | Self::MalformedPacket { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::truncated(10, 4, 12);
        assert_eq!(
            err.to_string(),
            "truncated buffer: reading 4 bytes at offset 10 exceeds length 12"
        );

        let err = Error::name_too_long(64, 63);
        assert_eq!(err.to_string(), "name too long: 64 bytes exceeds maximum of 63");

        let err = Error::invalid_address("1.2.3", "expected 4 octets");
        assert_eq!(err.to_string(), "invalid address \"1.2.3\": expected 4 octets");
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::truncated(0, 12, 3).is_malformed());
        assert!(Error::malformed_name(12, "pointer loop").is_malformed());
        assert!(Error::malformed_record("A", "bad length").is_malformed());
        assert!(Error::malformed_packet("not UDP").is_malformed());
        assert!(!Error::name_too_long(300, 255).is_malformed());
        assert!(!Error::invalid_address("x", "y").is_malformed());
    }
}
