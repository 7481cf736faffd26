//! Opaque record data for types the codec does not interpret.

use crate::wire::WireWriter;
use data_encoding::HEXLOWER;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unknown record type - preserves raw RDATA.
///
/// Rendered per RFC 3597 as `\# <length> <hex-data>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unknown {
    /// The record type code.
    type_code: u16,
    /// The raw RDATA bytes, hex encoded when serialized.
    #[serde(serialize_with = "to_hex", deserialize_with = "from_hex")]
    data: Vec<u8>,
}

impl Unknown {
    /// Creates a new unknown record type.
    pub fn new(type_code: u16, data: impl Into<Vec<u8>>) -> Self {
        Self {
            type_code,
            data: data.into(),
        }
    }

    /// Returns the record type code.
    #[inline]
    pub const fn type_code(&self) -> u16 {
        self.type_code
    }

    /// Returns the raw RDATA.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the RDATA as a hex string.
    pub fn data_hex(&self) -> String {
        HEXLOWER.encode(&self.data)
    }

    /// Returns the wire format length.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.data.len()
    }

    /// Writes the raw RDATA.
    pub fn write_to(&self, writer: &mut WireWriter) {
        writer.write_bytes(&self.data);
    }
}

impl fmt::Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.is_empty() {
            return f.write_str("\\# 0");
        }
        write!(f, "\\# {} {}", self.data.len(), self.data_hex())
    }
}

fn to_hex<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&HEXLOWER.encode(data))
}

fn from_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    HEXLOWER
        .decode(s.as_bytes())
        .map_err(serde::de::Error::custom)
}
