//! DNS record classes.
//!
//! Queries built by this crate always ask for IN; any other class seen in a
//! response is carried through as its numeric value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric value of the Internet class (RFC 1035 Section 3.2.4).
const CLASS_IN: u16 = 1;

/// Class of a question or resource record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Class {
    /// Internet.
    #[default]
    IN,
    /// Any other class value, kept verbatim.
    Unknown(u16),
}

impl Class {
    /// Creates a class from its wire value.
    #[inline]
    pub const fn from_u16(value: u16) -> Self {
        match value {
            CLASS_IN => Self::IN,
            other => Self::Unknown(other),
        }
    }

    /// Returns the wire value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::IN => CLASS_IN,
            Self::Unknown(v) => v,
        }
    }
}

impl From<u16> for Class {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IN => f.write_str("IN"),
            Self::Unknown(v) => write!(f, "CLASS{v}"),
        }
    }
}
