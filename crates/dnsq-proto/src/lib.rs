//! # dnsq DNS Protocol Library
//!
//! This crate translates between symbolic DNS queries and the DNS wire format
//! (RFC 1035), and decodes untrusted responses received from the network.
//!
//! ## Features
//!
//! - **Bounds-checked decoding** of every section, with a single cursor
//!   threaded through each sub-parse
//! - **Name compression** with backward-only pointers and a bounded jump count
//! - **Typed RDATA** for A, AAAA, NS, CNAME, PTR and SOA; every other type is
//!   carried through as opaque bytes
//! - **Reverse names** (`in-addr.arpa` / `ip6.arpa`) from address literals
//! - **Raw datagrams**: IPv4 + UDP headers with checksums for raw sockets
//!
//! ## Example
//!
//! ```rust
//! use dnsq_proto::{Message, OpCode, Question, RecordType};
//! use std::str::FromStr;
//!
//! let question = Question::new(
//!     dnsq_proto::Name::from_str("example.com").unwrap(),
//!     RecordType::A,
//! );
//! let wire = Message::encode_request(0x0001, OpCode::Query, true, &[question]).unwrap();
//! let parsed = Message::parse(&wire).unwrap();
//! assert_eq!(parsed.id(), 0x0001);
//! assert_eq!(parsed.questions()[0].qname.to_dotted(), "example.com");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod class;
pub mod error;
pub mod header;
pub mod message;
pub mod name;
pub mod opcode;
pub mod packet;
pub mod question;
pub mod rcode;
pub mod rdata;
pub mod record;
pub mod reverse;
pub mod rtype;
pub mod wire;

// Re-exports for convenience
pub use class::Class;
pub use error::{Error, Result};
pub use header::{Header, HeaderFlags};
pub use message::Message;
pub use name::{Name, NameParser};
pub use opcode::OpCode;
pub use packet::{UdpDatagram, UdpPacketBuilder};
pub use question::Question;
pub use rcode::ResponseCode;
pub use rdata::RData;
pub use record::ResourceRecord;
pub use rtype::{RecordType, Type};

/// Maximum length of a DNS label (63 bytes per RFC 1035)
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of a domain name in wire format (255 bytes per RFC 1035)
pub const MAX_NAME_LENGTH: usize = 255;
