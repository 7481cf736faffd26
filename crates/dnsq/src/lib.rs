//! # dnsq
//!
//! Client-side plumbing for the `dnsq` lookup tool: turning a host argument
//! into a question, moving encoded requests over UDP or a raw IPv4 socket,
//! and rendering decoded responses.
//!
//! The wire codec itself lives in `dnsq-proto`; nothing here touches bytes
//! beyond handing them to a socket.

pub mod lookup;
pub mod output;
pub mod tracing_setup;
pub mod transport;

pub use lookup::{build_question, lookup, Reply};
pub use output::OutputFormat;
pub use transport::{RawTransport, Transport, TransportError, UdpTransport};
