//! Resolver configuration.

use super::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Smallest response buffer accepted (the classic UDP message limit).
pub const MIN_RESPONSE_SIZE: usize = 512;

/// Largest response buffer accepted (one UDP datagram).
pub const MAX_RESPONSE_SIZE: usize = 65535;

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Server to query.
    pub server: IpAddr,

    /// Server port.
    pub port: u16,

    /// Time to wait for a response (milliseconds).
    pub timeout_ms: u64,

    /// Set the RD bit on requests.
    pub recursion_desired: bool,

    /// Receive buffer size in bytes.
    pub max_response_size: usize,

    /// How requests are sent.
    pub transport: TransportKind,

    /// Local IPv4 address written into raw datagrams.
    pub source_address: Option<Ipv4Addr>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            server: IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
            port: 53,
            timeout_ms: 1000,
            recursion_desired: true,
            max_response_size: 4096,
            transport: TransportKind::Udp,
            source_address: None,
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "resolver.timeout_ms".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if !(MIN_RESPONSE_SIZE..=MAX_RESPONSE_SIZE).contains(&self.max_response_size) {
            return Err(ConfigError::InvalidValue {
                field: "resolver.max_response_size".to_string(),
                message: format!(
                    "must be between {MIN_RESPONSE_SIZE} and {MAX_RESPONSE_SIZE}, got {}",
                    self.max_response_size
                ),
            });
        }

        if self.transport == TransportKind::Raw && !self.server.is_ipv4() {
            return Err(ConfigError::Validation(
                "Raw transport requires an IPv4 server".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server, self.port)
    }
}

/// Transport used to reach the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Ordinary UDP socket.
    #[default]
    Udp,

    /// Raw IPv4 socket with hand-built IP and UDP headers.
    Raw,
}
