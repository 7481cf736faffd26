//! Request/response transports.
//!
//! A transport takes an encoded request, delivers it to one server, and
//! hands back the raw bytes of the first reply. Timeouts live here; the
//! codec never waits or retries.
//!
//! - [`UdpTransport`]: an ordinary connected UDP socket
//! - [`RawTransport`]: a raw IPv4 socket with hand-built IP and UDP headers

use async_trait::async_trait;
use dnsq_config::resolver::{MAX_RESPONSE_SIZE, MIN_RESPONSE_SIZE};
use dnsq_config::{ResolverConfig, TransportKind};
use dnsq_proto::packet::{parse_ipv4_udp, UdpPacketBuilder, IPV4_HEADER_LEN, UDP_HEADER_LEN};
use rand::Rng;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io::{self, Read};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, trace};

/// Transport error.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Io(#[from] io::Error),

    #[error("response buffer size {0} must be between 512 and 65535")]
    BufferSize(usize),

    #[error("raw transport requires IPv4 addresses, got {0}")]
    AddressFamily(IpAddr),

    #[error("datagram error: {0}")]
    Datagram(#[from] dnsq_proto::Error),
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Delivers one request and returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and waits for the reply.
    async fn exchange(&self, request: &[u8]) -> Result<Vec<u8>>;

    /// Address requests are sent to.
    fn server(&self) -> SocketAddr;
}

fn check_buffer_size(size: usize) -> Result<usize> {
    if (MIN_RESPONSE_SIZE..=MAX_RESPONSE_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(TransportError::BufferSize(size))
    }
}

/// Builds the transport selected by the resolver configuration.
pub fn from_config(config: &ResolverConfig) -> Result<Box<dyn Transport>> {
    let server = config.server_addr();
    match config.transport {
        TransportKind::Udp => Ok(Box::new(UdpTransport::new(
            server,
            config.timeout(),
            config.max_response_size,
        )?)),
        TransportKind::Raw => {
            let SocketAddr::V4(server) = server else {
                return Err(TransportError::AddressFamily(server.ip()));
            };
            let source = match config.source_address {
                Some(addr) => addr,
                None => local_address_for(server)?,
            };
            Ok(Box::new(RawTransport::new(
                server,
                source,
                config.timeout(),
                config.max_response_size,
            )?))
        }
    }
}

// ============================================================================
// UDP
// ============================================================================

/// Plain UDP transport.
#[derive(Debug, Clone)]
pub struct UdpTransport {
    server: SocketAddr,
    timeout: Duration,
    max_response_size: usize,
}

impl UdpTransport {
    /// Creates a UDP transport; `max_response_size` must be within
    /// 512..=65535.
    pub fn new(server: SocketAddr, timeout: Duration, max_response_size: usize) -> Result<Self> {
        Ok(Self {
            server,
            timeout,
            max_response_size: check_buffer_size(max_response_size)?,
        })
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn exchange(&self, request: &[u8]) -> Result<Vec<u8>> {
        let bind: SocketAddr = match self.server {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (std::net::Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(bind).await?;
        socket.connect(self.server).await?;

        socket.send(request).await?;
        trace!(server = %self.server, bytes = request.len(), "request sent");

        let mut buf = vec![0u8; self.max_response_size];
        let len = timeout(self.timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??;

        buf.truncate(len);
        Ok(buf)
    }

    fn server(&self) -> SocketAddr {
        self.server
    }
}

// ============================================================================
// Raw IPv4
// ============================================================================

/// Raw-socket transport.
///
/// Builds the IPv4 and UDP headers itself and reads replies off a raw UDP
/// socket, keeping the first datagram from the server's port to our source
/// port. Needs `CAP_NET_RAW` or root.
#[derive(Debug, Clone)]
pub struct RawTransport {
    server: SocketAddrV4,
    source: Ipv4Addr,
    timeout: Duration,
    max_response_size: usize,
}

impl RawTransport {
    /// Creates a raw transport sending from `source`.
    pub fn new(
        server: SocketAddrV4,
        source: Ipv4Addr,
        timeout: Duration,
        max_response_size: usize,
    ) -> Result<Self> {
        Ok(Self {
            server,
            source,
            timeout,
            max_response_size: check_buffer_size(max_response_size)?,
        })
    }

    fn exchange_blocking(&self, request: &[u8]) -> Result<Vec<u8>> {
        let source_port = rand::thread_rng().gen_range(49152..=65535);
        let source = SocketAddrV4::new(self.source, source_port);

        let datagram = UdpPacketBuilder::new(source, self.server).build(request)?;

        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::UDP))?;
        socket.set_header_included(true)?;
        socket.send_to(&datagram, &SockAddr::from(self.server))?;
        debug!(%source, server = %self.server, bytes = datagram.len(), "raw datagram sent");

        let mut buf = vec![0u8; self.max_response_size + IPV4_HEADER_LEN + UDP_HEADER_LEN];
        let deadline = Instant::now() + self.timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(TransportError::Timeout(self.timeout));
            }
            socket.set_read_timeout(Some(remaining))?;

            let len = match (&socket).read(&mut buf) {
                Ok(len) => len,
                Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                    return Err(TransportError::Timeout(self.timeout));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            // Every inbound UDP datagram on the host shows up here.
            match parse_ipv4_udp(&buf[..len]) {
                Ok(reply) if reply.source == self.server && reply.destination == source => {
                    return Ok(reply.payload.to_vec());
                }
                Ok(other) => trace!(from = %other.source, to = %other.destination, "skipping datagram"),
                Err(e) => trace!(error = %e, "skipping unparseable datagram"),
            }
        }
    }
}

#[async_trait]
impl Transport for RawTransport {
    async fn exchange(&self, request: &[u8]) -> Result<Vec<u8>> {
        let this = self.clone();
        let request = request.to_vec();
        tokio::task::spawn_blocking(move || this.exchange_blocking(&request))
            .await
            .map_err(|e| TransportError::Io(io::Error::new(io::ErrorKind::Other, e)))?
    }

    fn server(&self) -> SocketAddr {
        SocketAddr::V4(self.server)
    }
}

/// Finds the local address the routing table would use to reach `server`.
///
/// Connecting a UDP socket sends nothing.
pub fn local_address_for(server: SocketAddrV4) -> Result<Ipv4Addr> {
    let socket = std::net::UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect(server)?;
    match socket.local_addr()?.ip() {
        IpAddr::V4(addr) => Ok(addr),
        other => Err(TransportError::AddressFamily(other)),
    }
}
