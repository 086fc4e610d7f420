//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces the host application implements for the lookup.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{LookupConfig, Message, NodeId, PeerInfo, TransportError};

/// Abstract interface for opening connections to peers.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: every query of a lookup runs as
/// its own task and dials through a shared handle.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct TcpTransport;
///
/// #[async_trait]
/// impl Transport for TcpTransport {
///     async fn dial(&self, addr: SocketAddr) -> Result<Box<dyn Connection>, TransportError> {
///         let stream = tokio::net::TcpStream::connect(addr).await?;
///         Ok(Box::new(TcpConnection::new(stream)))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a connection to `addr`.
    async fn dial(&self, addr: SocketAddr) -> Result<Box<dyn Connection>, TransportError>;
}

/// An established connection that carries request/response exchanges.
#[async_trait]
pub trait Connection: Send {
    /// Send `message` and wait at most `timeout` for the single reply.
    ///
    /// # Errors
    ///
    /// `TransportError::Timeout` if no reply arrives in time, any other
    /// variant on send/receive failure.
    async fn request(
        &mut self,
        message: Message,
        timeout: Duration,
    ) -> Result<Message, TransportError>;
}

/// Read-only view of the local routing table.
///
/// A lookup reads it exactly once, to seed, and never writes it.
pub trait ClosestPeers: Send + Sync {
    /// Up to `count` locally known peers, closest to `target` first.
    ///
    /// Must be local and non-blocking.
    fn find_closest_peers(&self, target: &NodeId, count: usize) -> Vec<PeerInfo>;
}

/// Abstract interface for configuration loading.
pub trait ConfigProvider: Send + Sync {
    /// Lookup parameters (k, alpha, timeouts, frontier policy).
    fn get_lookup_config(&self) -> LookupConfig;
}
