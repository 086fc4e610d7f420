use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;

use super::codec::{read_frame, write_frame};
use crate::domain::{LookupConfig, Message, TransportError};
use crate::ports::{Connection, Transport};

// ============================================================================
// TcpTransport - Production TCP dialer (requires "network" feature)
// ============================================================================

/// TCP transport for lookup queries.
///
/// One connection per query: dial, send one framed request, read one framed
/// reply. Wire format is described in `codec`.
#[derive(Debug, Clone, Copy)]
pub struct TcpTransport {
    connect_timeout: Duration,
}

impl TcpTransport {
    /// Create a transport that gives up on connection attempts after `connect_timeout`.
    #[must_use]
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    /// Create a transport using `config.connect_timeout`.
    #[must_use]
    pub fn from_config(config: &LookupConfig) -> Self {
        Self::new(config.connect_timeout)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn dial(&self, addr: SocketAddr) -> Result<Box<dyn Connection>, TransportError> {
        let stream = match tokio::time::timeout(self.connect_timeout, TcpStream::connect(addr)).await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => {
                return Err(TransportError::DialFailed {
                    addr: addr.to_string(),
                    reason: err.to_string(),
                })
            }
            Err(_) => {
                return Err(TransportError::DialFailed {
                    addr: addr.to_string(),
                    reason: "connect timed out".into(),
                })
            }
        };
        // Requests are single small frames; don't wait to coalesce them.
        stream.set_nodelay(true)?;
        Ok(Box::new(TcpConnection::new(stream)))
    }
}

/// An open TCP connection to one peer.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl TcpConnection {
    /// Wrap an established stream.
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Remote address of the connection.
    pub fn peer_addr(&self) -> std::io::Result<SocketAddr> {
        self.stream.peer_addr()
    }
}

#[async_trait]
impl Connection for TcpConnection {
    async fn request(
        &mut self,
        message: Message,
        timeout: Duration,
    ) -> Result<Message, TransportError> {
        let exchange = async {
            write_frame(&mut self.stream, &message).await?;
            read_frame(&mut self.stream)
                .await?
                .ok_or(TransportError::ConnectionClosed)
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout)?
    }
}
