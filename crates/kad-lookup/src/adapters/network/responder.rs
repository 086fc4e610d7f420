use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::codec::{read_frame, write_frame};
use crate::domain::{LookupConfig, Message, TransportError, DEFAULT_QUERY_TIMEOUT};
use crate::ports::ClosestPeers;

/// Pause after a failed `accept` before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Source of inbound connections for the accept loop.
#[async_trait]
pub(crate) trait Acceptor: Send {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    async fn accept(&mut self) -> std::io::Result<(Self::Stream, SocketAddr)>;
}

#[async_trait]
impl Acceptor for TcpListener {
    type Stream = tokio::net::TcpStream;

    async fn accept(&mut self) -> std::io::Result<(Self::Stream, SocketAddr)> {
        TcpListener::accept(self).await
    }
}

/// Answers lookup requests from remote peers out of a local routing table.
///
/// - `LookupRequest { target }` → `LookupResponse` with the `k` closest known peers
/// - `Ping` → `Pong`
///
/// Each accepted connection is served on its own task until the remote side
/// closes it, sends something that is not a request, or stays silent for
/// longer than the idle timeout.
pub struct LookupResponder {
    routing: Arc<dyn ClosestPeers>,
    k: usize,
    idle_timeout: Duration,
}

impl LookupResponder {
    /// Create a responder answering with at most `k` peers.
    ///
    /// Idle connections are dropped after `DEFAULT_QUERY_TIMEOUT`.
    pub fn new(routing: Arc<dyn ClosestPeers>, k: usize) -> Self {
        Self {
            routing,
            k,
            idle_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Create a responder using `config.k` and `config.query_timeout` as the idle timeout.
    pub fn from_config(routing: Arc<dyn ClosestPeers>, config: &LookupConfig) -> Self {
        Self::new(routing, config.k).with_idle_timeout(config.query_timeout)
    }

    /// How long a connection may wait for its next complete frame.
    #[must_use]
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Build the reply to one inbound message, `None` for non-requests.
    pub fn respond(&self, message: &Message) -> Option<Message> {
        match message {
            Message::LookupRequest { target } => Some(Message::LookupResponse {
                peers: self.routing.find_closest_peers(target, self.k),
            }),
            Message::Ping => Some(Message::Pong),
            Message::Pong | Message::LookupResponse { .. } => None,
        }
    }

    /// Accept connections on `listener` forever.
    ///
    /// A failed `accept` (descriptor exhaustion, an aborted handshake) is
    /// logged and retried after a short pause; it never stops the loop.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) {
        self.serve_on(listener).await
    }

    /// Run `serve` on a background task.
    pub fn spawn(self: Arc<Self>, listener: TcpListener) -> JoinHandle<()> {
        tokio::spawn(self.serve(listener))
    }

    pub(crate) async fn serve_on<A: Acceptor>(self: Arc<Self>, mut acceptor: A) {
        loop {
            let (stream, remote) = match acceptor.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    warn!(kind = ?err.kind(), "[kad] accept failed, retrying: {err}");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            trace!(%remote, "[kad] accepted lookup connection");
            let responder = Arc::clone(&self);
            tokio::spawn(async move {
                if let Err(err) = responder.handle_connection(stream).await {
                    debug!(%remote, kind = err.kind(), "[kad] lookup connection ended: {err}");
                }
            });
        }
    }

    async fn handle_connection<S>(&self, mut stream: S) -> Result<(), TransportError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        loop {
            let next = tokio::time::timeout(self.idle_timeout, read_frame(&mut stream))
                .await
                .map_err(|_| TransportError::Timeout)?;
            let Some(message) = next? else {
                return Ok(());
            };
            let Some(reply) = self.respond(&message) else {
                warn!(got = message.name(), "[kad] unexpected inbound message, closing");
                return Ok(());
            };
            write_frame(&mut stream, &reply).await?;
        }
    }
}
