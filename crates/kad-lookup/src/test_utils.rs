//! Test utilities for node lookup.
//!
//! In-memory stand-ins for the outbound ports so the coordinator can be
//! driven deterministically. Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust
//! use kad_lookup::test_utils::{MockTransport, StaticPeers};
//! use kad_lookup::{NodeId, PeerInfo};
//!
//! let a = PeerInfo::new(NodeId::new([1u8; 32]), "10.0.0.1:4000".parse().unwrap());
//! let b = PeerInfo::new(NodeId::new([2u8; 32]), "10.0.0.2:4000".parse().unwrap());
//!
//! let transport = MockTransport::new();
//! transport.respond(&a, vec![b.clone()]);
//! transport.time_out(&b);
//!
//! let routing = StaticPeers::new(vec![a]);
//! assert_eq!(routing.reads(), 0);
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{Message, NodeId, PeerInfo, TransportError};
use crate::ports::{ClosestPeers, Connection, Transport};

/// How a scripted peer reacts to being queried.
#[derive(Debug, Clone)]
pub enum PeerBehavior {
    /// Answer a lookup with `peers` after `latency`.
    Respond {
        /// Candidates returned.
        peers: Vec<PeerInfo>,
        /// Delay before answering.
        latency: Duration,
    },
    /// Accept the connection but never answer.
    Silent,
    /// Refuse the connection.
    RefuseDial,
    /// Answer with this message instead of a lookup response.
    Reply(Message),
}

/// Scripted in-memory transport.
///
/// Peers are addressed by `SocketAddr`. Unknown addresses refuse the dial.
/// Every dial is recorded, and the number of connections open at once is
/// tracked so tests can check the lookup's parallelism bound.
#[derive(Debug, Default)]
pub struct MockTransport {
    behaviors: Mutex<HashMap<SocketAddr, PeerBehavior>>,
    dials: Mutex<Vec<SocketAddr>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockTransport {
    /// Create a transport with no scripted peers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an arbitrary behavior for `peer`.
    pub fn set_behavior(&self, peer: &PeerInfo, behavior: PeerBehavior) {
        self.behaviors.lock().insert(peer.addr, behavior);
    }

    /// `peer` answers immediately with `peers`.
    pub fn respond(&self, peer: &PeerInfo, peers: Vec<PeerInfo>) {
        self.respond_after(peer, Duration::ZERO, peers);
    }

    /// `peer` answers with `peers` after `latency`.
    pub fn respond_after(&self, peer: &PeerInfo, latency: Duration, peers: Vec<PeerInfo>) {
        self.set_behavior(peer, PeerBehavior::Respond { peers, latency });
    }

    /// `peer` accepts the connection and never answers.
    pub fn time_out(&self, peer: &PeerInfo) {
        self.set_behavior(peer, PeerBehavior::Silent);
    }

    /// `peer` refuses connections.
    pub fn refuse(&self, peer: &PeerInfo) {
        self.set_behavior(peer, PeerBehavior::RefuseDial);
    }

    /// `peer` answers lookups with `message`.
    pub fn reply_with(&self, peer: &PeerInfo, message: Message) {
        self.set_behavior(peer, PeerBehavior::Reply(message));
    }

    /// Every address dialed, in dial order.
    pub fn dialed(&self) -> Vec<SocketAddr> {
        self.dials.lock().clone()
    }

    /// Number of times `peer` was dialed.
    pub fn dial_count(&self, peer: &PeerInfo) -> usize {
        self.dials.lock().iter().filter(|a| **a == peer.addr).count()
    }

    /// Total number of dials.
    pub fn total_dials(&self) -> usize {
        self.dials.lock().len()
    }

    /// Most connections that were open at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn dial(&self, addr: SocketAddr) -> Result<Box<dyn Connection>, TransportError> {
        self.dials.lock().push(addr);

        let behavior = self
            .behaviors
            .lock()
            .get(&addr)
            .cloned()
            .unwrap_or(PeerBehavior::RefuseDial);

        if let PeerBehavior::RefuseDial = behavior {
            return Err(TransportError::DialFailed {
                addr: addr.to_string(),
                reason: "connection refused".into(),
            });
        }

        let open = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(open, Ordering::SeqCst);

        Ok(Box::new(MockConnection {
            behavior,
            _guard: InFlightGuard(Arc::clone(&self.in_flight)),
        }))
    }
}

/// Decrements the open-connection count when the connection is dropped.
#[derive(Debug)]
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
struct MockConnection {
    behavior: PeerBehavior,
    _guard: InFlightGuard,
}

#[async_trait]
impl Connection for MockConnection {
    async fn request(
        &mut self,
        message: Message,
        timeout: Duration,
    ) -> Result<Message, TransportError> {
        match message {
            Message::Ping => return Ok(Message::Pong),
            Message::LookupRequest { .. } => {}
            _ => return Err(TransportError::Codec("not a request".into())),
        }

        match &self.behavior {
            PeerBehavior::Respond { peers, latency } => {
                if *latency >= timeout {
                    tokio::time::sleep(timeout).await;
                    return Err(TransportError::Timeout);
                }
                if !latency.is_zero() {
                    tokio::time::sleep(*latency).await;
                }
                Ok(Message::LookupResponse {
                    peers: peers.clone(),
                })
            }
            PeerBehavior::Silent => {
                tokio::time::sleep(timeout).await;
                Err(TransportError::Timeout)
            }
            PeerBehavior::Reply(reply) => Ok(reply.clone()),
            PeerBehavior::RefuseDial => Err(TransportError::ConnectionClosed),
        }
    }
}

/// Routing table stand-in that returns a fixed seed list.
///
/// The list comes back verbatim: `count` is ignored, so a test can seed a
/// lookup with more than `alpha` peers.
#[derive(Debug, Default)]
pub struct StaticPeers {
    peers: Vec<PeerInfo>,
    reads: AtomicUsize,
}

impl StaticPeers {
    /// Seed list returned on every read.
    pub fn new(peers: Vec<PeerInfo>) -> Self {
        Self {
            peers,
            reads: AtomicUsize::new(0),
        }
    }

    /// Empty routing table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of times the table was read.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ClosestPeers for StaticPeers {
    fn find_closest_peers(&self, _target: &NodeId, _count: usize) -> Vec<PeerInfo> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.peers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_peer(last_octet: u8) -> PeerInfo {
        let addr: SocketAddr = ([10, 0, 0, last_octet], 4000).into();
        PeerInfo::new(NodeId::new([last_octet; 32]), addr)
    }

    #[tokio::test]
    async fn test_unknown_peer_refuses_dial() {
        let transport = MockTransport::new();
        let result = transport.dial(make_peer(1).addr).await;

        assert!(matches!(result, Err(TransportError::DialFailed { .. })));
        assert_eq!(transport.total_dials(), 1);
        assert_eq!(transport.peak_in_flight(), 0);
    }

    #[tokio::test]
    async fn test_scripted_response_is_returned() {
        let transport = MockTransport::new();
        let a = make_peer(1);
        transport.respond(&a, vec![make_peer(2)]);

        let mut conn = transport.dial(a.addr).await.unwrap();
        let reply = conn
            .request(
                Message::LookupRequest {
                    target: NodeId::zero(),
                },
                Duration::from_secs(1),
            )
            .await
            .unwrap();

        assert_eq!(
            reply,
            Message::LookupResponse {
                peers: vec![make_peer(2)]
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_peer_times_out() {
        let transport = MockTransport::new();
        let a = make_peer(1);
        transport.time_out(&a);

        let mut conn = transport.dial(a.addr).await.unwrap();
        let result = conn
            .request(
                Message::LookupRequest {
                    target: NodeId::zero(),
                },
                Duration::from_secs(3),
            )
            .await;

        assert_eq!(result, Err(TransportError::Timeout));
    }

    #[tokio::test]
    async fn test_in_flight_released_on_drop() {
        let transport = MockTransport::new();
        let a = make_peer(1);
        transport.respond(&a, Vec::new());

        let first = transport.dial(a.addr).await.unwrap();
        let second = transport.dial(a.addr).await.unwrap();
        assert_eq!(transport.peak_in_flight(), 2);
        drop(first);
        drop(second);

        let _third = transport.dial(a.addr).await.unwrap();
        assert_eq!(transport.peak_in_flight(), 2);
    }

    #[test]
    fn test_static_peers_ignores_count() {
        let table = StaticPeers::new(vec![make_peer(1), make_peer(2), make_peer(3)]);
        assert_eq!(table.find_closest_peers(&NodeId::zero(), 1).len(), 3);
        assert_eq!(table.reads(), 1);
    }
}
