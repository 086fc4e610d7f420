//! Lookup protocol messages
//!
//! The shapes exchanged with a remote peer. Encoding is an adapter concern.

use super::entities::{NodeId, PeerInfo};

/// A request or response exchanged with a remote peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Liveness probe.
    Ping,
    /// Answer to a `Ping`.
    Pong,
    /// Ask a peer for the peers it knows closest to `target`.
    LookupRequest {
        /// Identifier being looked up.
        target: NodeId,
    },
    /// Answer to a `LookupRequest`. May be empty.
    LookupResponse {
        /// Candidate peers, each dialable.
        peers: Vec<PeerInfo>,
    },
}

impl Message {
    /// Short label for structured logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Pong => "pong",
            Self::LookupRequest { .. } => "lookup_request",
            Self::LookupResponse { .. } => "lookup_response",
        }
    }
}
