//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use kad_lookup::{NodeId, PeerInfo};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once. Honors `RUST_LOG`, defaults to `kad_lookup=debug`.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kad_lookup=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Node ID whose first byte is `first_byte`, rest zero.
pub fn node_id(first_byte: u8) -> NodeId {
    let mut bytes = [0u8; 32];
    bytes[0] = first_byte;
    NodeId::new(bytes)
}

/// Peer with `node_id(first_byte)` at `10.0.0.<first_byte>:4000`.
pub fn peer(first_byte: u8) -> PeerInfo {
    let addr: SocketAddr = ([10, 0, 0, first_byte], 4000).into();
    PeerInfo::new(node_id(first_byte), addr)
}

/// First ID byte of every peer, in order.
pub fn first_bytes(peers: &[PeerInfo]) -> Vec<u8> {
    peers.iter().map(|p| p.node_id.0[0]).collect()
}
