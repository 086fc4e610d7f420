//! # Kademlia Node Lookup
//!
//! Iterative, alpha-bounded node lookup for a Kademlia-style overlay.
//!
//! Given a target identifier, the lookup seeds itself from the local routing
//! table, asks up to `alpha` peers at a time for the peers they know closest
//! to the target, folds every previously unseen answer back in, and stops once
//! no query is outstanding. The result is every peer seen, ranked by XOR
//! distance to the target and cut to the bucket capacity `k`.
//!
//! A peer that times out, refuses the connection, or answers with garbage
//! contributes nothing, exactly like a peer that knows nobody. The lookup
//! itself never fails.
//!
//! ## Architecture
//!
//! - **Domain Layer:** identifiers, XOR metric, ranking, lookup state machine
//! - **Ports Layer:** `NodeLookupApi` (driving), `Transport` / `ClosestPeers` /
//!   `ConfigProvider` (driven)
//! - **Service Layer:** query primitive and the iterative coordinator
//! - **Adapters Layer:** in-memory routing table, config providers, and the
//!   TCP transport and responder behind the `network` feature
//!
//! ## Example
//!
//! ```rust
//! use kad_lookup::{find_k_closest, xor_distance, NodeId, PeerInfo};
//!
//! let target = NodeId::new([0u8; 32]);
//! let near = PeerInfo::new(NodeId::new([1u8; 32]), "10.0.0.1:4000".parse().unwrap());
//! let far = PeerInfo::new(NodeId::new([0xffu8; 32]), "10.0.0.2:4000".parse().unwrap());
//!
//! assert!(xor_distance(&near.node_id, &target) < xor_distance(&far.node_id, &target));
//!
//! let closest = find_k_closest(&[far, near.clone()], &target, 1);
//! assert_eq!(closest, vec![near]);
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod domain;
pub mod ports;
pub mod service;

/// Adapters for the outbound ports.
/// Wire adapters require feature: `network`
pub mod adapters;

/// Test utilities (MockTransport, StaticPeers)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// CORE RE-EXPORTS (Always Available)
// =============================================================================

// Domain entities
pub use domain::{
    ConfigError, Distance, FrontierPolicy, IdentifierError, LookupConfig, LookupState,
    LookupStats, Message, NodeId, PeerInfo, TransportError, BUCKET_SIZE, DEFAULT_ALPHA,
    DEFAULT_QUERY_TIMEOUT, NODE_ID_LEN,
};

// Domain services
pub use domain::{bucket_for_peer, find_k_closest, sort_peers_by_distance, xor_distance};

// Port traits
pub use ports::{ClosestPeers, ConfigProvider, Connection, NodeLookupApi, Transport};

// Service
pub use service::{iterative_lookup, query_peer, LookupService};

// =============================================================================
// ADAPTER RE-EXPORTS
// =============================================================================

pub use adapters::{InMemoryRoutingTable, StaticConfigProvider};

// Network adapters (tokio net + toml)
#[cfg(feature = "network")]
pub use adapters::{LookupResponder, TcpConnection, TcpTransport, TomlConfigProvider};

// =============================================================================
// TEST UTILITIES (Requires `test-utils` feature)
// =============================================================================

#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::{MockTransport, PeerBehavior, StaticPeers};
