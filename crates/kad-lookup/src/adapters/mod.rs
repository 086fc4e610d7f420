//! # Adapters
//!
//! Concrete implementations of the outbound ports.
//!
//! - `routing` - in-memory routing table (`ClosestPeers`)
//! - `network` - config providers; TCP transport and lookup responder
//!   behind the `network` feature

pub mod network;
pub mod routing;

pub use network::StaticConfigProvider;
pub use routing::InMemoryRoutingTable;

#[cfg(feature = "network")]
pub use network::{LookupResponder, TcpConnection, TcpTransport, TomlConfigProvider};
