//! # Network Adapters
//!
//! ## Adapters Provided
//!
//! - `StaticConfigProvider` - hardcoded lookup parameters
//! - `TomlConfigProvider` - config file loading (requires "network" feature)
//! - `TcpTransport` / `TcpConnection` - framed TCP queries (requires "network" feature)
//! - `LookupResponder` - answers inbound lookups from a routing table (requires "network" feature)

// Semantic submodules
/// Configuration providers
pub mod config;

/// Wire format
#[cfg(feature = "network")]
pub mod codec;
/// Inbound lookup server
#[cfg(feature = "network")]
pub mod responder;
/// Outbound TCP transport
#[cfg(feature = "network")]
pub mod transport;

// Re-export public API
pub use config::StaticConfigProvider;

#[cfg(feature = "network")]
pub use codec::MessageType;
#[cfg(feature = "network")]
pub use config::TomlConfigProvider;
#[cfg(feature = "network")]
pub use responder::LookupResponder;
#[cfg(feature = "network")]
pub use transport::{TcpConnection, TcpTransport};
