//! # Node Lookup Service
//!
//! Wires the domain lookup state machine to the transport and routing-table
//! ports and implements the `NodeLookupApi` driving port.
//!
//! - `query` - one outbound lookup request, failures absorbed
//! - `lookup` - the alpha-bounded iterative coordinator
//! - `core` / `api` - the service handle consumers hold

// Semantic submodules
mod api;
mod core;
mod lookup;
mod query;

// Re-export public API
pub use self::core::LookupService;
pub use lookup::iterative_lookup;
pub use query::query_peer;
