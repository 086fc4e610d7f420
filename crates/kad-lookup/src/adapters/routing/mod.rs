//! Routing table adapters.

mod memory;

pub use memory::InMemoryRoutingTable;
