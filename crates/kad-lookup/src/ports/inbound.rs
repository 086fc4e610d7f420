//! # Driving Ports (Inbound API)
//!
//! The API this subsystem exposes to the rest of the node.

use async_trait::async_trait;

use crate::domain::{NodeId, PeerInfo};

/// Primary API for running node lookups.
///
/// Neither method returns an error. "No peers found" is an ordinary outcome
/// (an empty routing table early in bootstrap, every peer timing out) and
/// comes back as an empty vector.
///
/// # Example
///
/// ```rust,ignore
/// use kad_lookup::ports::NodeLookupApi;
///
/// async fn refresh<T: NodeLookupApi>(api: &T, target: NodeId) {
///     let closest = api.lookup(target).await;
///     println!("Found {} peers", closest.len());
/// }
/// ```
#[async_trait]
pub trait NodeLookupApi: Send + Sync {
    /// Find the peers closest to `target`.
    ///
    /// # Returns
    ///
    /// At most `k` peers, unique by identifier, sorted by ascending XOR
    /// distance to `target`.
    async fn lookup(&self, target: NodeId) -> Vec<PeerInfo>;

    /// Look up the local node's own identifier.
    ///
    /// This is how a joining node learns its neighbourhood.
    async fn bootstrap(&self) -> Vec<PeerInfo>;
}
