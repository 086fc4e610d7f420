use parking_lot::RwLock;

use crate::domain::{find_k_closest, NodeId, PeerInfo};
use crate::ports::ClosestPeers;

/// Flat, lock-protected peer list implementing the `ClosestPeers` port.
///
/// No buckets and no eviction: every inserted peer is kept until removed.
/// Enough to seed lookups and to answer remote lookup requests; bucket
/// maintenance belongs to a real routing table.
#[derive(Debug, Default)]
pub struct InMemoryRoutingTable {
    peers: RwLock<Vec<PeerInfo>>,
}

impl InMemoryRoutingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding `peers`.
    pub fn with_peers<I>(peers: I) -> Self
    where
        I: IntoIterator<Item = PeerInfo>,
    {
        let table = Self::new();
        for peer in peers {
            table.insert(peer);
        }
        table
    }

    /// Add a peer, replacing any entry with the same node ID.
    ///
    /// Returns `true` if the node ID was not present before.
    pub fn insert(&self, peer: PeerInfo) -> bool {
        let mut peers = self.peers.write();
        match peers.iter_mut().find(|p| p.node_id == peer.node_id) {
            Some(existing) => {
                *existing = peer;
                false
            }
            None => {
                peers.push(peer);
                true
            }
        }
    }

    /// Remove a peer by node ID. Returns the removed entry.
    pub fn remove(&self, node_id: &NodeId) -> Option<PeerInfo> {
        let mut peers = self.peers.write();
        let index = peers.iter().position(|p| p.node_id == *node_id)?;
        Some(peers.swap_remove(index))
    }

    /// Snapshot of every peer.
    pub fn peers(&self) -> Vec<PeerInfo> {
        self.peers.read().clone()
    }

    /// Number of peers held.
    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    /// True if the table holds no peers.
    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }
}

impl ClosestPeers for InMemoryRoutingTable {
    fn find_closest_peers(&self, target: &NodeId, count: usize) -> Vec<PeerInfo> {
        find_k_closest(&self.peers.read(), target, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    fn make_peer(first_byte: u8, port: u16) -> PeerInfo {
        let mut bytes = [0u8; 32];
        bytes[0] = first_byte;
        let addr: SocketAddr = ([127, 0, 0, 1], port).into();
        PeerInfo::new(NodeId::new(bytes), addr)
    }

    #[test]
    fn test_insert_replaces_same_node_id() {
        let table = InMemoryRoutingTable::new();
        assert!(table.insert(make_peer(1, 1000)));
        assert!(!table.insert(make_peer(1, 2000)));

        assert_eq!(table.len(), 1);
        assert_eq!(table.peers()[0].addr.port(), 2000);
    }

    #[test]
    fn test_remove_peer() {
        let table = InMemoryRoutingTable::with_peers(vec![make_peer(1, 1), make_peer(2, 2)]);
        let removed = table.remove(&make_peer(1, 1).node_id);

        assert_eq!(removed.map(|p| p.addr.port()), Some(1));
        assert_eq!(table.len(), 1);
        assert!(table.remove(&make_peer(9, 9).node_id).is_none());
    }

    #[test]
    fn test_find_closest_peers_sorted_and_capped() {
        let table = InMemoryRoutingTable::with_peers((1..=10).map(|i| make_peer(i, 1000 + i as u16)));

        let closest = table.find_closest_peers(&NodeId::zero(), 3);
        let firsts: Vec<u8> = closest.iter().map(|p| p.node_id.0[0]).collect();
        assert_eq!(firsts, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_table() {
        let table = InMemoryRoutingTable::new();
        assert!(table.is_empty());
        assert!(table.find_closest_peers(&NodeId::zero(), 3).is_empty());
    }
}
