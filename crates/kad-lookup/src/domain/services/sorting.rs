//! Peer sorting and selection.

use super::distance::xor_distance;
use crate::domain::{NodeId, PeerInfo};

/// Sort peers in place by XOR distance to `target`, closest first.
///
/// The sort is stable: peers at equal distance keep their relative order,
/// and any such peers end up adjacent.
pub fn sort_peers_by_distance(peers: &mut [PeerInfo], target: &NodeId) {
    peers.sort_by_cached_key(|peer| xor_distance(&peer.node_id, target));
}

/// Rank a copy of `peers` against `target` and keep the first `k`.
///
/// Ties keep input order, so the cut at `k` is deterministic.
pub fn find_k_closest(peers: &[PeerInfo], target: &NodeId, k: usize) -> Vec<PeerInfo> {
    let mut sorted = peers.to_vec();
    sort_peers_by_distance(&mut sorted, target);
    sorted.truncate(k);
    sorted
}
