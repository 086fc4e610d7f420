//! Kademlia distance calculations.

use crate::domain::{Distance, NodeId, NODE_ID_LEN};

/// Calculate the XOR distance between two NodeIds.
///
/// # Properties
/// - Symmetric: `xor_distance(a, b) == xor_distance(b, a)`
/// - Self is zero: `xor_distance(a, a) == Distance::ZERO`
/// - Totally ordered as an unsigned big-endian integer
///
/// Both operands are fixed-width, so a width mismatch cannot be expressed.
pub fn xor_distance(a: &NodeId, b: &NodeId) -> Distance {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut out = [0u8; NODE_ID_LEN];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = a_bytes[i] ^ b_bytes[i];
    }
    Distance(out)
}

/// Bucket a remote node falls into relative to the local node.
///
/// Index of the first differing bit, `None` when the ids are equal.
#[inline]
pub fn bucket_for_peer(local: &NodeId, remote: &NodeId) -> Option<usize> {
    xor_distance(local, remote).bucket_index()
}
