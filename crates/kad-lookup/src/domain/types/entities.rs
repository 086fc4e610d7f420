//! Core Domain Entities for Node Lookup

use std::fmt;
use std::net::SocketAddr;

use super::errors::IdentifierError;

/// Width of a node identifier in bytes.
pub const NODE_ID_LEN: usize = 32;

/// 256-bit node identifier derived from a public key.
///
/// NodeId identifies a peer in the overlay and is the coordinate used by the
/// XOR metric. Identifiers are immutable and compared by raw bytes.
///
/// # Security
///
/// Equality is constant-time. Standard `PartialEq` for byte arrays
/// short-circuits on the first difference, which leaks the position of the
/// first differing byte through timing.
// derived_hash_with_manual_eq: the manual PartialEq compares the same bytes
// the derived Hash feeds, so equal ids always hash equally.
#[allow(clippy::derived_hash_with_manual_eq)]
#[derive(Clone, Copy, Hash)]
pub struct NodeId(pub [u8; NODE_ID_LEN]);

impl PartialEq for NodeId {
    /// Constant-time comparison.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        let mut result = 0u8;
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            result |= a ^ b;
        }
        result == 0
    }
}

impl Eq for NodeId {}

impl NodeId {
    /// Create a NodeId from a raw 32-byte array.
    pub fn new(bytes: [u8; NODE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Create a NodeId from a byte slice received off the wire.
    ///
    /// # Errors
    ///
    /// `IdentifierError::InvalidLength` if the slice is not exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdentifierError> {
        let array: [u8; NODE_ID_LEN] =
            bytes.try_into().map_err(|_| IdentifierError::InvalidLength {
                expected: NODE_ID_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }

    /// Get the underlying bytes for XOR distance calculation.
    pub fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }

    /// Zero-initialized NodeId.
    pub fn zero() -> Self {
        Self([0u8; NODE_ID_LEN])
    }

    /// Canonical deduplication key: lowercase hex of the raw bytes.
    ///
    /// Equal identifiers always produce equal keys and vice versa.
    pub fn key(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for NodeId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 bytes are enough to tell peers apart in logs.
        write!(f, "NodeId({}..)", hex::encode(&self.0[..8]))
    }
}

/// A peer that can be contacted: identifier plus dial address.
///
/// Built by the transport/identity layer before a lookup starts. A lookup
/// only ever holds clones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerInfo {
    /// Node identifier.
    pub node_id: NodeId,
    /// Address used to open a connection to the peer.
    pub addr: SocketAddr,
}

impl PeerInfo {
    /// Create a new PeerInfo.
    pub fn new(node_id: NodeId, addr: SocketAddr) -> Self {
        Self { node_id, addr }
    }
}
