//! Tests for Domain Services - XOR metric and ranking

use super::*;
use crate::domain::{Distance, NodeId, PeerInfo};
use std::net::SocketAddr;

fn make_node_id(first_byte: u8) -> NodeId {
    let mut bytes = [0u8; 32];
    bytes[0] = first_byte;
    NodeId::new(bytes)
}

fn make_peer(first_byte: u8) -> PeerInfo {
    let addr: SocketAddr = ([127, 0, 0, 1], 8080).into();
    PeerInfo::new(make_node_id(first_byte), addr)
}

// =============================================================================
// XOR Distance Calculation
// =============================================================================

#[test]
fn test_xor_distance_calculation_is_symmetric() {
    let a = make_node_id(0b1010_0000);
    let b = make_node_id(0b0101_0000);

    assert_eq!(
        xor_distance(&a, &b),
        xor_distance(&b, &a),
        "XOR distance must be symmetric"
    );
}

#[test]
fn test_xor_distance_to_self_is_zero() {
    let a = NodeId::new([0b1010_1010; 32]);
    assert_eq!(xor_distance(&a, &a), Distance::ZERO);
}

#[test]
fn test_xor_distance_is_bytewise_xor() {
    let a = NodeId::new([0b1100_1100; 32]);
    let b = NodeId::new([0b1010_1010; 32]);

    assert_eq!(xor_distance(&a, &b), Distance([0b0110_0110; 32]));
}

#[test]
fn test_xor_distance_magnitude_order() {
    let target = NodeId::zero();

    // Top bit set: farther than any id that only differs in lower bytes.
    let far = make_node_id(0b1000_0000);
    let mut mid_bytes = [0u8; 32];
    mid_bytes[1] = 0xff;
    let mid = NodeId::new(mid_bytes);
    let mut near_bytes = [0u8; 32];
    near_bytes[31] = 0x01;
    let near = NodeId::new(near_bytes);

    assert!(xor_distance(&near, &target) < xor_distance(&mid, &target));
    assert!(xor_distance(&mid, &target) < xor_distance(&far, &target));
}

#[test]
fn test_bucket_for_peer_identifies_first_differing_bit() {
    let local = NodeId::zero();

    assert_eq!(bucket_for_peer(&local, &make_node_id(0b1000_0000)), Some(0));
    assert_eq!(bucket_for_peer(&local, &make_node_id(0b0100_0000)), Some(1));

    let mut second_byte = [0u8; 32];
    second_byte[1] = 0b1000_0000;
    assert_eq!(bucket_for_peer(&local, &NodeId::new(second_byte)), Some(8));

    assert_eq!(bucket_for_peer(&local, &local), None);
}

// =============================================================================
// Ranking
// =============================================================================

#[test]
fn test_sort_peers_by_distance_closest_first() {
    let target = NodeId::zero();
    let mut peers = vec![make_peer(0x80), make_peer(0x01), make_peer(0x10)];

    sort_peers_by_distance(&mut peers, &target);

    let order: Vec<u8> = peers.iter().map(|p| p.node_id.0[0]).collect();
    assert_eq!(order, vec![0x01, 0x10, 0x80]);
}

#[test]
fn test_sort_keeps_equal_distances_adjacent() {
    let target = NodeId::zero();
    let a: SocketAddr = ([10, 0, 0, 1], 1).into();
    let b: SocketAddr = ([10, 0, 0, 2], 2).into();

    // Same id reachable at two addresses: equal distance.
    let mut peers = vec![
        PeerInfo::new(make_node_id(0x40), a),
        make_peer(0x20),
        PeerInfo::new(make_node_id(0x40), b),
        make_peer(0x02),
    ];
    sort_peers_by_distance(&mut peers, &target);

    assert_eq!(peers[0].node_id, make_node_id(0x02));
    assert_eq!(peers[1].node_id, make_node_id(0x20));
    assert_eq!(peers[2].node_id, make_node_id(0x40));
    assert_eq!(peers[3].node_id, make_node_id(0x40));
}

#[test]
fn test_find_k_closest_returns_correct_count() {
    let target = NodeId::zero();
    let peers: Vec<PeerInfo> = (1..=10).map(make_peer).collect();

    let closest_3 = find_k_closest(&peers, &target, 3);
    assert_eq!(closest_3.len(), 3, "Should return exactly k peers");
    assert_eq!(closest_3[0].node_id, make_node_id(1));
    assert_eq!(closest_3[2].node_id, make_node_id(3));

    let closest_20 = find_k_closest(&peers, &target, 20);
    assert_eq!(closest_20.len(), 10, "Should return all peers if k > len");
}
