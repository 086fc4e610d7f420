//! End-to-end lookups through `LookupService` over the scripted transport.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{first_bytes, init_tracing, node_id, peer};
use kad_lookup::test_utils::{MockTransport, StaticPeers};
use kad_lookup::{
    xor_distance, FrontierPolicy, InMemoryRoutingTable, LookupConfig, LookupService,
    NodeLookupApi, PeerInfo, StaticConfigProvider, BUCKET_SIZE,
};

fn service(transport: Arc<MockTransport>, seeds: Vec<PeerInfo>, config: LookupConfig) -> LookupService {
    let provider = StaticConfigProvider::new().with_config(config);
    LookupService::from_provider(node_id(0xee), &provider, transport, Arc::new(StaticPeers::new(seeds)))
        .unwrap()
}

/// Three hops: seed → 0x40 → 0x10 → 0x01.
#[tokio::test]
async fn test_lookup_walks_toward_target() {
    init_tracing();
    let transport = Arc::new(MockTransport::new());
    transport.respond(&peer(0x80), vec![peer(0x40)]);
    transport.respond(&peer(0x40), vec![peer(0x10)]);
    transport.respond(&peer(0x10), vec![peer(0x01)]);
    transport.respond(&peer(0x01), Vec::new());

    let service = service(transport.clone(), vec![peer(0x80)], LookupConfig::default());
    let results = service.lookup(node_id(0x00)).await;

    assert_eq!(first_bytes(&results), vec![0x01, 0x10, 0x40, 0x80]);
    assert_eq!(transport.total_dials(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_mixed_failures_and_slow_peers() {
    init_tracing();
    let transport = Arc::new(MockTransport::new());
    transport.time_out(&peer(1));
    transport.refuse(&peer(2));
    transport.respond_after(&peer(3), Duration::from_millis(500), vec![peer(4), peer(5)]);
    transport.respond(&peer(4), vec![peer(6)]);
    transport.respond_after(&peer(5), Duration::from_secs(10), vec![peer(7)]);
    transport.respond(&peer(6), Vec::new());

    let service = service(
        transport.clone(),
        vec![peer(1), peer(2), peer(3)],
        LookupConfig::default().with_frontier_policy(FrontierPolicy::Retain),
    );
    let results = service.lookup(node_id(0x00)).await;

    // peer(5) answered too late, so peer(7) is never discovered.
    assert_eq!(first_bytes(&results), vec![1, 2, 3, 4, 5, 6]);
    assert!(transport.peak_in_flight() <= 3);
}

#[tokio::test]
async fn test_large_network_result_is_k_closest_sorted() {
    init_tracing();
    let transport = Arc::new(MockTransport::new());
    // Every peer knows the next five.
    let all: Vec<PeerInfo> = (1..=60).map(peer).collect();
    for (i, p) in all.iter().enumerate() {
        let next = all.iter().skip(i + 1).take(5).cloned().collect();
        transport.respond(p, next);
    }

    let target = node_id(0x00);
    let service = service(
        transport.clone(),
        vec![all[0].clone()],
        LookupConfig::default().with_frontier_policy(FrontierPolicy::Retain),
    );
    let results = service.lookup(target).await;

    assert_eq!(results.len(), BUCKET_SIZE);
    assert_eq!(first_bytes(&results), (1..=20).collect::<Vec<u8>>());
    assert!(results
        .windows(2)
        .all(|w| xor_distance(&w[0].node_id, &target) <= xor_distance(&w[1].node_id, &target)));
    // Each peer queried at most once.
    assert_eq!(transport.total_dials(), 60);
}

#[tokio::test]
async fn test_concurrent_lookups_share_one_service() {
    init_tracing();
    let transport = Arc::new(MockTransport::new());
    transport.respond(&peer(1), vec![peer(2), peer(3)]);
    transport.respond(&peer(2), Vec::new());
    transport.respond(&peer(3), Vec::new());

    let table = InMemoryRoutingTable::with_peers(vec![peer(1)]);
    let service = LookupService::new(
        node_id(0xee),
        LookupConfig::default(),
        transport.clone(),
        Arc::new(table),
    )
    .unwrap();

    let (first, second) = tokio::join!(service.lookup(node_id(0x02)), service.lookup(node_id(0x03)));

    assert_eq!(first_bytes(&first), vec![2, 3, 1]);
    assert_eq!(first_bytes(&second), vec![3, 2, 1]);
    // Lookups keep separate visited sets.
    assert_eq!(transport.dial_count(&peer(1)), 2);
}
