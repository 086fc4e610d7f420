//! Iterative lookup coordinator.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::query::spawn_query;
use crate::domain::{bucket_for_peer, LookupConfig, LookupState, NodeId, PeerInfo};
use crate::ports::{ClosestPeers, Transport};

/// Find the peers closest to `target` by asking peers we know, then peers
/// they know, at most `alpha` at a time.
///
/// 1. Seed with `find_closest_peers(target, alpha)` (read once). An `alpha`
///    of 0 is run as 1 here and in the fan-out alike.
/// 2. Launch up to `alpha` queries.
/// 3. Take whichever reply lands first, fold its unseen candidates in, refill.
/// 4. When nothing is outstanding, rank by XOR distance and keep the `k` closest.
///
/// Each query is its own task; this function is the only reader of their
/// results and the only writer of the lookup state. There is no external
/// cancellation: the lookup ends once every launched query has answered or
/// timed out, so the worst case is `ceil(queries / alpha) * query_timeout`.
///
/// An empty routing table yields an empty result without issuing a query.
pub async fn iterative_lookup(
    transport: Arc<dyn Transport>,
    routing: &dyn ClosestPeers,
    target: NodeId,
    config: &LookupConfig,
) -> Vec<PeerInfo> {
    let mut state = LookupState::new(target, config);
    state.seed(routing.find_closest_peers(&target, state.alpha()));

    if state.is_finished() {
        debug!(target_id = %target, "[kad] routing table empty, nothing to look up");
        return Vec::new();
    }

    debug!(
        target_id = %target,
        alpha = state.alpha(),
        seeds = state.discovered(),
        "[kad] starting lookup"
    );

    let mut tasks = JoinSet::new();
    launch(&mut state, &mut tasks, &transport, config);

    while state.pending() > 0 {
        let Some(joined) = tasks.join_next().await else {
            // Every launched query owns a task, so this only happens if the
            // bookkeeping and the task set disagree.
            warn!(target_id = %target, pending = state.pending(), "[kad] no query tasks left while replies pending");
            break;
        };

        let candidates = joined.unwrap_or_else(|err| {
            warn!(target_id = %target, "[kad] query task failed: {err}");
            Vec::new()
        });

        let fresh = state.on_response(candidates);
        launch(&mut state, &mut tasks, &transport, config);

        debug!(
            target_id = %target,
            fresh,
            pending = state.pending(),
            discovered = state.discovered(),
            "[kad] folded lookup reply"
        );
    }

    let stats = state.stats();
    let results = state.finish();
    debug!(
        target_id = %target,
        queries = stats.queries_issued,
        empty = stats.empty_responses,
        found = results.len(),
        closest_bucket = ?results.first().and_then(|p| bucket_for_peer(&target, &p.node_id)),
        "[kad] lookup finished"
    );
    results
}

/// Launch a query for every peer the state hands out.
fn launch(
    state: &mut LookupState,
    tasks: &mut JoinSet<Vec<PeerInfo>>,
    transport: &Arc<dyn Transport>,
    config: &LookupConfig,
) {
    let target = *state.target();
    for contact in state.next_batch() {
        spawn_query(
            tasks,
            Arc::clone(transport),
            contact,
            target,
            config.query_timeout,
        );
    }
}
