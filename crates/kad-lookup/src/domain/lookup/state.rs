use std::collections::{HashSet, VecDeque};

use crate::domain::{sort_peers_by_distance, FrontierPolicy, LookupConfig, NodeId, PeerInfo};

/// Counters for one lookup, reported in logs when it finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupStats {
    /// Queries launched.
    pub queries_issued: usize,
    /// Replies folded in, empty or not.
    pub responses: usize,
    /// Replies that carried no candidates (failure or nothing known).
    pub empty_responses: usize,
    /// Highest number of queries outstanding at once.
    pub peak_pending: usize,
}

/// Bookkeeping for one in-flight iterative lookup.
///
/// Owned by a single coordinator and never shared, so it needs no locking.
/// The coordinator drives it as:
///
/// ```text
/// seed → next_batch → loop { on_response → next_batch } while pending > 0 → finish
/// ```
///
/// Every identifier enters `visited` at most once, so at most one query is
/// launched per unique identifier and the frontier cannot grow without bound
/// on a cyclic peer graph.
#[derive(Debug)]
pub struct LookupState {
    target: NodeId,
    alpha: usize,
    k: usize,
    policy: FrontierPolicy,
    visited: HashSet<NodeId>,
    frontier: VecDeque<PeerInfo>,
    results: Vec<PeerInfo>,
    pending: usize,
    stats: LookupStats,
}

impl LookupState {
    /// Create an empty lookup for `target`.
    pub fn new(target: NodeId, config: &LookupConfig) -> Self {
        Self {
            target,
            alpha: config.alpha.max(1),
            k: config.k,
            policy: config.frontier_policy,
            visited: HashSet::new(),
            frontier: VecDeque::new(),
            results: Vec::new(),
            pending: 0,
            stats: LookupStats::default(),
        }
    }

    /// Seed from the local routing table.
    ///
    /// Every seed peer is marked visited, queued, and added to the result
    /// pool straight away, including seeds the first fan-out never gets to.
    pub fn seed<I>(&mut self, peers: I)
    where
        I: IntoIterator<Item = PeerInfo>,
    {
        for peer in peers {
            if self.visited.insert(peer.node_id) {
                self.results.push(peer.clone());
                self.frontier.push_back(peer);
            }
        }
    }

    /// Pop peers to query until `alpha` are outstanding or the frontier runs dry.
    ///
    /// The caller must launch exactly one query per returned peer. Under
    /// `FrontierPolicy::Reset` whatever remains in the frontier afterwards is
    /// discarded.
    pub fn next_batch(&mut self) -> Vec<PeerInfo> {
        let mut batch = Vec::new();
        while self.pending < self.alpha {
            let Some(peer) = self.frontier.pop_front() else {
                break;
            };
            self.pending += 1;
            self.stats.queries_issued += 1;
            batch.push(peer);
        }
        self.stats.peak_pending = self.stats.peak_pending.max(self.pending);

        if self.policy == FrontierPolicy::Reset {
            self.frontier.clear();
        }
        batch
    }

    /// Fold one query's reply into the lookup.
    ///
    /// Unseen candidates are marked visited and appended to both the result
    /// pool and the frontier. Returns how many were new.
    pub fn on_response(&mut self, candidates: Vec<PeerInfo>) -> usize {
        self.pending = self.pending.saturating_sub(1);
        self.stats.responses += 1;
        if candidates.is_empty() {
            self.stats.empty_responses += 1;
        }

        let mut fresh = 0;
        for peer in candidates {
            if self.visited.insert(peer.node_id) {
                self.results.push(peer.clone());
                self.frontier.push_back(peer);
                fresh += 1;
            }
        }
        fresh
    }

    /// Concurrency bound in effect. A configured `alpha` of 0 runs as 1.
    pub fn alpha(&self) -> usize {
        self.alpha
    }

    /// Queries currently outstanding.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// True once no query is outstanding and nothing is left to expand.
    pub fn is_finished(&self) -> bool {
        self.pending == 0 && self.frontier.is_empty()
    }

    /// Peers waiting to be queried.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Unique peers seen so far.
    pub fn discovered(&self) -> usize {
        self.results.len()
    }

    /// Whether `node_id` has been seen in this lookup.
    pub fn is_visited(&self, node_id: &NodeId) -> bool {
        self.visited.contains(node_id)
    }

    /// Identifier being looked up.
    pub fn target(&self) -> &NodeId {
        &self.target
    }

    /// Counters so far.
    pub fn stats(&self) -> LookupStats {
        self.stats
    }

    /// Rank the result pool by distance to the target and cap it at `k`.
    pub fn finish(self) -> Vec<PeerInfo> {
        let mut results = self.results;
        sort_peers_by_distance(&mut results, &self.target);
        results.truncate(self.k);
        results
    }
}
