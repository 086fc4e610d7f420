use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::lookup::iterative_lookup;
use crate::domain::{NodeId, PeerInfo};
use crate::ports::NodeLookupApi;
use crate::service::LookupService;

#[async_trait]
impl NodeLookupApi for LookupService {
    async fn lookup(&self, target: NodeId) -> Vec<PeerInfo> {
        iterative_lookup(
            Arc::clone(&self.transport),
            self.routing.as_ref(),
            target,
            &self.config,
        )
        .await
    }

    async fn bootstrap(&self) -> Vec<PeerInfo> {
        let peers = self.lookup(self.local_id).await;
        info!(local_id = %self.local_id, found = peers.len(), "[kad] bootstrap lookup complete");
        peers
    }
}
