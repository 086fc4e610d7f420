//! Peer query primitive.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, trace};

use crate::domain::{Message, NodeId, PeerInfo};
use crate::ports::Transport;

/// Ask one peer for the peers it knows closest to `target`.
///
/// Never fails. A dial failure, a transport error, a timeout, or a reply
/// that is not a `LookupResponse` all come back as an empty vector, the same
/// as a peer that simply knows nobody. The lookup relies on that: a silent
/// peer and an ignorant peer contribute the same thing, nothing. Failures
/// are logged at `debug` and not retried here.
///
/// One dial attempt and one request per call.
pub async fn query_peer(
    transport: &dyn Transport,
    contact: &PeerInfo,
    target: NodeId,
    timeout: Duration,
) -> Vec<PeerInfo> {
    let mut connection = match transport.dial(contact.addr).await {
        Ok(connection) => connection,
        Err(err) => {
            debug!(peer = %contact.node_id, addr = %contact.addr, kind = err.kind(), "[kad] dial failed: {err}");
            return Vec::new();
        }
    };

    match connection
        .request(Message::LookupRequest { target }, timeout)
        .await
    {
        Ok(Message::LookupResponse { peers }) => {
            trace!(peer = %contact.node_id, count = peers.len(), "[kad] lookup response");
            peers
        }
        Ok(other) => {
            debug!(peer = %contact.node_id, got = other.name(), "[kad] unexpected reply to lookup request");
            Vec::new()
        }
        Err(err) => {
            debug!(peer = %contact.node_id, kind = err.kind(), "[kad] lookup request failed: {err}");
            Vec::new()
        }
    }
}

/// Run `query_peer` as its own task on `tasks`.
///
/// The task's output is the reply, delivered exactly once through
/// `JoinSet::join_next`.
pub(crate) fn spawn_query(
    tasks: &mut JoinSet<Vec<PeerInfo>>,
    transport: Arc<dyn Transport>,
    contact: PeerInfo,
    target: NodeId,
    timeout: Duration,
) {
    tasks.spawn(async move { query_peer(transport.as_ref(), &contact, target, timeout).await });
}
