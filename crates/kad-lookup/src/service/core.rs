use std::sync::Arc;

use crate::domain::{ConfigError, LookupConfig, NodeId};
use crate::ports::{ClosestPeers, ConfigProvider, Transport};

/// Node lookup service implementing the driving port.
///
/// Holds the local identity, the lookup parameters and shared handles to
/// the transport and routing table. Cloning is cheap; every lookup gets its
/// own state, so concurrent lookups through one service do not interact.
///
/// # Example
///
/// ```rust,ignore
/// use kad_lookup::{LookupService, LookupConfig, NodeLookupApi};
///
/// let service = LookupService::new(local_id, LookupConfig::default(), transport, routing_table)?;
/// let neighbours = service.bootstrap().await;
/// ```
#[derive(Clone)]
pub struct LookupService {
    /// Our own node ID
    pub(crate) local_id: NodeId,
    /// Lookup parameters
    pub(crate) config: LookupConfig,
    /// Outbound connections for queries
    pub(crate) transport: Arc<dyn Transport>,
    /// Local routing table, read once per lookup to seed it
    pub(crate) routing: Arc<dyn ClosestPeers>,
}

impl LookupService {
    /// Create a new lookup service.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` if `config` fails validation.
    pub fn new(
        local_id: NodeId,
        config: LookupConfig,
        transport: Arc<dyn Transport>,
        routing: Arc<dyn ClosestPeers>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            local_id,
            config,
            transport,
            routing,
        })
    }

    /// Create a service with parameters from a `ConfigProvider`.
    pub fn from_provider(
        local_id: NodeId,
        provider: &dyn ConfigProvider,
        transport: Arc<dyn Transport>,
        routing: Arc<dyn ClosestPeers>,
    ) -> Result<Self, ConfigError> {
        Self::new(local_id, provider.get_lookup_config(), transport, routing)
    }

    /// Our own node ID.
    pub fn local_id(&self) -> &NodeId {
        &self.local_id
    }

    /// Lookup parameters in effect.
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }
}
