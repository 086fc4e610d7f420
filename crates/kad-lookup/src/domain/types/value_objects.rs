//! Value Objects for Node Lookup

use std::time::Duration;

use super::entities::NODE_ID_LEN;
use super::errors::ConfigError;

/// Maximum number of peers held by one routing-table bucket (K).
pub const BUCKET_SIZE: usize = 20;

/// Default lookup parallelism.
pub const DEFAULT_ALPHA: usize = 3;

/// Default per-query request timeout.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// XOR distance between two NodeIds.
///
/// The full 256-bit XOR, ordered as an unsigned big-endian integer. The
/// derived `Ord` compares the byte array lexicographically, which is exactly
/// big-endian magnitude order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Distance(pub [u8; NODE_ID_LEN]);

impl Distance {
    /// Distance from any id to itself.
    pub const ZERO: Distance = Distance([0u8; NODE_ID_LEN]);

    /// Largest possible distance.
    pub const MAX: Distance = Distance([0xffu8; NODE_ID_LEN]);

    /// Raw XOR bytes.
    pub fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }

    /// Number of leading zero bits (shared prefix length of the two ids).
    pub fn leading_zeros(&self) -> u32 {
        let mut count = 0u32;
        for byte in &self.0 {
            if *byte == 0 {
                count += 8;
            } else {
                count += byte.leading_zeros();
                break;
            }
        }
        count
    }

    /// Bucket index the farther id falls into, counted from the top bit.
    ///
    /// `None` for the zero distance, which has no bucket.
    pub fn bucket_index(&self) -> Option<usize> {
        let zeros = self.leading_zeros() as usize;
        (zeros < NODE_ID_LEN * 8).then_some(zeros)
    }
}

/// What happens to frontier peers that were discovered but not launched
/// during a fan-out pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontierPolicy {
    /// Drop them after every pass. They stay in the result pool but are
    /// never expanded.
    #[default]
    Reset,
    /// Keep them queued for later refills.
    Retain,
}

/// Configuration for iterative lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Result cap, the bucket capacity (default: 20)
    pub k: usize,
    /// Maximum concurrent outstanding queries (default: 3)
    pub alpha: usize,
    /// Per-query request timeout (default: 3 seconds)
    pub query_timeout: Duration,
    /// Connection establishment timeout used by dialing transports (default: 3 seconds)
    pub connect_timeout: Duration,
    /// Frontier handling between fan-out passes (default: Reset)
    pub frontier_policy: FrontierPolicy,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            k: BUCKET_SIZE,
            alpha: DEFAULT_ALPHA,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            connect_timeout: DEFAULT_QUERY_TIMEOUT,
            frontier_policy: FrontierPolicy::Reset,
        }
    }
}

impl LookupConfig {
    /// Create a config suitable for testing (smaller values)
    pub fn for_testing() -> Self {
        Self {
            k: 5,
            alpha: 2,
            query_timeout: Duration::from_millis(200),
            connect_timeout: Duration::from_millis(200),
            frontier_policy: FrontierPolicy::Reset,
        }
    }

    /// Builder-style setter for the frontier policy.
    #[must_use]
    pub fn with_frontier_policy(mut self, policy: FrontierPolicy) -> Self {
        self.frontier_policy = policy;
        self
    }

    /// Check the config describes a lookup that can make progress.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k == 0 {
            return Err(ConfigError::Invalid {
                field: "k",
                reason: "must be at least 1".into(),
            });
        }
        if self.alpha == 0 {
            return Err(ConfigError::Invalid {
                field: "alpha",
                reason: "must be at least 1".into(),
            });
        }
        if self.query_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "query_timeout",
                reason: "must be non-zero".into(),
            });
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "connect_timeout",
                reason: "must be non-zero".into(),
            });
        }
        Ok(())
    }
}
