//! Core types for the topic hub.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a subscription.
///
/// Generated at join time (not at handle construction), so an identifier
/// only ever exists for a registration that actually happened.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Generate a fresh random (version 4) identifier.
    pub fn generate() -> Self {
        SubscriptionId(Uuid::new_v4())
    }
}

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Callback invoked synchronously with every value published to the
/// subscriber's topic.
pub type DeliveryCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Structural-equality function used by the duplicate-state policy.
///
/// The default compares [`serde_json::Value`]s directly, which is a deep,
/// map-order-independent comparison.
pub type EqualityFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Snapshot of hub counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubStats {
    /// Number of live topic records (published or not).
    pub topic_count: usize,
    /// Total registered subscribers across all topics.
    pub subscription_count: usize,
    /// Publish attempts, including suppressed ones.
    pub publish_count: u64,
    /// Publishes suppressed by the duplicate-state policy.
    pub suppressed_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| SubscriptionId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_id_roundtrips_through_serde() {
        let id = SubscriptionId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let back: SubscriptionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
