//! Topic store: the map from topic name to topic record.
//!
//! The registry is a plain data structure with no interior locking; the
//! hub guards it with a single lock so the synchronous-delivery and
//! first-writer-wins invariants hold even when driven from multiple
//! threads.

use crate::types::{DeliveryCallback, SubscriptionId};
use serde_json::Value;
use std::collections::HashMap;

/// One topic's state: last published value and registered subscribers.
pub(crate) struct TopicRecord {
    /// `None` until the first successful publish. The default value a
    /// creating subscriber supplied is never stored here: an unpublished
    /// placeholder must not be readable as a real value.
    current: Option<Value>,

    subscribers: HashMap<SubscriptionId, DeliveryCallback>,
}

impl TopicRecord {
    fn new() -> Self {
        Self {
            current: None,
            subscribers: HashMap::new(),
        }
    }

    /// Last published value, if any publish has happened.
    pub(crate) fn current(&self) -> Option<&Value> {
        self.current.as_ref()
    }

    pub(crate) fn has_been_published(&self) -> bool {
        self.current.is_some()
    }

    pub(crate) fn set_current(&mut self, value: Value) {
        self.current = Some(value);
    }

    pub(crate) fn insert_subscriber(&mut self, id: SubscriptionId, callback: DeliveryCallback) {
        self.subscribers.insert(id, callback);
    }

    pub(crate) fn remove_subscriber(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Snapshot the registered callbacks so delivery can run outside the
    /// registry lock.
    pub(crate) fn callbacks(&self) -> Vec<DeliveryCallback> {
        self.subscribers.values().cloned().collect()
    }
}

/// All topic records, keyed by topic name.
///
/// Records persist after their subscriber map empties; only an explicit
/// delete removes one. Late joiners to an abandoned topic still see its
/// last published value.
#[derive(Default)]
pub(crate) struct TopicRegistry {
    topics: HashMap<String, TopicRecord>,
}

impl TopicRegistry {
    pub(crate) fn get(&self, topic: &str) -> Option<&TopicRecord> {
        self.topics.get(topic)
    }

    pub(crate) fn get_mut(&mut self, topic: &str) -> Option<&mut TopicRecord> {
        self.topics.get_mut(topic)
    }

    /// Get the record for `topic`, creating an unpublished one if absent.
    pub(crate) fn ensure(&mut self, topic: &str) -> &mut TopicRecord {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(TopicRecord::new)
    }

    /// Remove the record entirely. Returns the severed record, if any.
    pub(crate) fn remove(&mut self, topic: &str) -> Option<TopicRecord> {
        self.topics.remove(topic)
    }

    pub(crate) fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub(crate) fn subscription_count(&self) -> usize {
        self.topics.values().map(|r| r.subscriber_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_fresh_record_is_unpublished() {
        let mut registry = TopicRegistry::default();
        let record = registry.ensure("t");
        assert!(!record.has_been_published());
        assert!(record.current().is_none());
        assert_eq!(record.subscriber_count(), 0);
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut registry = TopicRegistry::default();
        registry.ensure("t").set_current(json!(1));
        let record = registry.ensure("t");
        assert_eq!(record.current(), Some(&json!(1)));
        assert_eq!(registry.topic_count(), 1);
    }

    #[test]
    fn test_remove_subscriber_is_idempotent() {
        let mut registry = TopicRegistry::default();
        let id = SubscriptionId::generate();
        let record = registry.ensure("t");
        record.insert_subscriber(id, Arc::new(|_| {}));
        assert!(record.remove_subscriber(id));
        assert!(!record.remove_subscriber(id));
    }

    #[test]
    fn test_subscription_count_spans_topics() {
        let mut registry = TopicRegistry::default();
        for topic in ["a", "b"] {
            let record = registry.ensure(topic);
            record.insert_subscriber(SubscriptionId::generate(), Arc::new(|_| {}));
            record.insert_subscriber(SubscriptionId::generate(), Arc::new(|_| {}));
        }
        assert_eq!(registry.subscription_count(), 4);
        registry.remove("a");
        assert_eq!(registry.subscription_count(), 2);
    }
}
