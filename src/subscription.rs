//! Scoped subscription handle.

use crate::error::Result;
use crate::hub::TopicHub;
use crate::types::SubscriptionId;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The binding between one subscriber and one topic.
///
/// Created by [`TopicHub::subscribe`]. Dropping the handle releases the
/// registration, so a subscriber cannot leak its topic entry on any exit
/// path; [`unsubscribe`](Subscription::unsubscribe) does the same thing
/// explicitly.
pub struct Subscription {
    hub: TopicHub,
    topic: String,
    id: SubscriptionId,
    initial: Value,
    released: bool,
}

impl Subscription {
    pub(crate) fn new(hub: TopicHub, topic: String, id: SubscriptionId, initial: Value) -> Self {
        Self {
            hub,
            topic,
            id,
            initial,
            released: false,
        }
    }

    /// The topic this subscription is registered on.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The value the subscriber should start from: the topic's current
    /// value at join time, or the subscriber's own default if the topic
    /// was unpublished.
    pub fn initial_value(&self) -> &Value {
        &self.initial
    }

    /// Publish a new value to this subscription's topic.
    pub fn publish(&self, value: Value) -> Result<()> {
        self.hub.publish(&self.topic, value)
    }

    /// Serialize a typed value through serde and publish it.
    pub fn publish_typed<T: Serialize>(&self, value: &T) -> Result<()> {
        self.hub.publish_typed(&self.topic, value)
    }

    /// Explicitly release the registration.
    pub fn unsubscribe(mut self) {
        self.hub.unsubscribe(&self.topic, self.id);
        self.released = true;
    }

    /// Delete the whole topic, severing every subscriber including this
    /// one. Reserved for the topic's single authoritative owner.
    pub fn delete_topic(&self) -> bool {
        self.hub.delete_topic(&self.topic)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.released {
            self.hub.unsubscribe(&self.topic, self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drop_releases_registration() {
        let hub = TopicHub::new();
        {
            let _sub = hub.subscribe("t", json!(0), |_| {}).unwrap();
            assert_eq!(hub.subscription_count("t"), 1);
        }
        assert_eq!(hub.subscription_count("t"), 0);
    }

    #[test]
    fn test_explicit_unsubscribe_releases_once() {
        let hub = TopicHub::new();
        let sub = hub.subscribe("t", json!(0), |_| {}).unwrap();
        sub.unsubscribe();
        assert_eq!(hub.subscription_count("t"), 0);
    }

    #[test]
    fn test_drop_after_topic_deletion_is_noop() {
        let hub = TopicHub::new();
        let sub = hub.subscribe("t", json!(0), |_| {}).unwrap();
        assert!(sub.delete_topic());
        drop(sub);
        assert!(!hub.topic_exists("t"));
    }

    #[test]
    fn test_publish_through_handle() {
        let hub = TopicHub::new();
        let sub = hub.subscribe("t", json!(0), |_| {}).unwrap();
        sub.publish(json!(1)).unwrap();
        assert_eq!(hub.current_value("t"), Some(json!(1)));
    }
}
