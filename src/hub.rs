//! The topic hub: subscription engine and publisher.
//!
//! A [`TopicHub`] is an explicitly constructed registry, not a process-wide
//! static. Handles are cheap to clone and share one underlying store, so a
//! test (or an embedding application) can run any number of independent
//! hubs side by side.

use crate::config::{ConfigPatch, HubConfig};
use crate::error::{HubError, Result};
use crate::registry::TopicRegistry;
use crate::subscription::Subscription;
use crate::types::{DeliveryCallback, EqualityFn, HubStats, SubscriptionId};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Construction-time options for a hub.
#[derive(Clone)]
pub struct HubOptions {
    /// Whether duplicate-state diagnostics are emitted at all. This is the
    /// "development mode" switch; it defaults to the build profile and is
    /// deliberately not part of the runtime config.
    pub dev_warnings: bool,

    /// Structural-equality function for the duplicate-state policy.
    /// `None` uses [`serde_json::Value`] equality, a deep and
    /// map-order-independent comparison.
    pub equality: Option<EqualityFn>,
}

impl Default for HubOptions {
    fn default() -> Self {
        Self {
            dev_warnings: cfg!(debug_assertions),
            equality: None,
        }
    }
}

struct HubInner {
    topics: RwLock<TopicRegistry>,
    config: RwLock<HubConfig>,
    equality: EqualityFn,
    dev_warnings: bool,
    publish_count: AtomicU64,
    suppressed_count: AtomicU64,
}

/// Shared-state pub/sub engine.
///
/// Every operation is synchronous and runs to completion before returning;
/// a publish has delivered to every registered subscriber by the time it
/// returns. The two shared stores (topics, config) are lock-guarded so the
/// same invariants hold when the hub is driven from multiple threads.
#[derive(Clone)]
pub struct TopicHub {
    inner: Arc<HubInner>,
}

impl TopicHub {
    /// Create a hub with default options.
    pub fn new() -> Self {
        Self::with_options(HubOptions::default())
    }

    /// Create a hub with explicit options.
    pub fn with_options(options: HubOptions) -> Self {
        let equality = options
            .equality
            .unwrap_or_else(|| Arc::new(|a: &Value, b: &Value| a == b));

        Self {
            inner: Arc::new(HubInner {
                topics: RwLock::new(TopicRegistry::default()),
                config: RwLock::new(HubConfig::default()),
                equality,
                dev_warnings: options.dev_warnings,
                publish_count: AtomicU64::new(0),
                suppressed_count: AtomicU64::new(0),
            }),
        }
    }

    // --- Subscription Lifecycle ---

    /// Join a topic, seeding it with `default_value` if it has never been
    /// published (equivalent to [`subscribe_with`](Self::subscribe_with)
    /// with `publish_default = true`).
    pub fn subscribe<F>(&self, topic: &str, default_value: Value, on_delivery: F) -> Result<Subscription>
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.subscribe_with(topic, default_value, true, on_delivery)
    }

    /// Join a topic, creating it if absent, and register `on_delivery` for
    /// every future publish.
    ///
    /// The returned subscription carries the value the caller should start
    /// from: the topic's current value if it has been published, otherwise
    /// the caller's own `default_value`.
    ///
    /// When the topic is unpublished and `publish_default` is true, the
    /// caller's default is published immediately, with the caller as the
    /// effective first publisher. Among several joiners of an unpublished
    /// topic, only the first to run completes this seed publish; the rest
    /// observe a published topic and adopt the first value instead of
    /// their own default (first-writer-wins).
    pub fn subscribe_with<F>(
        &self,
        topic: &str,
        default_value: Value,
        publish_default: bool,
        on_delivery: F,
    ) -> Result<Subscription>
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        if topic.is_empty() {
            return Err(HubError::InvalidTopicName(topic.to_string()));
        }

        let id = SubscriptionId::generate();
        let callback: DeliveryCallback = Arc::new(on_delivery);

        // The seed decision and the seed itself must be one critical
        // section: the record is marked published under the write lock, so
        // a concurrent joiner can never also observe an unpublished topic
        // and seed its own default over the winner's.
        let (initial, seed_callbacks) = {
            let mut topics = self.inner.topics.write();
            let record = topics.ensure(topic);
            record.insert_subscriber(id, callback);
            match record.current().cloned() {
                Some(current) => (current, None),
                None if publish_default => {
                    record.set_current(default_value.clone());
                    (default_value, Some(record.callbacks()))
                }
                None => (default_value, None),
            }
        };

        if let Some(callbacks) = seed_callbacks {
            // A seed is a publish of the first value: it counts as an
            // attempt and is delivered outside the lock. No duplicate
            // check applies, since the topic held no value before it.
            self.inner.publish_count.fetch_add(1, Ordering::Relaxed);
            for callback in &callbacks {
                callback(&initial);
            }
        }

        tracing::debug!(topic, subscription = %id, "subscribed");
        Ok(Subscription::new(self.clone(), topic.to_string(), id, initial))
    }

    /// Remove a subscriber from a topic. Idempotent: returns false if the
    /// topic or the registration no longer exists.
    pub fn unsubscribe(&self, topic: &str, id: SubscriptionId) -> bool {
        let removed = self
            .inner
            .topics
            .write()
            .get_mut(topic)
            .map_or(false, |record| record.remove_subscriber(id));
        if removed {
            tracing::debug!(topic, subscription = %id, "unsubscribed");
        }
        removed
    }

    /// Remove a topic record entirely, severing all of its subscribers.
    ///
    /// Intended for a single authoritative owner of the topic; a joiner
    /// that still holds the topic afterwards may observe inconsistent
    /// state, which is why every deletion warns. A later subscribe
    /// recreates the topic fresh and unpublished.
    pub fn delete_topic(&self, topic: &str) -> bool {
        let removed = self.inner.topics.write().remove(topic);
        tracing::warn!(
            topic,
            severed = removed.as_ref().map_or(0, |r| r.subscriber_count()),
            "topic deleted; components still reading it may observe inconsistent state; \
             only a single authoritative owner should delete topics"
        );
        removed.is_some()
    }

    // --- Publishing ---

    /// Publish `value` to every subscriber of `topic`, then record it as
    /// the topic's current value.
    ///
    /// Publishing to a topic that has never been joined (or has been
    /// deleted) is a usage error. A value structurally equal to the
    /// current one is suppressed unless the topic's `allow_dupe_state`
    /// config permits it: no callbacks fire and the record is untouched.
    pub fn publish(&self, topic: &str, value: Value) -> Result<()> {
        self.inner.publish_count.fetch_add(1, Ordering::Relaxed);

        let allow_dupe = self.inner.config.read().allow_dupe_state(topic);

        // Snapshot callbacks under the lock; suppression is decided here
        // too, since it needs the current value.
        let callbacks = {
            let topics = self.inner.topics.read();
            let record = topics
                .get(topic)
                .ok_or_else(|| HubError::TopicNotFound(topic.to_string()))?;

            // An unpublished record holds no real value, so nothing can be
            // a duplicate of it.
            let duplicate = !allow_dupe
                && record
                    .current()
                    .map_or(false, |current| (self.inner.equality)(current, &value));

            if duplicate {
                None
            } else {
                Some(record.callbacks())
            }
        };

        let Some(callbacks) = callbacks else {
            self.inner.suppressed_count.fetch_add(1, Ordering::Relaxed);
            let silenced = self.inner.config.read().suppress_dupe_state_warning;
            if self.inner.dev_warnings && !silenced {
                tracing::warn!(
                    topic,
                    "suppressed publish of unchanged state; set allow_dupe_state for this topic \
                     to permit it, or suppress_dupe_state_warning to silence this warning"
                );
            }
            return Ok(());
        };

        // Deliver outside the lock so a callback may re-enter the hub.
        for callback in &callbacks {
            callback(&value);
        }

        if let Some(record) = self.inner.topics.write().get_mut(topic) {
            record.set_current(value);
        }

        Ok(())
    }

    /// Serialize a typed value through serde and publish it.
    pub fn publish_typed<T: Serialize>(&self, topic: &str, value: &T) -> Result<()> {
        self.publish(topic, serde_json::to_value(value)?)
    }

    // --- Configuration ---

    /// Shallow-merge a partial config into the hub config. The per-topic
    /// map is replaced wholesale; see [`HubConfig::apply`].
    pub fn configure(&self, patch: ConfigPatch) {
        self.inner.config.write().apply(patch);
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> HubConfig {
        self.inner.config.read().clone()
    }

    // --- Introspection ---

    /// Last published value of a topic, if it has been published.
    pub fn current_value(&self, topic: &str) -> Option<Value> {
        self.inner
            .topics
            .read()
            .get(topic)
            .and_then(|record| record.current().cloned())
    }

    /// Whether the topic has received at least one publish.
    pub fn has_been_published(&self, topic: &str) -> bool {
        self.inner
            .topics
            .read()
            .get(topic)
            .map_or(false, |record| record.has_been_published())
    }

    /// Whether a record exists for the topic (published or not).
    pub fn topic_exists(&self, topic: &str) -> bool {
        self.inner.topics.read().get(topic).is_some()
    }

    /// Number of live topic records.
    pub fn topic_count(&self) -> usize {
        self.inner.topics.read().topic_count()
    }

    /// Number of subscribers registered on one topic.
    pub fn subscription_count(&self, topic: &str) -> usize {
        self.inner
            .topics
            .read()
            .get(topic)
            .map_or(0, |record| record.subscriber_count())
    }

    /// Counter snapshot.
    pub fn stats(&self) -> HubStats {
        let topics = self.inner.topics.read();
        HubStats {
            topic_count: topics.topic_count(),
            subscription_count: topics.subscription_count(),
            publish_count: self.inner.publish_count.load(Ordering::Relaxed),
            suppressed_count: self.inner.suppressed_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for TopicHub {
    fn default() -> Self {
        Self::new()
    }
}
