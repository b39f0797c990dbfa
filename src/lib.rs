//! # Topic Hub
//!
//! An in-process pub/sub registry that lets independent component
//! instances share a named piece of state without a common ancestor: any
//! holder of a publish handle can broadcast a new value for a topic, and
//! every subscriber of that topic receives it synchronously.
//!
//! ## Core Concepts
//!
//! - **Topics**: named slots holding one shared value and a set of
//!   subscribers; created lazily on first join, kept until explicitly
//!   deleted
//! - **First-writer-wins seeding**: among several joiners of a topic that
//!   has never been published, the first one's default value becomes the
//!   topic's initial value
//! - **Duplicate-state suppression**: publishing a value structurally
//!   equal to the topic's current value is a no-op unless the topic is
//!   configured to allow it
//! - **Scoped subscriptions**: a subscription handle releases its
//!   registration on drop
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use topichub::TopicHub;
//!
//! let hub = TopicHub::new();
//!
//! let first = hub.subscribe("selected-tab", json!("home"), |value| {
//!     println!("re-render with {value}");
//! }).unwrap();
//! assert_eq!(first.initial_value(), &json!("home"));
//!
//! // A later joiner adopts the first value, not its own default.
//! let second = hub.subscribe("selected-tab", json!("settings"), |_| {}).unwrap();
//! assert_eq!(second.initial_value(), &json!("home"));
//!
//! first.publish(json!("profile")).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod hub;
mod registry;
pub mod subscription;
pub mod types;

// Re-exports
pub use config::{ConfigPatch, HubConfig, TopicConfig};
pub use error::{HubError, Result};
pub use hub::{HubOptions, TopicHub};
pub use subscription::Subscription;
pub use types::{DeliveryCallback, EqualityFn, HubStats, SubscriptionId};
