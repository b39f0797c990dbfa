//! Hub configuration and the partial-update merge semantics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-topic configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Allow publishing a value structurally equal to the topic's current
    /// value. Default: false (duplicate publishes are suppressed).
    #[serde(default)]
    pub allow_dupe_state: bool,
}

/// Hub-wide configuration, mutated only through [`HubConfig::apply`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Silence the diagnostic emitted when a duplicate publish is
    /// suppressed. Global only; there is no per-topic warning suppression.
    #[serde(default)]
    pub suppress_dupe_state_warning: bool,

    /// Per-topic overrides, keyed by topic name.
    #[serde(default)]
    pub topic_config: HashMap<String, TopicConfig>,
}

/// Partial configuration update. `None` fields leave the prior value
/// untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConfigPatch {
    #[serde(default)]
    pub suppress_dupe_state_warning: Option<bool>,

    #[serde(default)]
    pub topic_config: Option<HashMap<String, TopicConfig>>,
}

impl HubConfig {
    /// Shallow-merge a patch into this config, last write wins.
    ///
    /// The topic map is replaced wholesale, never merged key-by-key:
    /// callers wanting cumulative per-topic config must re-supply every
    /// previously configured topic.
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(flag) = patch.suppress_dupe_state_warning {
            self.suppress_dupe_state_warning = flag;
        }
        if let Some(map) = patch.topic_config {
            self.topic_config = map;
        }
    }

    /// Whether duplicate-state publishes are allowed for `topic`.
    pub fn allow_dupe_state(&self, topic: &str) -> bool {
        self.topic_config
            .get(topic)
            .map(|cfg| cfg.allow_dupe_state)
            .unwrap_or(false)
    }
}
