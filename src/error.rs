//! Error types for the topic hub.

use thiserror::Error;

/// Main error type for hub operations.
///
/// All variants are usage errors: they indicate a programming mistake at
/// the call site and propagate synchronously, never with retries. Policy
/// outcomes (a duplicate-state publish being suppressed) are not errors.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    #[error("Invalid topic name: {0:?}")]
    InvalidTopicName(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HubError {
    fn from(e: serde_json::Error) -> Self {
        HubError::Serialization(e.to_string())
    }
}

/// Result type for hub operations.
pub type Result<T> = std::result::Result<T, HubError>;
