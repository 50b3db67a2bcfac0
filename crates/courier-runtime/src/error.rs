//! Error types for transport operations.

use chrono::Duration;
use thiserror::Error;

/// Comprehensive error type for all transport operations
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue not found: {queue_name}")]
    QueueNotFound { queue_name: String },

    #[error("Lock token is stale, expired, or already consumed: {token}")]
    InvalidLock { token: String },

    #[error("Transport unavailable: {message}")]
    TransportUnavailable { message: String },

    #[error("Message too large: {size} bytes (max: {max_size})")]
    MessageTooLarge { size: usize, max_size: usize },

    #[error("Batch size {size} exceeds maximum {max_size}")]
    BatchTooLarge { size: u32, max_size: u32 },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl QueueError {
    /// Check if error is transient and the operation may succeed later
    pub fn is_transient(&self) -> bool {
        match self {
            Self::QueueNotFound { .. } => false,
            Self::InvalidLock { .. } => false,
            Self::TransportUnavailable { .. } => true,
            Self::MessageTooLarge { .. } => false,
            Self::BatchTooLarge { .. } => false,
            Self::Serialization(_) => false,
            Self::Configuration(_) => false,
            Self::Validation(_) => false,
        }
    }

    /// Get suggested retry delay
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::TransportUnavailable { .. } => Some(Duration::seconds(5)),
            _ => None,
        }
    }
}

/// Errors during message body serialization/deserialization
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parsing failed: {message}")]
    Parsing { message: String },

    #[error("Unsupported provider '{provider}': {message}")]
    UnsupportedProvider { provider: String, message: String },
}

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("Value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
