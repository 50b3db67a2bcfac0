//! Queue identifiers, lock tokens, and leased messages.

use crate::error::ValidationError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed suffix under which a queue's dead-letter companion is addressed.
const DEAD_LETTER_SUFFIX: &str = "-dead-letter";

// ============================================================================
// Core Domain Identifiers
// ============================================================================

/// Validated queue name with length and character restrictions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueName(String);

impl QueueName {
    /// Create new queue name with validation
    pub fn new(name: String) -> Result<Self, ValidationError> {
        // Validate length
        if name.is_empty() || name.len() > 260 {
            return Err(ValidationError::OutOfRange {
                field: "queue_name".to_string(),
                message: "must be 1-260 characters".to_string(),
            });
        }

        // Validate characters (ASCII alphanumeric, hyphens, underscores)
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidFormat {
                field: "queue_name".to_string(),
                message: "only ASCII alphanumeric, hyphens, and underscores allowed".to_string(),
            });
        }

        // Validate no consecutive hyphens or leading/trailing hyphens
        if name.starts_with('-') || name.ends_with('-') || name.contains("--") {
            return Err(ValidationError::InvalidFormat {
                field: "queue_name".to_string(),
                message: "no leading/trailing hyphens or consecutive hyphens".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Name of the dead-letter companion queue for this queue.
    ///
    /// The companion shares the transport's primitive set; it is an ordinary
    /// queue under a derived name.
    pub fn dead_letter_of(&self) -> QueueName {
        Self(format!("{}{}", self.0, DEAD_LETTER_SUFFIX))
    }

    /// Whether this name addresses a dead-letter companion queue.
    pub fn is_dead_letter(&self) -> bool {
        self.0.ends_with(DEAD_LETTER_SUFFIX)
    }

    /// Get queue name as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QueueName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Unique identifier for messages within the queue system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Generate new random message ID
    pub fn new() -> Self {
        let id = uuid::Uuid::new_v4();
        Self(id.to_string())
    }

    /// Get message ID as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp wrapper for consistent time handling
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create timestamp for current time
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create timestamp from DateTime
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get underlying DateTime
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

// ============================================================================
// Lease Types
// ============================================================================

/// Opaque token identifying one in-flight delivery lease.
///
/// Populated by a lease receive and required to complete or dead-letter that
/// specific delivery. Not part of the message's durable payload; invalid once
/// the lease expires or the message is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken {
    token: String,
    queue: QueueName,
    expires_at: Timestamp,
}

impl LockToken {
    /// Create new lock token
    pub fn new(token: String, queue: QueueName, expires_at: Timestamp) -> Self {
        Self {
            token,
            queue,
            expires_at,
        }
    }

    /// Get token string
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Queue this lease was granted on
    pub fn queue(&self) -> &QueueName {
        &self.queue
    }

    /// Check if the lease has expired
    pub fn is_expired(&self) -> bool {
        Timestamp::now() >= self.expires_at
    }
}

/// A message handed out under a lease: durable body plus the lock token
/// granted for this delivery.
#[derive(Debug, Clone)]
pub struct LeasedMessage {
    pub message_id: MessageId,
    pub body: Bytes,
    pub lock_token: LockToken,
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
