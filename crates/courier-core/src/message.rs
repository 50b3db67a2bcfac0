//! Message envelope types shared by every queue facade.

use courier_runtime::{LockToken, MessageId, QueueName, ValidationError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A message kind that can travel through a courier queue.
///
/// Each implementing type maps to exactly one backlog queue (plus its
/// dead-letter companion), named by [`QueueMessage::QUEUE`]. Messages of
/// different kinds never interleave on one queue.
pub trait QueueMessage: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Backlog queue name for this message kind.
    const QUEUE: &'static str;

    /// Validated backlog queue name.
    fn queue_name() -> Result<QueueName, ValidationError> {
        QueueName::new(Self::QUEUE.to_string())
    }
}

/// The durable part of a message: delivery bookkeeping plus the payload.
///
/// `attempts` counts handling failures so far. It rides with the payload
/// through the transport, so a lease that lapses mid-processing resumes the
/// same attempt count on redelivery. Only a fresh send resets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub attempts: u32,
    pub payload: T,
}

/// A message received under a lease: envelope fields plus the lock token
/// granted for this delivery.
///
/// The token is consumed by exactly one of
/// [`complete`](crate::QueueManager::complete),
/// [`move_to_end`](crate::QueueManager::move_to_end), or
/// [`move_to_dead_letter`](crate::QueueManager::move_to_dead_letter); each
/// takes the message by value, so a second consumption of the same lease
/// does not compile.
#[derive(Debug)]
pub struct Received<T> {
    pub payload: T,
    pub attempts: u32,
    message_id: MessageId,
    lock: LockToken,
}

impl<T> Received<T> {
    pub(crate) fn new(envelope: Envelope<T>, message_id: MessageId, lock: LockToken) -> Self {
        Self {
            payload: envelope.payload,
            attempts: envelope.attempts,
            message_id,
            lock,
        }
    }

    /// Transport-assigned identifier of this delivery.
    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    pub(crate) fn lock(&self) -> &LockToken {
        &self.lock
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
