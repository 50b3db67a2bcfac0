//! The transport contract a backing queue must satisfy.

use crate::error::QueueError;
use crate::message::{LeasedMessage, LockToken, MessageId, QueueName};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Duration;

/// Lock-based, two-phase queue operations.
///
/// A receive is a lease, not a removal: the message stays on the queue,
/// invisible to other receivers until the lease expires, and is only removed
/// by [`ack_complete`](Self::ack_complete) or moved by
/// [`dead_letter`](Self::dead_letter). The lease is the only concurrency
/// control primitive — at most one holder of a given message's lock token at
/// a time.
///
/// Dead-letter companion queues are addressed by derived name
/// ([`QueueName::dead_letter_of`]) and share this primitive set.
#[async_trait]
pub trait QueueTransport: Send + Sync + std::fmt::Debug {
    /// Provision the queue if absent. Idempotent.
    async fn ensure_queue(&self, queue: &QueueName) -> Result<(), QueueError>;

    /// Append a message body to the tail of the queue.
    ///
    /// Creates the queue if it does not exist yet; producers may be the
    /// first to touch a queue.
    async fn enqueue(&self, queue: &QueueName, body: Bytes) -> Result<MessageId, QueueError>;

    /// Lease one message, waiting up to `wait` for one to become available.
    ///
    /// Returns `None` when nothing is available within the wait window.
    /// The queue must exist ([`ensure_queue`](Self::ensure_queue)).
    async fn lease_receive(
        &self,
        queue: &QueueName,
        wait: Duration,
    ) -> Result<Option<LeasedMessage>, QueueError>;

    /// Lease up to `max_messages` immediately-available messages.
    ///
    /// Does not wait. Fails with [`QueueError::BatchTooLarge`] when
    /// `max_messages` exceeds [`max_batch_size`](Self::max_batch_size).
    async fn lease_batch(
        &self,
        queue: &QueueName,
        max_messages: u32,
    ) -> Result<Vec<LeasedMessage>, QueueError>;

    /// Permanently remove the leased message.
    ///
    /// Fails with [`QueueError::InvalidLock`] when the token is stale,
    /// expired, or already consumed.
    async fn ack_complete(&self, token: &LockToken) -> Result<(), QueueError>;

    /// Move the leased message into the dead-letter companion queue.
    ///
    /// Consumes the lock token under the same rules as
    /// [`ack_complete`](Self::ack_complete).
    async fn dead_letter(&self, token: &LockToken) -> Result<(), QueueError>;

    /// Number of visible (unleased) messages on the queue.
    async fn queue_depth(&self, queue: &QueueName) -> Result<u64, QueueError>;

    /// Maximum batch size accepted by [`lease_batch`](Self::lease_batch).
    fn max_batch_size(&self) -> u32;
}
