//! Typed queue facade composed from transport primitives.
//!
//! A [`QueueManager`] presents the per-message-type operations the
//! processing engine needs: send, lease-based receive, complete,
//! move-to-end, move-to-dead-letter, count, and clear. It owns exactly one
//! transport binding, released when the facade is dropped.

use crate::message::{Envelope, QueueMessage, Received};
use crate::settings::CourierSettings;
use bytes::Bytes;
use chrono::Duration;
use courier_runtime::{QueueError, QueueName, QueueTransport, SerializationError};
use std::marker::PhantomData;
use std::sync::Arc;

/// Batch ceiling used while draining a queue.
const CLEAR_BATCH_LIMIT: u32 = 100;

/// Typed operations on one message kind's backlog queue.
pub struct QueueManager<T: QueueMessage> {
    transport: Arc<dyn QueueTransport>,
    queue: QueueName,
    receive_wait: Duration,
    _kind: PhantomData<fn() -> T>,
}

impl<T: QueueMessage> QueueManager<T> {
    /// Open the facade for `T`'s backlog queue, provisioning it if absent.
    pub async fn open(
        transport: Arc<dyn QueueTransport>,
        settings: &CourierSettings,
    ) -> Result<Self, QueueError> {
        let queue = T::queue_name()?;
        Self::open_named(transport, queue, settings.receive_wait()).await
    }

    async fn open_named(
        transport: Arc<dyn QueueTransport>,
        queue: QueueName,
        receive_wait: Duration,
    ) -> Result<Self, QueueError> {
        transport.ensure_queue(&queue).await?;
        Ok(Self {
            transport,
            queue,
            receive_wait,
            _kind: PhantomData,
        })
    }

    /// An independent facade over this queue's dead-letter companion.
    ///
    /// The two facades share no state beyond the transport itself.
    pub async fn dead_letters(&self) -> Result<QueueManager<T>, QueueError> {
        Self::open_named(
            Arc::clone(&self.transport),
            self.queue.dead_letter_of(),
            self.receive_wait,
        )
        .await
    }

    /// Name of the queue this facade operates on.
    pub fn queue_name(&self) -> &QueueName {
        &self.queue
    }

    /// Enqueue a fresh message at the tail, with zero attempts.
    pub async fn send(&self, payload: &T) -> Result<(), QueueError> {
        self.send_envelope(0, payload).await
    }

    async fn send_envelope(&self, attempts: u32, payload: &T) -> Result<(), QueueError> {
        let body =
            serde_json::to_vec(&Envelope { attempts, payload }).map_err(SerializationError::Json)?;
        self.transport.enqueue(&self.queue, Bytes::from(body)).await?;
        Ok(())
    }

    /// Lease one message, waiting up to the configured window.
    ///
    /// Returns `None` when nothing becomes available in the window. The
    /// returned message stays on the queue, invisible to other receivers,
    /// until completed, moved, or its lease lapses.
    pub async fn receive(&self) -> Result<Option<Received<T>>, QueueError> {
        let Some(leased) = self
            .transport
            .lease_receive(&self.queue, self.receive_wait)
            .await?
        else {
            return Ok(None);
        };

        let envelope: Envelope<T> =
            serde_json::from_slice(&leased.body).map_err(SerializationError::Json)?;
        Ok(Some(Received::new(envelope, leased.message_id, leased.lock_token)))
    }

    /// Mark the message processed and remove it permanently.
    ///
    /// Hands the payload back to the caller.
    pub async fn complete(&self, message: Received<T>) -> Result<T, QueueError> {
        self.transport.ack_complete(message.lock()).await?;
        Ok(message.payload)
    }

    /// Re-enqueue the message at the tail, then complete the current lease.
    ///
    /// The requeued copy is ordered after every message present at call
    /// time and carries the message's current `attempts` value. Enqueue
    /// happens before the ack: a crash between the two leaves a duplicate
    /// at the tail, never a lost message.
    pub async fn move_to_end(&self, message: Received<T>) -> Result<(), QueueError> {
        self.send_envelope(message.attempts, &message.payload).await?;
        self.transport.ack_complete(message.lock()).await
    }

    /// Move the message into the dead-letter companion queue.
    pub async fn move_to_dead_letter(&self, message: Received<T>) -> Result<(), QueueError> {
        self.transport.dead_letter(message.lock()).await
    }

    /// Number of visible (unleased) messages on the backlog.
    pub async fn count(&self) -> Result<u64, QueueError> {
        self.transport.queue_depth(&self.queue).await
    }

    /// Drain the queue by leasing and completing messages in bounded
    /// batches until none are visible. Returns how many were drained.
    ///
    /// A reset path for tests and operational cleanup, not part of
    /// steady-state processing.
    pub async fn clear(&self) -> Result<u64, QueueError> {
        let batch_limit = CLEAR_BATCH_LIMIT.min(self.transport.max_batch_size());
        let mut drained = 0u64;

        while self.transport.queue_depth(&self.queue).await? > 0 {
            let batch = self.transport.lease_batch(&self.queue, batch_limit).await?;
            if batch.is_empty() {
                // Everything left is leased elsewhere; nothing to drain.
                break;
            }
            for message in batch {
                self.transport.ack_complete(&message.lock_token).await?;
                drained += 1;
            }
        }

        Ok(drained)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
