//! In-memory queue transport implementation.
//!
//! A fully functional lock-based queue that:
//! - Keeps visible messages in FIFO order per queue
//! - Grants time-bounded leases on receive; leased messages are invisible
//!   until acknowledged, dead-lettered, or the lease lapses
//! - Stores dead-lettered messages in an ordinary companion queue under the
//!   derived `-dead-letter` name
//!
//! Intended for unit testing of consumers and as the reference
//! implementation for remote providers.

use crate::error::QueueError;
use crate::message::{LeasedMessage, LockToken, MessageId, QueueName, Timestamp};
use crate::provider::InMemoryConfig;
use crate::transport::QueueTransport;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use tracing::debug;

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

/// Sleep between availability checks while a lease receive is waiting.
const LEASE_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(20);

// ============================================================================
// Internal Storage Structures
// ============================================================================

/// Thread-safe storage for all queues
struct QueueStorage {
    queues: HashMap<QueueName, InMemoryQueue>,
}

impl QueueStorage {
    fn new() -> Self {
        Self {
            queues: HashMap::new(),
        }
    }
}

/// Internal state for a single queue
struct InMemoryQueue {
    /// Visible messages in FIFO order
    messages: VecDeque<StoredMessage>,
    /// Leased messages keyed by lock token
    in_flight: HashMap<String, InFlightMessage>,
}

impl InMemoryQueue {
    fn new() -> Self {
        Self {
            messages: VecDeque::new(),
            in_flight: HashMap::new(),
        }
    }

    /// Return messages whose lease has lapsed to visibility.
    ///
    /// Reclaimed messages go to the front of the queue; a redelivery may
    /// precede the message's original position.
    fn reclaim_expired(&mut self) {
        let now = Timestamp::now();
        let lapsed: Vec<String> = self
            .in_flight
            .iter()
            .filter(|(_, held)| now >= held.lock_expires_at)
            .map(|(token, _)| token.clone())
            .collect();

        for token in lapsed {
            if let Some(held) = self.in_flight.remove(&token) {
                debug!(token = %token, message_id = %held.message.message_id, "lease lapsed, message visible again");
                self.messages.push_front(held.message);
            }
        }
    }

    /// Move one visible message into the in-flight map under a fresh token.
    fn lease(
        &mut self,
        queue: &QueueName,
        message: StoredMessage,
        lock_duration: Duration,
    ) -> LeasedMessage {
        let token = uuid::Uuid::new_v4().to_string();
        let expires_at = Timestamp::from_datetime(Utc::now() + lock_duration);

        self.in_flight.insert(
            token.clone(),
            InFlightMessage {
                message: message.clone(),
                lock_expires_at: expires_at.clone(),
            },
        );

        LeasedMessage {
            message_id: message.message_id,
            body: message.body,
            lock_token: LockToken::new(token, queue.clone(), expires_at),
        }
    }
}

/// A message stored on a queue
#[derive(Clone)]
struct StoredMessage {
    message_id: MessageId,
    body: Bytes,
}

/// A message currently held under a lease
struct InFlightMessage {
    message: StoredMessage,
    lock_expires_at: Timestamp,
}

// ============================================================================
// InMemoryTransport
// ============================================================================

/// In-memory queue transport implementation
pub struct InMemoryTransport {
    storage: Arc<RwLock<QueueStorage>>,
    config: InMemoryConfig,
}

impl std::fmt::Debug for InMemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl InMemoryTransport {
    /// Create new in-memory transport with configuration
    pub fn new(config: InMemoryConfig) -> Self {
        Self {
            storage: Arc::new(RwLock::new(QueueStorage::new())),
            config,
        }
    }

    /// Run an operation against the queue map under the storage lock.
    ///
    /// The lock is never held across an await point.
    fn with_queues<R>(
        &self,
        op: impl FnOnce(&mut HashMap<QueueName, InMemoryQueue>) -> Result<R, QueueError>,
    ) -> Result<R, QueueError> {
        let mut storage =
            self.storage
                .write()
                .map_err(|_| QueueError::TransportUnavailable {
                    message: "in-memory storage lock poisoned".to_string(),
                })?;
        op(&mut storage.queues)
    }

    /// One non-waiting lease attempt.
    fn try_lease_one(&self, queue: &QueueName) -> Result<Option<LeasedMessage>, QueueError> {
        let lock_duration = self.config.lock_duration();
        self.with_queues(|queues| {
            let state = known_queue(queues, queue)?;
            state.reclaim_expired();
            match state.messages.pop_front() {
                Some(message) => Ok(Some(state.lease(queue, message, lock_duration))),
                None => Ok(None),
            }
        })
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new(InMemoryConfig::default())
    }
}

/// Look up a queue that must already exist.
fn known_queue<'a>(
    queues: &'a mut HashMap<QueueName, InMemoryQueue>,
    queue: &QueueName,
) -> Result<&'a mut InMemoryQueue, QueueError> {
    queues.get_mut(queue).ok_or_else(|| QueueError::QueueNotFound {
        queue_name: queue.to_string(),
    })
}

/// Take the in-flight entry for a token, validating the lease.
///
/// An entry whose lease lapsed has already been reclaimed to the queue by
/// the time this runs, so a lookup miss covers stale, expired, and
/// already-consumed tokens alike.
fn take_in_flight(
    queues: &mut HashMap<QueueName, InMemoryQueue>,
    token: &LockToken,
) -> Result<InFlightMessage, QueueError> {
    let invalid = || QueueError::InvalidLock {
        token: token.token().to_string(),
    };

    let state = queues.get_mut(token.queue()).ok_or_else(invalid)?;
    state.reclaim_expired();
    state.in_flight.remove(token.token()).ok_or_else(invalid)
}

#[async_trait]
impl QueueTransport for InMemoryTransport {
    async fn ensure_queue(&self, queue: &QueueName) -> Result<(), QueueError> {
        self.with_queues(|queues| {
            queues.entry(queue.clone()).or_insert_with(InMemoryQueue::new);
            Ok(())
        })
    }

    async fn enqueue(&self, queue: &QueueName, body: Bytes) -> Result<MessageId, QueueError> {
        if body.len() > self.config.max_message_size {
            return Err(QueueError::MessageTooLarge {
                size: body.len(),
                max_size: self.config.max_message_size,
            });
        }

        let message_id = MessageId::new();
        self.with_queues(|queues| {
            let state = queues.entry(queue.clone()).or_insert_with(InMemoryQueue::new);
            state.messages.push_back(StoredMessage {
                message_id: message_id.clone(),
                body,
            });
            Ok(())
        })?;

        Ok(message_id)
    }

    async fn lease_receive(
        &self,
        queue: &QueueName,
        wait: Duration,
    ) -> Result<Option<LeasedMessage>, QueueError> {
        let wait = wait.to_std().unwrap_or_default();
        let deadline = std::time::Instant::now() + wait;

        loop {
            if let Some(leased) = self.try_lease_one(queue)? {
                return Ok(Some(leased));
            }
            if std::time::Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(LEASE_POLL_INTERVAL).await;
        }
    }

    async fn lease_batch(
        &self,
        queue: &QueueName,
        max_messages: u32,
    ) -> Result<Vec<LeasedMessage>, QueueError> {
        if max_messages > self.config.max_batch_size {
            return Err(QueueError::BatchTooLarge {
                size: max_messages,
                max_size: self.config.max_batch_size,
            });
        }

        let lock_duration = self.config.lock_duration();
        self.with_queues(|queues| {
            let state = known_queue(queues, queue)?;
            state.reclaim_expired();

            let mut batch = Vec::new();
            while batch.len() < max_messages as usize {
                match state.messages.pop_front() {
                    Some(message) => batch.push(state.lease(queue, message, lock_duration)),
                    None => break,
                }
            }
            Ok(batch)
        })
    }

    async fn ack_complete(&self, token: &LockToken) -> Result<(), QueueError> {
        self.with_queues(|queues| {
            take_in_flight(queues, token)?;
            Ok(())
        })
    }

    async fn dead_letter(&self, token: &LockToken) -> Result<(), QueueError> {
        let companion = token.queue().dead_letter_of();
        self.with_queues(|queues| {
            let held = take_in_flight(queues, token)?;
            debug!(
                queue = %token.queue(),
                message_id = %held.message.message_id,
                "message moved to dead-letter queue"
            );
            queues
                .entry(companion)
                .or_insert_with(InMemoryQueue::new)
                .messages
                .push_back(held.message);
            Ok(())
        })
    }

    async fn queue_depth(&self, queue: &QueueName) -> Result<u64, QueueError> {
        self.with_queues(|queues| {
            let state = known_queue(queues, queue)?;
            state.reclaim_expired();
            Ok(state.messages.len() as u64)
        })
    }

    fn max_batch_size(&self) -> u32 {
        self.config.max_batch_size
    }
}
