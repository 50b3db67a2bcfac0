//! Retry/dead-letter engine: one bounded processing pass per message type.
//!
//! Driven by an external periodic trigger. Each invocation handles at most
//! `max_messages_per_pass` messages sequentially; consumer failures are
//! absorbed into requeue/dead-letter transitions while transport failures
//! end the invocation.

use crate::consumer::{ConsumerError, QueueConsumer};
use crate::manager::QueueManager;
use crate::message::QueueMessage;
use crate::settings::CourierSettings;
use courier_runtime::QueueError;
use tracing::{debug, error, info, warn};

/// Outcome counts for one processing pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Messages handled successfully and removed.
    pub completed: u64,
    /// Messages that failed and were moved to the tail for another attempt.
    pub requeued: u64,
    /// Messages that exhausted their attempt budget.
    pub dead_lettered: u64,
    /// Slots where no message became available within the wait window.
    pub empty_receives: u64,
}

impl BatchSummary {
    /// Total messages that went through a state transition this pass.
    pub fn handled(&self) -> u64 {
        self.completed + self.requeued + self.dead_lettered
    }
}

/// Drives receive→handle→transition cycles against a queue facade.
pub struct QueueProcessor {
    max_attempts: u32,
    max_messages_per_pass: u32,
}

impl QueueProcessor {
    pub fn new(settings: &CourierSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            max_messages_per_pass: settings.max_messages_per_pass,
        }
    }

    /// Run one bounded pass over `manager`'s queue.
    ///
    /// Reads the backlog size, clamps it to the per-pass ceiling, and for
    /// each slot leases one message and applies the state machine:
    /// consumer success completes the message; consumer failure increments
    /// `attempts` and either requeues it at the tail (below the attempt
    /// budget) or dead-letters it. A failing consumer never aborts the
    /// remaining slots; transport errors propagate immediately.
    pub async fn process_batch<T, C>(
        &self,
        manager: &QueueManager<T>,
        consumer: &C,
    ) -> Result<BatchSummary, QueueError>
    where
        T: QueueMessage,
        C: QueueConsumer<T> + ?Sized,
    {
        debug!(queue = %manager.queue_name(), "processing pass starting");

        let backlog = manager.count().await?;
        let slots = backlog.min(u64::from(self.max_messages_per_pass));
        info!(queue = %manager.queue_name(), backlog, slots, "processing messages");

        let mut summary = BatchSummary::default();
        for _ in 0..slots {
            let Some(mut message) = manager.receive().await? else {
                summary.empty_receives += 1;
                continue;
            };

            match consumer.process(&message.payload).await {
                Ok(()) => {
                    manager.complete(message).await?;
                    summary.completed += 1;
                }
                Err(failure) => {
                    match &failure {
                        ConsumerError::UnsupportedType { type_name } => warn!(
                            queue = %manager.queue_name(),
                            message_id = %message.message_id(),
                            type_name,
                            "consumer does not recognize this message kind"
                        ),
                        ConsumerError::Failed(source) => error!(
                            queue = %manager.queue_name(),
                            message_id = %message.message_id(),
                            error = %source,
                            "consumer failed to process message"
                        ),
                    }

                    message.attempts += 1;
                    if message.attempts < self.max_attempts {
                        manager.move_to_end(message).await?;
                        summary.requeued += 1;
                    } else {
                        manager.move_to_dead_letter(message).await?;
                        summary.dead_lettered += 1;
                    }
                }
            }
        }

        debug!(queue = %manager.queue_name(), ?summary, "processing pass done");
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
