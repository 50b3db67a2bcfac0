//! The pluggable unit of business logic invoked per message.

use crate::message::QueueMessage;
use async_trait::async_trait;
use thiserror::Error;

/// Failure raised by a consumer while handling one message.
///
/// Every variant is absorbed by the processor and converted into a requeue
/// or dead-letter transition; none escapes a processing pass.
#[derive(Debug, Error)]
pub enum ConsumerError {
    /// The consumer was handed a message kind it is not wired for.
    ///
    /// Treated like any other failure for transition purposes, but logged
    /// distinctly: it indicates a wiring defect, not a transient fault.
    #[error("unsupported message type: {type_name}")]
    UnsupportedType { type_name: String },

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl ConsumerError {
    /// A plain failure with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(anyhow::Error::msg(message.into()))
    }

    /// An unsupported-kind failure naming the offending type.
    pub fn unsupported<T>() -> Self {
        Self::UnsupportedType {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }
}

/// Something that consumes messages pulled off a queue.
///
/// Implementations must tolerate repeat invocations with different attempt
/// counts on logically-equal payloads; an idempotent business effect is
/// recommended.
#[async_trait]
pub trait QueueConsumer<T: QueueMessage>: Send + Sync {
    /// Handle one message.
    async fn process(&self, message: &T) -> Result<(), ConsumerError>;
}
