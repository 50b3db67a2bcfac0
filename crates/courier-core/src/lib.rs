//! # Courier Core
//!
//! Retry-aware message consumption over a lock-based, two-phase queue.
//!
//! A message flows from "available", to "locked for processing", to either
//! "completed", "requeued for another attempt", or "dead-lettered", with a
//! bounded attempt budget and tail-ordering on retried messages.
//!
//! The pieces:
//! - [`QueueMessage`] / [`Envelope`] / [`Received`] - the message envelope:
//!   a durable attempt counter riding with the payload, plus a single-use
//!   lock token per delivery
//! - [`QueueManager`] - the typed facade over a
//!   [`QueueTransport`](courier_runtime::QueueTransport): send, receive,
//!   complete, move-to-end, move-to-dead-letter, count, clear
//! - [`QueueConsumer`] - the pluggable unit of business logic invoked per
//!   message
//! - [`QueueProcessor`] - the engine driving one bounded
//!   receive→handle→transition pass per invocation
//! - [`CourierSettings`] - the explicit configuration surface
//!
//! ## Usage
//!
//! ```no_run
//! use courier_core::{CourierSettings, QueueManager, QueueProcessor};
//! use courier_runtime::TransportFactory;
//! # use courier_core::{ConsumerError, QueueConsumer, QueueMessage};
//! # use serde::{Deserialize, Serialize};
//! # #[derive(Debug, Clone, Serialize, Deserialize)]
//! # struct Invoice { number: String }
//! # impl QueueMessage for Invoice { const QUEUE: &'static str = "invoices"; }
//! # struct InvoiceConsumer;
//! # #[async_trait::async_trait]
//! # impl QueueConsumer<Invoice> for InvoiceConsumer {
//! #     async fn process(&self, _message: &Invoice) -> Result<(), ConsumerError> { Ok(()) }
//! # }
//!
//! # async fn run() -> Result<(), courier_core::QueueError> {
//! let settings = CourierSettings::default();
//! let transport = TransportFactory::create(&settings.transport)?;
//!
//! let manager = QueueManager::<Invoice>::open(transport, &settings).await?;
//! manager.send(&Invoice { number: "A-1".into() }).await?;
//!
//! let processor = QueueProcessor::new(&settings);
//! let summary = processor.process_batch(&manager, &InvoiceConsumer).await?;
//! assert_eq!(summary.completed, 1);
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod consumer;
pub mod manager;
pub mod message;
pub mod processor;
pub mod settings;

// Re-export commonly used types at crate root for convenience
pub use consumer::{ConsumerError, QueueConsumer};
pub use manager::QueueManager;
pub use message::{Envelope, QueueMessage, Received};
pub use processor::{BatchSummary, QueueProcessor};
pub use settings::CourierSettings;

// Re-export transport types callers need alongside the facade
pub use courier_runtime::{
    QueueError, QueueName, QueueTransport, TransportFactory, TransportSettings,
};
