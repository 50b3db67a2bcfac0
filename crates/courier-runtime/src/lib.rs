//! # Courier Runtime
//!
//! Lock-based, two-phase queue transport for retry-aware message
//! consumption.
//!
//! This library provides:
//! - The [`QueueTransport`] contract a backing queue must satisfy:
//!   enqueue, lease-based receive, acknowledge, dead-letter, batch lease,
//!   and depth queries
//! - Validated queue identifiers with derived dead-letter companion names
//! - A complete in-memory provider implementing visibility-timeout
//!   semantics, used for tests and as the reference implementation
//!
//! ## Module Organization
//!
//! - [`error`] - Error types for all transport operations
//! - [`message`] - Queue identifiers, lock tokens, and leased messages
//! - [`provider`] - Provider selection and configuration
//! - [`providers`] - Concrete transport implementations
//! - [`transport`] - The transport trait

// Module declarations
pub mod error;
pub mod message;
pub mod provider;
pub mod providers;
pub mod transport;

// Re-export commonly used types at crate root for convenience
pub use error::{ConfigurationError, QueueError, SerializationError, ValidationError};
pub use message::{LeasedMessage, LockToken, MessageId, QueueName, Timestamp};
pub use provider::{InMemoryConfig, ProviderKind, TransportFactory, TransportSettings};
pub use providers::InMemoryTransport;
pub use transport::QueueTransport;
