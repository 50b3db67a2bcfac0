//! Provider selection and configuration.

use crate::error::{ConfigurationError, QueueError};
use crate::providers::InMemoryTransport;
use crate::transport::QueueTransport;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Enumeration of transport providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    InMemory,
    AzureServiceBus,
    AwsSqs,
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::InMemory
    }
}

/// Transport selection plus provider-specific tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportSettings {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Connection string or endpoint for remote providers.
    #[serde(default)]
    pub connection_string: Option<String>,

    #[serde(default)]
    pub in_memory: InMemoryConfig,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::InMemory,
            connection_string: None,
            in_memory: InMemoryConfig::default(),
        }
    }
}

/// In-memory provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryConfig {
    /// Lease duration granted per receive, in seconds.
    pub lock_duration_secs: u64,
    /// Maximum durable message size in bytes.
    pub max_message_size: usize,
    /// Maximum messages handed out per batch lease.
    pub max_batch_size: u32,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            lock_duration_secs: 60,
            max_message_size: 192_000,
            max_batch_size: 100,
        }
    }
}

impl InMemoryConfig {
    /// Lease duration as a [`Duration`]
    pub fn lock_duration(&self) -> Duration {
        Duration::seconds(self.lock_duration_secs as i64)
    }
}

/// Factory for creating transports from settings
pub struct TransportFactory;

impl TransportFactory {
    /// Create a transport from configuration
    pub fn create(settings: &TransportSettings) -> Result<Arc<dyn QueueTransport>, QueueError> {
        match settings.provider {
            ProviderKind::InMemory => {
                Ok(Arc::new(InMemoryTransport::new(settings.in_memory.clone())))
            }
            ProviderKind::AzureServiceBus => Err(QueueError::Configuration(
                ConfigurationError::UnsupportedProvider {
                    provider: "azure-service-bus".to_string(),
                    message: "Azure Service Bus provider not yet implemented".to_string(),
                },
            )),
            ProviderKind::AwsSqs => Err(QueueError::Configuration(
                ConfigurationError::UnsupportedProvider {
                    provider: "aws-sqs".to_string(),
                    message: "AWS SQS provider not yet implemented".to_string(),
                },
            )),
        }
    }

    /// Create a test transport with the in-memory provider
    pub fn create_test_transport() -> Arc<dyn QueueTransport> {
        Arc::new(InMemoryTransport::new(InMemoryConfig::default()))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
