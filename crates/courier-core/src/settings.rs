//! Configuration surface consumed by facades and the processor.
//!
//! Settings are an explicit struct handed into construction; nothing reads
//! ambient state at instantiation time. [`CourierSettings::load`] is the
//! opt-in path for file/environment loading.

use chrono::Duration;
use courier_runtime::{ConfigurationError, TransportSettings};
use serde::{Deserialize, Serialize};

fn default_max_attempts() -> u32 {
    3
}

fn default_max_messages_per_pass() -> u32 {
    5
}

fn default_receive_wait_secs() -> u64 {
    5
}

/// Settings for queue facades and the processing engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierSettings {
    /// Transport selection and provider tunables.
    #[serde(default)]
    pub transport: TransportSettings,

    /// Attempt budget per message before it is dead-lettered.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Ceiling on messages handled by one processing pass.
    #[serde(default = "default_max_messages_per_pass")]
    pub max_messages_per_pass: u32,

    /// Wait window per receive, in seconds.
    #[serde(default = "default_receive_wait_secs")]
    pub receive_wait_secs: u64,
}

impl Default for CourierSettings {
    fn default() -> Self {
        Self {
            transport: TransportSettings::default(),
            max_attempts: default_max_attempts(),
            max_messages_per_pass: default_max_messages_per_pass(),
            receive_wait_secs: default_receive_wait_secs(),
        }
    }
}

impl CourierSettings {
    /// Load settings from an optional `config/courier.toml` plus
    /// `COURIER__`-prefixed environment variables (later sources win).
    ///
    /// Every field carries a default, so an entirely unconfigured
    /// environment yields valid settings; a malformed file or
    /// uncoercible variable is a hard error.
    pub fn load() -> Result<Self, ConfigurationError> {
        let settings: Self = config::Config::builder()
            .add_source(
                config::File::with_name("config/courier")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("COURIER").separator("__"))
            .build()
            .map_err(|e| ConfigurationError::Parsing {
                message: e.to_string(),
            })?
            .try_deserialize()
            .map_err(|e| ConfigurationError::Parsing {
                message: e.to_string(),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that cannot drive a meaningful pass.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_attempts == 0 {
            return Err(ConfigurationError::Invalid {
                message: "max_attempts must be at least 1".to_string(),
            });
        }
        if self.max_messages_per_pass == 0 {
            return Err(ConfigurationError::Invalid {
                message: "max_messages_per_pass must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Receive wait window as a [`Duration`]
    pub fn receive_wait(&self) -> Duration {
        Duration::seconds(self.receive_wait_secs as i64)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
