//! Configuration for the Modules Proxy

use crate::domain::Selector;
use serde::{Deserialize, Serialize};
use shared_bus::InMemoryEventBus;
use thiserror::Error;

/// Invalid or unparsable configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },
}

/// Proxy configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Maximum modules (or module pairs) in one batched call
    pub max_batch_size: usize,
    /// Maximum selectors a single module may declare
    pub max_selectors_per_module: usize,
    /// Per-subscriber buffer of the bus built by [`ProxyConfig::event_bus`]
    pub event_channel_capacity: usize,
    /// Deployment-specific selectors that can never be routed
    pub extra_reserved_selectors: Vec<Selector>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 64,
            max_selectors_per_module: 256,
            event_channel_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
            extra_reserved_selectors: Vec::new(),
        }
    }
}

impl ProxyConfig {
    /// Defaults overridden by `MP_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let parse = |var: &'static str, current: usize| -> Result<usize, ConfigError> {
            match lookup(var) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnv { var, value }),
                None => Ok(current),
            }
        };

        config.max_batch_size = parse("MP_MAX_BATCH_SIZE", config.max_batch_size)?;
        config.max_selectors_per_module =
            parse("MP_MAX_SELECTORS_PER_MODULE", config.max_selectors_per_module)?;
        config.event_channel_capacity =
            parse("MP_EVENT_CHANNEL_CAPACITY", config.event_channel_capacity)?;

        config.validate()?;
        Ok(config)
    }

    /// Event bus sized by `event_channel_capacity`, for wiring into
    /// `ModulesProxyService::with_events` or `LogicBeacon::with_events`.
    pub fn event_bus(&self) -> InMemoryEventBus {
        InMemoryEventBus::with_capacity(self.event_channel_capacity)
    }

    /// Reject limits that would make every mutation fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_batch_size == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_batch_size",
            });
        }
        if self.max_selectors_per_module == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_selectors_per_module",
            });
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "event_channel_capacity",
            });
        }
        Ok(())
    }
}
