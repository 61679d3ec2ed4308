use crate::core::ConfigProvider;
use crate::domain::model::Destination;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{validate_non_empty_list, validate_non_empty_string, validate_range};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const MIN_TIMEOUT_SECONDS: u64 = 1;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;
pub const MIN_BODY_BYTES: usize = 1024;
pub const MAX_BODY_BYTES: usize = 1024 * 1024 * 1024;

pub fn default_user_agent() -> String {
    format!("webhook-relay/{}", env!("CARGO_PKG_VERSION"))
}

/// Validated runtime configuration. Built once before the listener binds.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub host: String,
    pub port: u16,
    pub destinations: Vec<Destination>,
    pub delivery_timeout: Duration,
    pub user_agent: String,
    pub max_body_bytes: usize,
}

impl RelaySettings {
    pub fn from_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        validate_non_empty_string("server.host", config.host())?;

        if config.port() == 0 {
            return Err(RelayError::InvalidConfigValueError {
                field: "server.port".to_string(),
                value: "0".to_string(),
                reason: "Port must be non-zero".to_string(),
            });
        }

        validate_non_empty_list("relay.destinations", config.destinations())?;
        let destinations = config
            .destinations()
            .iter()
            .map(|url| Destination::parse(url))
            .collect::<Result<Vec<_>>>()?;

        let timeout = config.delivery_timeout();
        validate_range(
            "relay.timeout_seconds",
            timeout.as_secs(),
            MIN_TIMEOUT_SECONDS,
            MAX_TIMEOUT_SECONDS,
        )?;

        validate_range(
            "server.max_body_bytes",
            config.max_body_bytes(),
            MIN_BODY_BYTES,
            MAX_BODY_BYTES,
        )?;

        let user_agent = match config.user_agent() {
            Some(agent) => {
                validate_non_empty_string("relay.user_agent", agent)?;
                agent.to_string()
            }
            None => default_user_agent(),
        };

        Ok(Self {
            host: config.host().to_string(),
            port: config.port(),
            destinations,
            delivery_timeout: timeout,
            user_agent,
            max_body_bytes: config.max_body_bytes(),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
