//! Outbound HTTP delivery built on a single pooled `reqwest::Client`.

use crate::config::settings::RelaySettings;
use crate::core::{DeliveryOutcome, DeliveryStatus, Destination, Forwarder};
use crate::utils::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::error::Error as _;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    /// Upper bound for one attempt, connect through response headers.
    pub timeout: Duration,
    pub user_agent: String,
}

impl From<&RelaySettings> for ForwarderConfig {
    fn from(settings: &RelaySettings) -> Self {
        Self {
            timeout: settings.delivery_timeout,
            user_agent: settings.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: Client,
}

impl HttpForwarder {
    pub fn new(config: ForwarderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, destination: &Destination, body: Bytes) -> DeliveryOutcome {
        tracing::debug!("Forwarding {} bytes to: {}", body.len(), destination);
        let started = Instant::now();

        let result = self
            .client
            .post(destination.url().clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        // The destination's response body is never read.
        let status = match result {
            Ok(response) if response.status().is_success() => DeliveryStatus::Delivered {
                status_code: response.status().as_u16(),
            },
            Ok(response) => DeliveryStatus::Rejected {
                status_code: response.status().as_u16(),
            },
            Err(e) if e.is_timeout() => DeliveryStatus::TimedOut,
            Err(e) => DeliveryStatus::Unreachable {
                reason: describe_transport_error(&e),
            },
        };

        DeliveryOutcome::new(destination.clone(), status, started.elapsed())
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    let mut reason = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        reason.push_str(": ");
        reason.push_str(&inner.to_string());
        source = inner.source();
    }
    reason
}
