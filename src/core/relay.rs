use crate::core::{DeliveryOutcome, Destination, FanOutReport, Forwarder};
use crate::utils::error::{RelayError, Result};
use bytes::Bytes;
use futures::future::join_all;
use std::sync::Arc;
use tracing::Instrument;

/// Fans one inbound payload out to every configured destination.
#[derive(Clone)]
pub struct Relay {
    forwarder: Arc<dyn Forwarder>,
    destinations: Arc<[Destination]>,
}

impl Relay {
    pub fn new(forwarder: Arc<dyn Forwarder>, destinations: Vec<Destination>) -> Self {
        Self {
            forwarder,
            destinations: destinations.into(),
        }
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Parses an inbound body. Empty or non-JSON bodies are rejected.
    pub fn parse_payload(body: &[u8]) -> Result<serde_json::Value> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(RelayError::malformed("request body is empty"));
        }
        serde_json::from_slice(body).map_err(|e| RelayError::malformed(e.to_string()))
    }

    /// Sends `payload` to every destination concurrently and waits for all
    /// attempts to finish.
    ///
    /// Each attempt runs in its own task so a dropped caller does not cancel
    /// deliveries already issued. Failures never short-circuit the others.
    pub async fn fan_out(&self, payload: &serde_json::Value) -> Result<FanOutReport> {
        let body = Bytes::from(serde_json::to_vec(payload)?);

        let handles: Vec<_> = self
            .destinations
            .iter()
            .cloned()
            .map(|destination| {
                let forwarder = Arc::clone(&self.forwarder);
                let body = body.clone();
                tokio::spawn(
                    async move { forwarder.forward(&destination, body).await }
                        .in_current_span(),
                )
            })
            .collect();

        let outcomes = join_all(handles)
            .await
            .into_iter()
            .zip(self.destinations.iter())
            .map(|(joined, destination)| match joined {
                Ok(outcome) => outcome,
                Err(e) => DeliveryOutcome::aborted(destination.clone(), e.to_string()),
            })
            .collect();

        let report = FanOutReport::new(outcomes);
        log_report(&report);
        Ok(report)
    }
}

fn log_report(report: &FanOutReport) {
    for outcome in report.successes() {
        tracing::info!(
            destination = %outcome.destination,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "✅ {}",
            outcome.status
        );
    }

    for outcome in report.failures() {
        tracing::warn!(
            destination = %outcome.destination,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "❌ {}",
            outcome.status
        );
    }

    tracing::info!(
        attempted = report.attempted(),
        delivered = report.delivered(),
        failed = report.failed(),
        "📤 Fan-out completed"
    );
}
