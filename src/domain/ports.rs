use crate::domain::model::{DeliveryOutcome, Destination};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn destinations(&self) -> &[String];
    fn delivery_timeout(&self) -> Duration;
    /// Largest inbound body accepted by `POST /webhook`.
    fn max_body_bytes(&self) -> usize;
    fn user_agent(&self) -> Option<&str> {
        None
    }
}

/// Sends one serialized payload to one destination.
///
/// Implementations never fail: transport errors, timeouts and non-2xx
/// answers are reported through the returned outcome.
#[async_trait]
pub trait Forwarder: Send + Sync + 'static {
    async fn forward(&self, destination: &Destination, body: Bytes) -> DeliveryOutcome;
}
