pub mod health;
pub mod webhook;

pub use health::{health_check, HealthResponse};
pub use webhook::{receive_webhook, AckResponse, ErrorResponse, ACK_STATUS};
