pub mod relay;

pub use crate::domain::model::{DeliveryOutcome, DeliveryStatus, Destination, FanOutReport};
pub use crate::domain::ports::{ConfigProvider, Forwarder};
pub use crate::utils::error::Result;
pub use relay::Relay;
