pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{ForwarderConfig, HttpForwarder};
pub use crate::config::{RelaySettings, TomlConfig};
pub use crate::core::relay::Relay;
pub use crate::server::{create_router, start_server, AppState};
pub use crate::utils::error::{RelayError, Result};
