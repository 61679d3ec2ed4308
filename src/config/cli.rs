use crate::config::settings::{
    RelaySettings, DEFAULT_HOST, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT, DEFAULT_TIMEOUT_SECONDS,
};
use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "webhook-relay")]
#[command(about = "Receives webhooks and forwards each payload to a fixed set of destinations")]
#[command(version)]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "RELAY_CONFIG")]
    pub config: Option<String>,

    /// Address to listen on
    #[arg(long, env = "RELAY_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "RELAY_PORT")]
    pub port: Option<u16>,

    /// Comma separated destination URLs
    #[arg(long, env = "RELAY_DESTINATIONS", value_delimiter = ',')]
    pub destinations: Vec<String>,

    /// Per-destination delivery timeout
    #[arg(long, env = "RELAY_TIMEOUT_SECONDS")]
    pub timeout_seconds: Option<u64>,

    /// Largest accepted inbound webhook body, in bytes
    #[arg(long, env = "RELAY_MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Print the resolved configuration and exit without listening
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Resolves the effective settings: file values first, then explicit flags.
    pub fn resolve(&self) -> Result<RelaySettings> {
        match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let mut file_config = TomlConfig::from_file(path)?;
                self.apply_overrides(&mut file_config);
                RelaySettings::from_provider(&file_config)
            }
            None => RelaySettings::from_provider(self),
        }
    }

    fn apply_overrides(&self, file_config: &mut TomlConfig) {
        if let Some(host) = &self.host {
            tracing::info!("🔧 Host overridden to: {}", host);
            file_config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            tracing::info!("🔧 Port overridden to: {}", port);
            file_config.server.port = port;
        }
        if !self.destinations.is_empty() {
            tracing::info!("🔧 Destinations overridden ({} urls)", self.destinations.len());
            file_config.relay.destinations = self.destinations.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            tracing::info!("🔧 Timeout overridden to: {}s", timeout);
            file_config.relay.timeout_seconds = Some(timeout);
        }
        if let Some(limit) = self.max_body_bytes {
            tracing::info!("🔧 Body limit overridden to: {} bytes", limit);
            file_config.server.max_body_bytes = Some(limit);
        }
    }
}

impl ConfigProvider for CliConfig {
    fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    fn destinations(&self) -> &[String] {
        &self.destinations
    }

    fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }
}
