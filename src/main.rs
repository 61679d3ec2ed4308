use clap::Parser;
use std::sync::Arc;
use webhook_relay::utils::error::{ErrorSeverity, RelayError};
use webhook_relay::utils::logger::{self, LogFormat};
use webhook_relay::{
    start_server, AppState, CliConfig, ForwarderConfig, HttpForwarder, Relay, RelaySettings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let format = if config.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, config.verbose);

    tracing::info!("Starting webhook-relay {}", env!("CARGO_PKG_VERSION"));
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // Validate before anything binds.
    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_settings_summary(&settings);

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - not listening");
        return Ok(());
    }

    let forwarder = match HttpForwarder::new(ForwarderConfig::from(&settings)) {
        Ok(forwarder) => forwarder,
        Err(e) => fail(e),
    };
    let relay = Relay::new(Arc::new(forwarder), settings.destinations.clone());

    let state = AppState::new(relay).with_max_body_bytes(settings.max_body_bytes);
    if let Err(e) = start_server(state, &settings.host, settings.port).await {
        fail(e);
    }

    Ok(())
}

fn display_settings_summary(settings: &RelaySettings) {
    println!("\n📋 Relay Summary:");
    println!("  Listen: {}", settings.bind_address());
    println!("  Timeout: {:?} per destination", settings.delivery_timeout);
    println!("  User agent: {}", settings.user_agent);
    println!("  Max body: {} bytes", settings.max_body_bytes);
    println!("  Destinations ({}):", settings.destinations.len());
    for destination in &settings.destinations {
        println!("    → {}", destination);
    }
    println!();
}

fn fail(e: RelayError) -> ! {
    tracing::error!(
        "❌ Relay failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
