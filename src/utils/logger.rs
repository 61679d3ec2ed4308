use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human output for terminals.
    Compact,
    /// JSON lines for log shippers.
    Json,
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "webhook_relay=debug,tower_http=debug,info"
    } else {
        "webhook_relay=info,tower_http=info"
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the verbosity default.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let base = fmt::layer()
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let layer = match format {
        LogFormat::Compact => base.with_target(false).compact().boxed(),
        LogFormat::Json => base.with_target(true).json().boxed(),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose))),
        )
        .with(layer)
        .init();
}
