use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use tasmota_exporter::config::{Config, LogFormat, LogLevel, LoggingConfig};
use tasmota_exporter::{outlet::OutletRegistry, server};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Comma-separated outlets in format 'name:ip' (e.g. 'livingroom:192.168.1.100,bedroom:192.168.1.101')
    #[arg(long, env = "TASMOTA_OUTLETS")]
    outlets: Option<String>,

    /// Port to listen on for metrics
    #[arg(short, long, env = "EXPORTER_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, env = "EXPORTER_ADDR")]
    addr: Option<String>,

    /// Log level (debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<LogLevel>,

    /// Per-device probe timeout in seconds
    #[arg(long)]
    probe_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    if let Some(outlets) = args.outlets {
        config.tasmota.outlets = outlets;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(timeout) = args.probe_timeout {
        config.tasmota.probe_timeout_seconds = timeout;
    }

    init_tracing(&config.logging);

    info!(
        "Starting Tasmota Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    let outlets = OutletRegistry::parse(&config.tasmota.outlets);
    if outlets.is_empty() {
        error!("no valid outlet configurations found");
        std::process::exit(1);
    }

    let configured: Vec<String> = outlets.iter().map(ToString::to_string).collect();
    info!(outlets = ?configured, "configured outlets");
    for name in outlets.duplicate_names() {
        warn!(
            outlet = name,
            "outlet name configured more than once, metrics will share one label"
        );
    }

    info!(
        "Metrics endpoint: http://{}:{}/metrics",
        config.server.addr, config.server.port
    );

    // Start the metrics server
    if let Err(e) = server::start(config, outlets).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Text output on a terminal, JSON lines otherwise (containers, log shippers)
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    let json = match logging.format {
        LogFormat::Json => true,
        LogFormat::Text => false,
        LogFormat::Auto => !std::io::stdout().is_terminal(),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
