use anyhow::Result;
use clap::Parser;
use nature_remo_exporter::{config::Config, nature::NatureClient, server};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Host to listen on [default: 127.0.0.1]
    #[arg(short = 'h', long)]
    host: Option<String>,

    /// Port to listen on [default: 8080]
    #[arg(short, long)]
    port: Option<u16>,

    /// Nature Remo access token (overrides config)
    #[arg(long, env = "NATURE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Nature Remo Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    let mut config = Config::load(&args.config)?;

    if let Some(token) = args.access_token {
        config.nature.access_token = secrecy::SecretString::new(token.into());
    }
    if let Some(host) = args.host {
        config.server.addr = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    if config.nature.access_token.expose_secret().is_empty() {
        warn!("No access token configured; set NATURE_ACCESS_TOKEN or the API will reject every request");
    }

    info!("Configuration loaded successfully");
    info!("Nature Remo API: {}", config.nature.base_url);
    info!(
        "Metrics endpoint: http://{}:{}/metrics",
        config.server.addr, config.server.port
    );

    let client = NatureClient::new(&config.nature)?;

    if let Err(e) = server::start(config, Arc::new(client)).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Shutdown complete");
    Ok(())
}
