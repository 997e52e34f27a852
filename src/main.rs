use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use weatherboard::{WeatherBoardConfig, WeatherService, logging, web};

/// Weather dashboard API: current conditions and seven-day forecast charts
#[derive(Parser, Debug)]
#[command(name = "weatherboard", version, about)]
struct Cli {
    /// TOML configuration file (defaults to ./weatherboard.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = WeatherBoardConfig::load_from_path(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    logging::init(&config.logging).context("Failed to initialize logging")?;
    info!("Starting weatherboard {}", weatherboard::VERSION);

    let service = WeatherService::new(&config).context("Failed to build weather service")?;
    web::run(&config, Arc::new(service))
        .await
        .context("Web server failed")?;

    Ok(())
}
