use anyhow::{Context, Result};
use clap::Parser;
use configuration::cli::Cli;
use tracing_subscriber::EnvFilter;

mod pipeline;

/// The main entry point for the fraud dataset analysis.
fn main() -> Result<()> {
    // RUST_LOG and EDA__* overrides may live in a .env file.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

    pipeline::run(&config)
}
