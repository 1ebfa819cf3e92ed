use clap::Parser;
use std::path::PathBuf;

/// Exploratory analysis of the transaction fraud dataset.
///
/// Joins transactions with daily exchange rates, normalizes amounts to USD,
/// renders the charts and writes the text report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional TOML configuration file. Defaults apply when it is missing.
    #[arg(long, short, default_value = "config.toml")]
    pub config: PathBuf,
}
