//! baseball-prices - Price statistics for baseballminister.de searches
//!
//! Scrapes one search category and prints count, average, minimum and
//! maximum gross price.

use anyhow::Result;
use baseball_prices::commands::PricesCommand;
use baseball_prices::config::{Config, OutputFormat};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "baseball-prices",
    version,
    about = "Price statistics for baseballminister.de searches",
    long_about = "Scrapes a baseballminister.de search page, adds 19% VAT to every listed price and prints summary statistics."
)]
struct Cli {
    /// Search term appended to the shop's search URL
    #[arg(default_value = "softballschlaeger")]
    category: String,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of attempts before giving up
    #[arg(long)]
    retries: Option<u32>,

    /// Seconds to sleep after the first failed attempt
    #[arg(long)]
    delay: Option<u64>,

    /// Output format
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Print every scraped price and brand, not only the statistics
    #[arg(long)]
    records: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(retries) = cli.retries {
        config.retries = retries;
    }
    if let Some(delay) = cli.delay {
        config.initial_delay_secs = delay;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    let cmd = PricesCommand::new(config).with_records(cli.records);
    let output = cmd.execute(&cli.category).await?;
    println!("{}", output);

    Ok(())
}
