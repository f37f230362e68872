use anyhow::{Context, Result};
use clap::Parser;
use ledgerkit_cli::{VERSION, config::load_config, logging};
use ledgerkit_market::{PriceFile, YahooClient, record_prices};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ledger-prices",
    version = VERSION,
    about = "Append today's closing prices to the ledger price file"
)]
struct Cli {
    /// Config file (default: ~/.ledgerkit/config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Price file to update (overrides prices.file from config)
    #[arg(long)]
    prices: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    log::info!("price run started");

    let cfg = load_config(cli.config.as_deref())?;
    let registry = cfg.registry().context("invalid [[symbols]] in config")?;
    let file = PriceFile::new(cli.prices.unwrap_or_else(|| cfg.prices.file.clone()));

    let client = YahooClient::new(&cfg.market.base_url, cfg.market_timeout())?;
    let report = record_prices(&client, &registry, &file, cfg.prices.on_fetch_error)
        .await
        .with_context(|| format!("updating {}", file.path().display()))?;

    println!(
        "{} new, {} already recorded, {} failed ({})",
        report.new_lines.len(),
        report.already_recorded.len(),
        report.failed.len(),
        file.path().display()
    );

    Ok(())
}
