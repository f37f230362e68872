use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;
use ledgerkit_cli::{VERSION, args::normalize_single_dash, chart, config::load_config, logging};
use ledgerkit_core::{fiscal_window, trailing_window};
use ledgerkit_ingest::{LedgerCli, collect_balances};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ledger-graphs",
    version = VERSION,
    about = "Chart monthly net income (income - expenses) from a ledger file",
    long_about = "With no arguments, charts the 12 months ending with the current month.\n\
                  With -fiscal <year>, charts January through December of that year."
)]
struct Cli {
    /// Chart January..December of YEAR instead of the trailing 12 months
    #[arg(long, value_name = "YEAR")]
    fiscal: Option<i32>,

    /// Config file (default: ~/.ledgerkit/config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ledger file to query (overrides ledger.file from config)
    #[arg(long)]
    ledger: Option<PathBuf>,

    /// Print a table instead of opening the terminal chart
    #[arg(long, default_value_t = false)]
    print: bool,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse_from(normalize_single_dash(std::env::args_os(), &["fiscal"]));

    let cfg = load_config(cli.config.as_deref())?;
    let ledger_file = cli.ledger.unwrap_or_else(|| cfg.ledger.file.clone());
    if !ledger_file.exists() {
        bail!(
            "ledger file not found: {} (pass --ledger <path>)",
            ledger_file.display()
        );
    }

    let today = Local::now().date_naive();
    let window = match cli.fiscal {
        Some(year) => fiscal_window(year, today)?,
        None => trailing_window(today)?,
    };

    let source = LedgerCli::new(cfg.ledger.command.clone(), ledger_file);
    let samples = collect_balances(&source, &window).context("collecting monthly balances")?;

    let model = chart::ChartModel::from_samples(&samples);
    if cli.print {
        print!("{}", model.to_table());
    } else {
        chart::show(&model)?;
    }

    Ok(())
}
