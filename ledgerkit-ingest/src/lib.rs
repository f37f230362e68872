//! ledgerkit-ingest: balance queries against the ledger tool and the report grammar.

pub mod ledger_cli;
pub mod report;

pub use ledger_cli::{BalanceError, BalanceSource, LedgerCli};
pub use report::{ReportError, parse_amount, parse_balance_report};

use ledgerkit_core::{BalanceSample, MonthWindowEntry};

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(transparent)]
    Window(#[from] ledgerkit_core::WindowError),
    #[error(transparent)]
    Balance(#[from] BalanceError),
}

/// Query each month of `window` in order. The first failure stops the run.
pub fn collect_balances(
    source: &impl BalanceSource,
    window: &[MonthWindowEntry],
) -> Result<Vec<BalanceSample>, CollectError> {
    let mut out = Vec::with_capacity(window.len());
    for month in window {
        let range = month.date_range()?;
        let amount = source.net_balance(&range)?;
        log::debug!("{} {}: {amount}", month.abbrev(), month.year);
        out.push(BalanceSample {
            month: *month,
            amount,
        });
    }
    Ok(out)
}
