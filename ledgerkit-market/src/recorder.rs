//! Fetch the latest close for every registered symbol and append the new directives.

use ledgerkit_core::{
    DailyClose, FormatOutcome, PriceBook, PriceEntry, SymbolRegistry, SymbolSpec, format_entry, format_price,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::price_file::{PriceFile, PriceFileError};
use crate::source::{FetchError, QuoteSource};

/// What to do when one symbol cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run; nothing is written.
    #[default]
    Abort,
    /// Log the failure and keep going with the remaining symbols.
    Skip,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("aborting price run: {0}")]
    Aborted(FetchError),
    #[error(transparent)]
    File(#[from] PriceFileError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordReport {
    /// New directives in registry order
    pub new_lines: Vec<String>,
    /// Tickers whose (symbol, date) was already on file
    pub already_recorded: Vec<String>,
    /// Failures tolerated under [`FailurePolicy::Skip`]
    pub failed: Vec<FetchError>,
}

/// Fetch and format every symbol against `book`. New directives are added to
/// `book` as they are produced so a batch never repeats a key.
pub async fn collect_new_lines<Q: QuoteSource>(
    source: &Q,
    registry: &SymbolRegistry,
    book: &mut PriceBook,
    policy: FailurePolicy,
) -> Result<RecordReport, RecordError> {
    let mut report = RecordReport::default();

    for spec in registry.iter() {
        let close = match source.latest_close(&spec.ticker).await {
            Ok(close) => close,
            Err(e) => match policy {
                FailurePolicy::Abort => {
                    log::error!("{e}, exiting...");
                    return Err(RecordError::Aborted(e));
                }
                FailurePolicy::Skip => {
                    log::warn!("{e}, skipping");
                    report.failed.push(e);
                    continue;
                }
            },
        };

        match format_entry(spec, &close, book) {
            FormatOutcome::AlreadyRecorded(existing) => {
                log::info!("{}", existing_price_notice(spec, &close, &existing));
                report.already_recorded.push(spec.ticker.clone());
            }
            FormatOutcome::New(line) => {
                if let Some(entry) = PriceEntry::parse_line(&line) {
                    book.insert(entry);
                }
                report.new_lines.push(line);
            }
        }
    }

    Ok(report)
}

fn existing_price_notice(spec: &SymbolSpec, close: &DailyClose, existing: &PriceEntry) -> String {
    format!(
        "existing price found for {} on {}: {} (${})",
        spec.ticker,
        close.date,
        existing.amount,
        format_price(close.close)
    )
}

/// Load `file`, collect new directives, append them in one pass.
pub async fn record_prices<Q: QuoteSource>(
    source: &Q,
    registry: &SymbolRegistry,
    file: &PriceFile,
    policy: FailurePolicy,
) -> Result<RecordReport, RecordError> {
    let mut book = file.load_book()?;
    log::debug!("{} prices already recorded in {}", book.len(), file.path().display());

    let report = collect_new_lines(source, registry, &mut book, policy).await?;
    file.append_batch(&report.new_lines)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_existing_price_notice_rounds_close() {
        let spec = SymbolSpec::new("TD.TO", "TD", false);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let close = DailyClose { close: 85.31999969482422, date };
        let existing = PriceEntry::parse_line("P 2024/03/01 TD $85.32").unwrap();

        assert_eq!(
            existing_price_notice(&spec, &close, &existing),
            "existing price found for TD.TO on 2024-03-01: $85.32 ($85.32)"
        );
    }
}
