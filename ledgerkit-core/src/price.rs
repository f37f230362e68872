//! Price directives (`P <date> <symbol> <amount>`) and the book of already-recorded prices.
//!
//! Two line templates are written:
//!   home currency:  P 2024/03/01 TD $85.32
//!   USD:            P 2024-03-01 AAPL 150.25 $USD
//!
//! Both date spellings are accepted when reading an existing price file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::registry::SymbolSpec;

/// Decimal places kept when writing a price.
pub const PRICE_DECIMALS: i32 = 4;

/// Latest daily close reported by a market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub close: f64,
    /// Trading date in the exchange's timezone
    pub date: NaiveDate,
}

/// A price directive read back from the price file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub date: NaiveDate,
    pub symbol: String,
    /// Amount as written, including the currency marker (`$150.00`, `150.25 $USD`)
    pub amount: String,
}

impl PriceEntry {
    /// Parse one line. Anything that is not a `P` directive yields `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let amount = match tokens.as_slice() {
            ["P", _, _, amount] => amount.to_string(),
            ["P", _, _, amount, marker] => format!("{amount} {marker}"),
            _ => return None,
        };
        let date = parse_directive_date(tokens[1])?;
        Some(Self {
            date,
            symbol: tokens[2].to_string(),
            amount,
        })
    }
}

fn parse_directive_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y/%m/%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

/// Index of recorded prices keyed by (ledger symbol, date).
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    entries: HashMap<(String, NaiveDate), PriceEntry>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the full text of a price file. Non-directive lines are skipped.
    pub fn from_text(text: &str) -> Self {
        let mut book = Self::new();
        for entry in text.lines().filter_map(PriceEntry::parse_line) {
            book.insert(entry);
        }
        book
    }

    /// First entry for a key wins; later duplicates already on disk are ignored.
    pub fn insert(&mut self, entry: PriceEntry) {
        self.entries
            .entry((entry.symbol.clone(), entry.date))
            .or_insert(entry);
    }

    pub fn lookup(&self, symbol: &str, date: NaiveDate) -> Option<&PriceEntry> {
        self.entries.get(&(symbol.to_string(), date))
    }

    pub fn contains(&self, symbol: &str, date: NaiveDate) -> bool {
        self.lookup(symbol, date).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of trying to turn a fetched close into a new directive.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatOutcome {
    New(String),
    AlreadyRecorded(PriceEntry),
}

/// Round to [`PRICE_DECIMALS`] and print in shortest form (`150.25`, `12`).
pub fn format_price(price: f64) -> String {
    let scale = 10f64.powi(PRICE_DECIMALS);
    let rounded = (price * scale).round() / scale;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

/// Render the directive line for `spec` without consulting the book.
pub fn directive_line(spec: &SymbolSpec, close: &DailyClose) -> String {
    let price = format_price(close.close);
    if spec.foreign_currency {
        format!(
            "P {} {} {} $USD",
            close.date.format("%Y-%m-%d"),
            spec.ledger_name,
            price
        )
    } else {
        format!(
            "P {} {} ${}",
            close.date.format("%Y/%m/%d"),
            spec.ledger_name,
            price
        )
    }
}

/// Format a directive unless (ledger symbol, date) is already in `book`.
pub fn format_entry(spec: &SymbolSpec, close: &DailyClose, book: &PriceBook) -> FormatOutcome {
    match book.lookup(&spec.ledger_name, close.date) {
        Some(existing) => FormatOutcome::AlreadyRecorded(existing.clone()),
        None => FormatOutcome::New(directive_line(spec, close)),
    }
}
