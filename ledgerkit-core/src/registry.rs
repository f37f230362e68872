//! Symbol registry: which provider tickers get priced, and how they appear in the ledger.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("ticker listed twice: {0}")]
    DuplicateTicker(String),
    #[error("ticker {ticker} has an invalid ledger name {name:?}")]
    InvalidLedgerName { ticker: String, name: String },
    #[error("empty ticker")]
    EmptyTicker,
}

/// One priced security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSpec {
    /// Provider ticker, e.g. `TD.TO`
    pub ticker: String,
    /// Commodity name used in the ledger, e.g. `TD`
    pub ledger_name: String,
    /// USD-denominated; written with an explicit `$USD` marker
    #[serde(default)]
    pub foreign_currency: bool,
}

impl SymbolSpec {
    pub fn new(ticker: &str, ledger_name: &str, foreign_currency: bool) -> Self {
        Self {
            ticker: ticker.to_string(),
            ledger_name: ledger_name.to_string(),
            foreign_currency,
        }
    }
}

/// Ordered, validated list of symbols. Order is the on-disk append order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRegistry {
    symbols: Vec<SymbolSpec>,
}

impl SymbolRegistry {
    pub fn new(symbols: Vec<SymbolSpec>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for s in &symbols {
            if s.ticker.trim().is_empty() {
                return Err(RegistryError::EmptyTicker);
            }
            // Ledger names are single whitespace-free tokens in a price directive.
            if s.ledger_name.is_empty() || s.ledger_name.chars().any(char::is_whitespace) {
                return Err(RegistryError::InvalidLedgerName {
                    ticker: s.ticker.clone(),
                    name: s.ledger_name.clone(),
                });
            }
            if !seen.insert(s.ticker.as_str()) {
                return Err(RegistryError::DuplicateTicker(s.ticker.clone()));
            }
        }
        Ok(Self { symbols })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolSpec> {
        self.symbols.iter()
    }

    pub fn get(&self, ticker: &str) -> Option<&SymbolSpec> {
        self.symbols.iter().find(|s| s.ticker == ticker)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The portfolio priced by default: US holdings in USD, TSX holdings in the home currency.
pub fn default_symbols() -> Vec<SymbolSpec> {
    vec![
        SymbolSpec::new("BRK-B", "BRKB", true),
        SymbolSpec::new("AAPL", "AAPL", true),
        SymbolSpec::new("BLK", "BLK", true),
        SymbolSpec::new("DIS", "DIS", true),
        SymbolSpec::new("MSFT", "MSFT", true),
        SymbolSpec::new("TD.TO", "TD", false),
        SymbolSpec::new("RY.TO", "RY", false),
        SymbolSpec::new("ENB.TO", "ENB", false),
        SymbolSpec::new("VFV.TO", "VFV", false),
        SymbolSpec::new("XBAL.TO", "XBAL", false),
        SymbolSpec::new("XGRO.TO", "XGRO", false),
    ]
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
        }
    }
}
