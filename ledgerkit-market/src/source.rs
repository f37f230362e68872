//! Market-data provider seam.

use ledgerkit_core::DailyClose;
use thiserror::Error;

/// Per-symbol fetch failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The provider answered but has nothing for this symbol.
    #[error("no data for {ticker}: {reason}")]
    NoData { ticker: String, reason: String },

    /// The provider answered with something we cannot interpret.
    #[error("data for {ticker} not in expected format: {reason}")]
    Malformed { ticker: String, reason: String },

    /// The request itself failed (network, HTTP status).
    #[error("request for {ticker} failed: {reason}")]
    Transport { ticker: String, reason: String },
}

impl FetchError {
    pub fn no_data(ticker: &str, reason: impl Into<String>) -> Self {
        Self::NoData {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(ticker: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    pub fn transport(ticker: &str, reason: impl Into<String>) -> Self {
        Self::Transport {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    pub fn ticker(&self) -> &str {
        match self {
            Self::NoData { ticker, .. } | Self::Malformed { ticker, .. } | Self::Transport { ticker, .. } => {
                ticker
            }
        }
    }
}

/// Latest daily close for a provider ticker.
#[allow(async_fn_in_trait)]
pub trait QuoteSource {
    async fn latest_close(&self, ticker: &str) -> Result<DailyClose, FetchError>;
}
