//! ledgerkit-market: market-data client, price file, and the price recording run

pub mod price_file;
pub mod recorder;
pub mod source;
pub mod yahoo;

pub use price_file::{PriceFile, PriceFileError};
pub use recorder::{FailurePolicy, RecordError, RecordReport, collect_new_lines, record_prices};
pub use source::{FetchError, QuoteSource};
pub use yahoo::{ClientError, DEFAULT_BASE_URL, YahooClient, parse_chart_response};
