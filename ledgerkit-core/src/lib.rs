//! ledgerkit-core: report windows, balance samples, price directives and the symbol registry

pub mod balance;
pub mod price;
pub mod registry;
pub mod window;

pub use balance::{BalanceSample, chronological, net_total, round2};
pub use price::{DailyClose, FormatOutcome, PriceBook, PriceEntry, directive_line, format_entry, format_price};
pub use registry::{RegistryError, SymbolRegistry, SymbolSpec, default_symbols};
pub use window::{
    DateRange, MonthWindowEntry, WINDOW_LEN, WindowError, collect_window, fiscal_window,
    trailing_window,
};
