//! ledgerkit-cli: shared plumbing for the `ledger-graphs` and `ledger-prices` binaries

pub mod args;
pub mod chart;
pub mod config;
pub mod logging;
pub mod state;

pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LEDGERKIT_BUILD_SHA"), ")");
