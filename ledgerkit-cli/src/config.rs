use anyhow::{Context, Result, bail};
use ledgerkit_core::{RegistryError, SymbolRegistry, SymbolSpec, default_symbols};
use ledgerkit_market::{DEFAULT_BASE_URL, FailurePolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::ledgerkit_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ledger: LedgerSection,
    pub prices: PricesSection,
    pub market: MarketSection,
    pub symbols: Vec<SymbolSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    /// Executable used for balance queries
    pub command: String,
    pub file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricesSection {
    pub file: PathBuf,
    /// "abort" stops the whole run on the first failed symbol; "skip" moves on
    pub on_fetch_error: FailurePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSection {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger: LedgerSection::default(),
            prices: PricesSection::default(),
            market: MarketSection::default(),
            symbols: default_symbols(),
        }
    }
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            command: "ledger".to_string(),
            file: PathBuf::from("ledger.dat"),
        }
    }
}

impl Default for PricesSection {
    fn default() -> Self {
        Self {
            file: PathBuf::from("prices.db"),
            on_fetch_error: FailurePolicy::Abort,
        }
    }
}

impl Default for MarketSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse config.toml")
    }

    pub fn registry(&self) -> Result<SymbolRegistry, RegistryError> {
        SymbolRegistry::new(self.symbols.clone())
    }

    pub fn market_timeout(&self) -> Duration {
        Duration::from_secs(self.market.timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ledgerkit_home()?.join("config.toml"))
}

/// Load `explicit` if given (it must exist), else `~/.ledgerkit/config.toml`
/// when present, else the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => match config_path() {
            Ok(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg = Config::from_toml_str(&s).with_context(|| format!("in {}", p.display()))?;
    log::debug!("loaded config from {}", p.display());
    Ok(cfg)
}
