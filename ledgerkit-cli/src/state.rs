use anyhow::{Context, Result};
use std::path::PathBuf;

/// `~/.ledgerkit`, where the optional config file lives.
pub fn ledgerkit_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".ledgerkit"))
}
