//! Balance queries against the `ledger` command-line tool.

use ledgerkit_core::DateRange;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

use crate::report::{ReportError, parse_balance_report};

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status} for {range}: {stderr}")]
    Failed {
        command: String,
        status: String,
        range: DateRange,
        stderr: String,
    },

    #[error("could not parse ledger balance for {range}: {source}")]
    Parse {
        range: DateRange,
        #[source]
        source: ReportError,
    },
}

/// Anything that can report the net (income - expenses) balance for a date range.
pub trait BalanceSource {
    fn net_balance(&self, range: &DateRange) -> Result<f64, BalanceError>;
}

/// Shells out to `ledger -f <file> -b <begin> -e <end> balance Income Expenses --invert`.
#[derive(Debug, Clone)]
pub struct LedgerCli {
    pub command: String,
    pub ledger_file: PathBuf,
}

impl LedgerCli {
    pub fn new(command: impl Into<String>, ledger_file: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            ledger_file: ledger_file.into(),
        }
    }

    /// Arguments passed after the command name.
    pub fn args(&self, range: &DateRange) -> Vec<String> {
        vec![
            "-f".to_string(),
            self.ledger_file.display().to_string(),
            "-b".to_string(),
            range.begin_arg(),
            "-e".to_string(),
            range.end_arg(),
            "balance".to_string(),
            "Income".to_string(),
            "Expenses".to_string(),
            "--invert".to_string(),
        ]
    }
}

impl BalanceSource for LedgerCli {
    fn net_balance(&self, range: &DateRange) -> Result<f64, BalanceError> {
        let args = self.args(range);
        log::debug!("running {} {}", self.command, args.join(" "));

        let output = Command::new(&self.command)
            .args(&args)
            .output()
            .map_err(|source| BalanceError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BalanceError::Failed {
                command: self.command.clone(),
                status: output.status.to_string(),
                range: *range,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_balance_report(&stdout).map_err(|source| BalanceError::Parse {
            range: *range,
            source,
        })
    }
}
