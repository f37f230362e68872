//! Grammar for `ledger balance` output.
//!
//! Expected shapes:
//!
//! ```text
//! (empty)                                 -> 0
//!
//!          $500.00  Income                -> 500.00
//!
//!        $-1,234.56  Expenses
//!           $500.00  Income
//! --------------------
//!          $-734.56                       -> -734.56
//! ```
//!
//! Anything else is rejected rather than guessed at.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-{3,}\s*$").expect("separator regex"));

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<lead>-)?\$(?P<inner>-)?",
        r"(?P<int>\d{1,3}(?:,\d{3})+|\d+)",
        r"(?P<frac>\.\d+)?$"
    ))
    .expect("amount regex")
});

// AMOUNT  ACCOUNT (two or more spaces between)
static ACCOUNT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<amount>\S+)\s{2,}(?P<account>\S.*)$").expect("account line regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("unrecognized amount {0:?}")]
    UnrecognizedAmount(String),
    #[error("expected a single total line after the separator, found {0}")]
    TotalNotSingleLine(usize),
    #[error("expected one account line or a totalled report, found {0} lines")]
    UntotalledReport(usize),
    #[error("line is not `<amount>  <account>`: {0:?}")]
    MalformedLine(String),
}

/// Parse a single amount token (`$1,234.56`, `$-12`, `-$0.50`, `0`).
pub fn parse_amount(token: &str) -> Result<f64, ReportError> {
    let token = token.trim();
    if token == "0" {
        return Ok(0.0);
    }
    let caps = AMOUNT_RE
        .captures(token)
        .ok_or_else(|| ReportError::UnrecognizedAmount(token.to_string()))?;

    let negative = match (caps.name("lead"), caps.name("inner")) {
        (Some(_), Some(_)) => return Err(ReportError::UnrecognizedAmount(token.to_string())),
        (Some(_), None) | (None, Some(_)) => true,
        (None, None) => false,
    };

    let mut digits = caps["int"].replace(',', "");
    if let Some(frac) = caps.name("frac") {
        digits.push_str(frac.as_str());
    }
    let value: f64 = digits
        .parse()
        .map_err(|_| ReportError::UnrecognizedAmount(token.to_string()))?;

    Ok(if negative { -value } else { value })
}

/// Extract the net amount from a balance report. Empty output means no postings.
pub fn parse_balance_report(text: &str) -> Result<f64, ReportError> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return Ok(0.0);
    }

    if let Some(sep) = lines.iter().rposition(|l| SEPARATOR_RE.is_match(l)) {
        let total = &lines[sep + 1..];
        if total.len() != 1 {
            return Err(ReportError::TotalNotSingleLine(total.len()));
        }
        return parse_amount(total[0]);
    }

    if lines.len() != 1 {
        return Err(ReportError::UntotalledReport(lines.len()));
    }
    let caps = ACCOUNT_LINE_RE
        .captures(lines[0])
        .ok_or_else(|| ReportError::MalformedLine(lines[0].trim().to_string()))?;
    parse_amount(&caps["amount"])
}
