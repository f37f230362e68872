//! Monthly net balances (income minus expenses).

use serde::{Deserialize, Serialize};

use crate::window::MonthWindowEntry;

/// Net amount for one month of a report window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSample {
    pub month: MonthWindowEntry,
    /// Positive = net income, negative = net spend
    pub amount: f64,
}

/// Round half away from zero to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    let r = (x * 100.0).round() / 100.0;
    if r == 0.0 { 0.0 } else { r }
}

/// Sum of all amounts, rounded to cents.
pub fn net_total(samples: &[BalanceSample]) -> f64 {
    round2(samples.iter().map(|s| s.amount).sum())
}

/// Put samples in calendar order, oldest first.
pub fn chronological(mut samples: Vec<BalanceSample>) -> Vec<BalanceSample> {
    samples.sort_by_key(|s| (s.month.year, s.month.month));
    samples
}
