//! Engine configuration, fault diagnostics, and the raw run result.

use crate::domain::Portfolio;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Proportional commission charged on both buys and sells.
    pub commission_rate: f64,
    /// Inclusive lower bound on bar timestamps; `None` means from the first bar.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on bar timestamps; `None` means to the last bar.
    pub end: Option<DateTime<Utc>>,
    /// Annualization factor for the metrics layer. 252 fits daily bars;
    /// callers running hourly or minute bars should set this accordingly.
    pub periods_per_year: f64,
}

impl EngineConfig {
    pub fn new(initial_capital: f64, commission_rate: f64) -> Self {
        Self {
            initial_capital,
            commission_rate,
            start: None,
            end: None,
            periods_per_year: 252.0,
        }
    }

    /// Restrict the run to the inclusive `[start, end]` timestamp window.
    pub fn with_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_periods_per_year(mut self, periods_per_year: f64) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }
}

/// A strategy error captured at the loop boundary.
///
/// A faulted bar produces no trade but never aborts the run; faults are
/// surfaced on the final report rather than logged and dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyFault {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Everything a finished run produced, before analysis.
///
/// The portfolio carries the trade log and snapshot log; the runner crate
/// turns this into realized P&L and a performance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub portfolio: Portfolio,
    pub faults: Vec<StrategyFault>,
    /// Wall-clock duration of the simulation loop.
    pub elapsed: Duration,
    /// Annualization factor the run was configured with, threaded through
    /// to the metrics layer.
    pub periods_per_year: f64,
}

impl RunResult {
    /// Final portfolio value: the last snapshot's total, or initial capital
    /// for a zero-bar run.
    pub fn final_value(&self) -> f64 {
        self.portfolio
            .snapshots
            .last()
            .map(|s| s.total_value)
            .unwrap_or(self.portfolio.initial_capital)
    }
}
