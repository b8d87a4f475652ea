//! ValueSnapshot — one point on the portfolio's equity curve.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-bar portfolio valuation, recorded after the strategy has acted on
/// that bar. The accounting identity `total_value == cash + positions_value`
/// must hold at every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSnapshot {
    pub timestamp: DateTime<Utc>,
    pub total_value: f64,
    pub cash: f64,
    pub positions_value: f64,
    /// Cumulative return since the start of the run, in percent.
    pub cumulative_return_pct: f64,
}
