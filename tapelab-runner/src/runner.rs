//! Backtest runner — wires the engine loop together with P&L reconstruction
//! and the performance report.

use crate::fingerprint::RunFingerprint;
use crate::pnl::{reconstruct_realized_pnl, PnlError, RealizedPnl};
use crate::report::PerformanceReport;
use serde::{Deserialize, Serialize};
use tapelab_core::domain::{Bar, TradeRecord, ValueSnapshot};
use tapelab_core::engine::EngineConfig;
use tapelab_core::strategy::{Strategy, StrategyParams};
use thiserror::Error;

/// Current schema version for persisted results.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("realized P&L reconstruction failed: {0}")]
    Pnl(#[from] PnlError),
}

/// Complete result of a single backtest run: the report plus the full
/// history downstream consumers (exporters, renderers) read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub report: PerformanceReport,
    pub trades: Vec<TradeRecord>,
    pub snapshots: Vec<ValueSnapshot>,
    pub realized_pnl: Vec<RealizedPnl>,
    pub fingerprint: RunFingerprint,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run one backtest end to end: simulate, reconstruct realized P&L, and
/// compute the performance report.
///
/// An empty bar slice yields a zero-trade result with `final_value ==
/// initial capital`, never an error. The only error path is a trade log the
/// average-cost replay cannot cover, which the engine by construction does
/// not produce.
pub fn run_backtest(
    strategy: &mut dyn Strategy,
    bars: &[Bar],
    params: &StrategyParams,
    config: &EngineConfig,
) -> Result<BacktestResult, RunError> {
    let fingerprint = RunFingerprint::new(strategy.name(), bars, params, config);
    let result = tapelab_core::engine::run_backtest(strategy, bars, params, config);
    let realized = reconstruct_realized_pnl(&result.portfolio.trades)?;
    let report = PerformanceReport::compute(&result, &realized);

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        report,
        trades: result.portfolio.trades,
        snapshots: result.portfolio.snapshots,
        realized_pnl: realized,
        fingerprint,
    })
}
