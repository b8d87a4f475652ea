//! TapeLab Runner — pure analysis over finished simulation runs.
//!
//! - `pnl`: average-cost realized P&L reconstruction from the trade log
//! - `metrics`: pure performance-metric functions (returns, ratios, drawdown)
//! - `report`: the aggregate `PerformanceReport`
//! - `runner`: `run_backtest` wiring engine + analysis into a `BacktestResult`
//! - `fingerprint`: deterministic run identity for replayability
//! - `sweep`: rayon-parallel parameter grids, one fresh engine per run

pub mod fingerprint;
pub mod metrics;
pub mod pnl;
pub mod report;
pub mod runner;
pub mod sweep;

pub use fingerprint::{DatasetHash, RunFingerprint, RunId};
pub use pnl::{reconstruct_realized_pnl, PnlError, RealizedPnl};
pub use report::PerformanceReport;
pub use runner::{run_backtest, BacktestResult, RunError, SCHEMA_VERSION};
pub use sweep::{run_sweep, ParamGrid, SweepError, SweepOutcome};
