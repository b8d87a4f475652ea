//! PerformanceReport — the read-only end product of one run.

use crate::metrics;
use crate::pnl::RealizedPnl;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tapelab_core::engine::{RunResult, StrategyFault};

/// Aggregate risk-adjusted performance of a single run.
///
/// Derived once after the loop finishes; every ratio follows the degenerate-
/// input policy in [`crate::metrics`] (0.0, never NaN).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    // ── Capital ──
    pub initial_capital: f64,
    pub final_value: f64,

    // ── Returns ──
    /// Fractional total return, `final/initial - 1`.
    pub total_return: f64,
    pub annualized_return: f64,

    // ── Risk ──
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    /// Negative fraction from the running peak.
    pub max_drawdown: f64,
    pub max_drawdown_at: Option<DateTime<Utc>>,

    // ── Trading activity ──
    pub total_trades: usize,
    pub buy_trades: usize,
    pub sell_trades: usize,
    /// Number of closing trades with a realized P&L entry.
    pub closed_trades: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub average_win: f64,
    /// Mean of the losing P&L entries; negative when losses exist.
    pub average_loss: f64,
    pub total_commission: f64,

    // ── Run diagnostics ──
    pub run_duration: Duration,
    /// Bars whose strategy evaluation returned an error. Never silently
    /// dropped; a faulted bar simply produced no trade.
    pub strategy_faults: Vec<StrategyFault>,
}

impl PerformanceReport {
    /// Assemble the report from a finished run and its reconstructed P&L.
    pub fn compute(result: &RunResult, realized: &[RealizedPnl]) -> Self {
        let initial = result.portfolio.initial_capital;
        let final_value = result.final_value();
        let values: Vec<f64> = result
            .portfolio
            .snapshots
            .iter()
            .map(|s| s.total_value)
            .collect();
        let returns = metrics::period_returns(&values);
        let ppy = result.periods_per_year;

        let annualized = metrics::annualized_return(initial, final_value, returns.len(), ppy);
        let (max_dd, max_dd_at) = metrics::max_drawdown(&result.portfolio.snapshots);

        let trades = &result.portfolio.trades;
        let buy_trades = trades.iter().filter(|t| t.side.is_buy()).count();

        Self {
            initial_capital: initial,
            final_value,
            total_return: metrics::total_return(initial, final_value),
            annualized_return: annualized,
            volatility: metrics::volatility(&returns, ppy),
            sharpe_ratio: metrics::sharpe_ratio(&returns, ppy),
            sortino_ratio: metrics::sortino_ratio(&returns, ppy),
            calmar_ratio: metrics::calmar_ratio(annualized, max_dd),
            max_drawdown: max_dd,
            max_drawdown_at: max_dd_at,
            total_trades: trades.len(),
            buy_trades,
            sell_trades: trades.len() - buy_trades,
            closed_trades: realized.len(),
            win_rate: metrics::win_rate(realized),
            profit_factor: metrics::profit_factor(realized),
            average_win: metrics::average_win(realized),
            average_loss: metrics::average_loss(realized),
            total_commission: result.portfolio.total_commission,
            run_duration: result.elapsed,
            strategy_faults: result.faults.clone(),
        }
    }
}
