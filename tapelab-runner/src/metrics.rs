//! Performance metrics — pure functions from run history to scalars.
//!
//! Every metric is a pure function: snapshot values and/or realized P&L in,
//! scalar out. Degenerate inputs (empty series, zero variance, no losing
//! trades, zero drawdown) resolve deterministically to 0.0, never to NaN or
//! an error — tests can assert exact values.

use crate::pnl::RealizedPnl;
use chrono::{DateTime, Utc};
use tapelab_core::domain::ValueSnapshot;

/// Per-period returns `r_t = v_t / v_{t-1} - 1` over consecutive values.
/// The first value has no defined return.
pub fn period_returns(values: &[f64]) -> Vec<f64> {
    if values.len() < 2 {
        return Vec::new();
    }
    values
        .windows(2)
        .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

/// Total return as a fraction: `final / initial - 1`.
pub fn total_return(initial: f64, final_value: f64) -> f64 {
    if initial <= 0.0 {
        return 0.0;
    }
    final_value / initial - 1.0
}

/// Annualized return `(final/initial)^(ppy/N) - 1`, where N is the number of
/// return observations. 252 periods per year fits daily bars; the engine
/// config makes the factor adjustable for other intervals.
pub fn annualized_return(
    initial: f64,
    final_value: f64,
    n_periods: usize,
    periods_per_year: f64,
) -> f64 {
    if initial <= 0.0 || final_value <= 0.0 || n_periods == 0 || periods_per_year <= 0.0 {
        return 0.0;
    }
    (final_value / initial).powf(periods_per_year / n_periods as f64) - 1.0
}

/// Annualized volatility: `std(r) * sqrt(ppy)`.
pub fn volatility(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    std_dev(returns) * periods_per_year.sqrt()
}

/// Annualized Sharpe ratio: `mean(r) / std(r) * sqrt(ppy)`, risk-free rate 0.
/// Exactly 0.0 when the return variance is zero.
pub fn sharpe_ratio(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let std = std_dev(returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean(returns) / std) * periods_per_year.sqrt()
}

/// Annualized Sortino ratio: the denominator is the standard deviation of
/// only the negative returns. 0.0 when there are none (or too few for a
/// deviation to exist).
pub fn sortino_ratio(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let negatives: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if negatives.is_empty() {
        return 0.0;
    }
    let downside_std = std_dev(&negatives);
    if downside_std < 1e-15 {
        return 0.0;
    }
    (mean(returns) / downside_std) * periods_per_year.sqrt()
}

/// Maximum drawdown as a negative fraction from the running peak, together
/// with the timestamp at which it occurred. `(0.0, None)` for constant or
/// monotonically rising series.
pub fn max_drawdown(snapshots: &[ValueSnapshot]) -> (f64, Option<DateTime<Utc>>) {
    if snapshots.len() < 2 {
        return (0.0, None);
    }
    let mut peak = snapshots[0].total_value;
    let mut max_dd = 0.0_f64;
    let mut at = None;

    for snap in snapshots {
        if snap.total_value > peak {
            peak = snap.total_value;
        }
        if peak > 0.0 {
            let dd = (snap.total_value - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
                at = Some(snap.timestamp);
            }
        }
    }
    (max_dd, at)
}

/// Calmar ratio: `annualized_return / |max_drawdown|`, 0.0 when the drawdown
/// is zero.
pub fn calmar_ratio(annualized_return: f64, max_drawdown: f64) -> f64 {
    if max_drawdown == 0.0 {
        return 0.0;
    }
    annualized_return / max_drawdown.abs()
}

/// Win rate: fraction of closing trades with positive realized P&L.
pub fn win_rate(realized: &[RealizedPnl]) -> f64 {
    if realized.is_empty() {
        return 0.0;
    }
    let wins = realized.iter().filter(|r| r.pnl > 0.0).count();
    wins as f64 / realized.len() as f64
}

/// Profit factor: `sum(wins) / |sum(losses)|`, 0.0 when there are no losing
/// trades (documented zero-division policy).
pub fn profit_factor(realized: &[RealizedPnl]) -> f64 {
    let gross_profit: f64 = realized.iter().filter(|r| r.pnl > 0.0).map(|r| r.pnl).sum();
    let gross_loss: f64 = realized
        .iter()
        .filter(|r| r.pnl < 0.0)
        .map(|r| r.pnl.abs())
        .sum();
    if gross_loss < 1e-15 {
        return 0.0;
    }
    gross_profit / gross_loss
}

/// Arithmetic mean of the positive realized P&L entries, 0.0 when none.
pub fn average_win(realized: &[RealizedPnl]) -> f64 {
    let wins: Vec<f64> = realized.iter().map(|r| r.pnl).filter(|p| *p > 0.0).collect();
    if wins.is_empty() {
        return 0.0;
    }
    mean(&wins)
}

/// Arithmetic mean of the negative realized P&L entries (a negative number),
/// 0.0 when none.
pub fn average_loss(realized: &[RealizedPnl]) -> f64 {
    let losses: Vec<f64> = realized.iter().map(|r| r.pnl).filter(|p| *p < 0.0).collect();
    if losses.is_empty() {
        return 0.0;
    }
    mean(&losses)
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; 0.0 below two observations.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tapelab_core::domain::OrderId;

    fn snapshots(values: &[f64]) -> Vec<ValueSnapshot> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| ValueSnapshot {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1 + i as u32, 21, 0, 0).unwrap(),
                total_value: v,
                cash: v,
                positions_value: 0.0,
                cumulative_return_pct: 0.0,
            })
            .collect()
    }

    fn pnls(values: &[f64]) -> Vec<RealizedPnl> {
        values
            .iter()
            .enumerate()
            .map(|(i, &pnl)| RealizedPnl {
                order_id: OrderId(i as u64 + 1),
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1 + i as u32, 21, 0, 0).unwrap(),
                symbol: "SPY".into(),
                quantity: 1.0,
                pnl,
            })
            .collect()
    }

    #[test]
    fn period_returns_drop_the_first_observation() {
        let r = period_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.10).abs() < 1e-12);
        assert!((r[1] - (99.0 / 110.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn drawdown_on_known_series() {
        // [100, 110, 90, 95, 120] -> (90 - 110) / 110 at index 2.
        let snaps = snapshots(&[100.0, 110.0, 90.0, 95.0, 120.0]);
        let (dd, at) = max_drawdown(&snaps);
        assert!((dd - (90.0 - 110.0) / 110.0).abs() < 1e-12);
        assert_eq!(at, Some(snaps[2].timestamp));
    }

    #[test]
    fn drawdown_on_rising_series_is_zero() {
        let snaps = snapshots(&[100.0, 101.0, 102.0]);
        assert_eq!(max_drawdown(&snaps), (0.0, None));
    }

    #[test]
    fn sharpe_of_zero_variance_returns_is_exactly_zero() {
        let flat = vec![0.0; 20];
        assert_eq!(sharpe_ratio(&flat, 252.0), 0.0);
        let constant = vec![0.01; 20];
        assert_eq!(sharpe_ratio(&constant, 252.0), 0.0);
        assert_eq!(sharpe_ratio(&[], 252.0), 0.0);
    }

    #[test]
    fn sortino_without_negative_returns_is_zero() {
        assert_eq!(sortino_ratio(&[0.01, 0.02, 0.0, 0.03], 252.0), 0.0);
    }

    #[test]
    fn sortino_uses_only_downside_deviation() {
        let returns = [0.02, -0.01, 0.03, -0.03, 0.01];
        let negatives = [-0.01, -0.03];
        let expected = mean(&returns) / std_dev(&negatives) * 252.0_f64.sqrt();
        assert!((sortino_ratio(&returns, 252.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn annualized_return_uses_observation_count() {
        // One year of daily observations annualizes to the total return.
        let ann = annualized_return(100.0, 110.0, 252, 252.0);
        assert!((ann - 0.10).abs() < 1e-9);
        // Half a year compounds up.
        let ann_half = annualized_return(100.0, 110.0, 126, 252.0);
        assert!((ann_half - (1.1_f64.powf(2.0) - 1.0)).abs() < 1e-9);
        assert_eq!(annualized_return(100.0, 110.0, 0, 252.0), 0.0);
    }

    #[test]
    fn profit_factor_policy_on_no_losses() {
        assert_eq!(profit_factor(&pnls(&[10.0, 5.0])), 0.0);
        assert_eq!(profit_factor(&[]), 0.0);
        let pf = profit_factor(&pnls(&[30.0, -10.0]));
        assert!((pf - 3.0).abs() < 1e-12);
    }

    #[test]
    fn win_rate_and_averages() {
        let realized = pnls(&[10.0, -5.0, 20.0, -15.0]);
        assert!((win_rate(&realized) - 0.5).abs() < 1e-12);
        assert!((average_win(&realized) - 15.0).abs() < 1e-12);
        assert!((average_loss(&realized) + 10.0).abs() < 1e-12);
        assert_eq!(win_rate(&[]), 0.0);
        assert_eq!(average_win(&[]), 0.0);
        assert_eq!(average_loss(&[]), 0.0);
    }

    #[test]
    fn calmar_zero_drawdown_is_zero() {
        assert_eq!(calmar_ratio(0.2, 0.0), 0.0);
        assert!((calmar_ratio(0.2, -0.1) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn volatility_of_constant_series_is_zero() {
        // Mean of a constant series carries float residue; the deviation is
        // at the 1e-18 scale, not exactly zero.
        assert!(volatility(&[0.01; 10], 252.0).abs() < 1e-12);
        assert_eq!(volatility(&[], 252.0), 0.0);
    }
}
