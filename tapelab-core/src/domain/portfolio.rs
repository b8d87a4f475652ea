//! Portfolio — cash, holdings, and the append-only trade and snapshot logs.

use super::position::Position;
use super::snapshot::ValueSnapshot;
use super::trade::{TradeRecord, TradeSide};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Single source of truth for one simulation run.
///
/// Constructed fresh per run and never shared: concurrent sweeps each own
/// their portfolio. The equity identity must hold at every snapshot:
/// `total_value == cash + sum(position market values)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub positions: HashMap<String, Position>,
    /// Append-only, monotonically non-decreasing in timestamp.
    pub trades: Vec<TradeRecord>,
    /// Append-only, one entry per processed bar.
    pub snapshots: Vec<ValueSnapshot>,
    pub total_commission: f64,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            initial_capital,
            positions: HashMap::new(),
            trades: Vec::new(),
            snapshots: Vec::new(),
            total_commission: 0.0,
        }
    }

    /// Apply a validated trade: mutate cash and the position, append to the
    /// trade log.
    ///
    /// This never fails. Feasibility (funds, held quantity) is checked by
    /// the gatekeeper before the record is built.
    pub fn apply_trade(&mut self, trade: TradeRecord) {
        self.cash += trade.cash_delta();
        self.total_commission += trade.commission;

        match trade.side {
            TradeSide::Buy => {
                let pos = self
                    .positions
                    .entry(trade.symbol.clone())
                    .or_insert_with(|| Position::new(trade.symbol.clone()));
                pos.add(trade.quantity, trade.price, trade.commission);
            }
            TradeSide::Sell => {
                if let Some(pos) = self.positions.get_mut(&trade.symbol) {
                    pos.reduce(trade.quantity);
                    if pos.is_flat() {
                        self.positions.remove(&trade.symbol);
                    }
                }
            }
        }

        self.trades.push(trade);
    }

    /// Market value of all holdings at the given closes. A symbol with no
    /// close yet (possible in multi-asset runs with gaps) is carried at its
    /// cost basis.
    pub fn positions_value(&self, last_closes: &HashMap<String, f64>) -> f64 {
        self.positions
            .iter()
            .map(|(sym, pos)| {
                let price = last_closes.get(sym).copied().unwrap_or(pos.avg_cost);
                pos.market_value(price)
            })
            .sum()
    }

    /// Total value = cash + mark-to-market value of all holdings.
    pub fn mark_to_market(&self, last_closes: &HashMap<String, f64>) -> f64 {
        self.cash + self.positions_value(last_closes)
    }

    /// Append a value snapshot for the given timestamp.
    pub fn record_snapshot(
        &mut self,
        timestamp: DateTime<Utc>,
        last_closes: &HashMap<String, f64>,
    ) {
        let positions_value = self.positions_value(last_closes);
        let total_value = self.cash + positions_value;
        let cumulative_return_pct = if self.initial_capital > 0.0 {
            (total_value / self.initial_capital - 1.0) * 100.0
        } else {
            0.0
        };
        self.snapshots.push(ValueSnapshot {
            timestamp,
            total_value,
            cash: self.cash,
            positions_value,
            cumulative_return_pct,
        });
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol).filter(|p| !p.is_flat())
    }

    pub fn held_quantity(&self, symbol: &str) -> f64 {
        self.position(symbol).map_or(0.0, |p| p.quantity)
    }
}
