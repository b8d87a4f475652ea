//! Position — per-asset holding with an average cost basis.

use serde::{Deserialize, Serialize};

/// Quantities at or below this are treated as flat, absorbing float residue
/// from repeated partial sells.
pub const QTY_EPSILON: f64 = 1e-10;

/// Long-only holding in a single asset.
///
/// `avg_cost` is the commission-inclusive weighted-average purchase price
/// per unit. Invariant: `quantity == 0.0` implies `avg_cost == 0.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub avg_cost: f64,
}

impl Position {
    pub fn new(symbol: String) -> Self {
        Self {
            symbol,
            quantity: 0.0,
            avg_cost: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.quantity <= QTY_EPSILON
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.quantity * current_price
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.quantity * (current_price - self.avg_cost)
    }

    /// Add to the holding, folding the trade's commission into the basis.
    ///
    /// New basis = weighted mean of prior holding value and
    /// `quantity * price + commission`.
    pub fn add(&mut self, quantity: f64, price: f64, commission: f64) {
        let total_cost = self.avg_cost * self.quantity + quantity * price + commission;
        let total_qty = self.quantity + quantity;
        self.avg_cost = total_cost / total_qty;
        self.quantity = total_qty;
    }

    /// Reduce the holding. Basis per unit is unchanged by a sell; a position
    /// reduced to flat resets its basis to zero.
    pub fn reduce(&mut self, quantity: f64) {
        self.quantity -= quantity;
        if self.quantity <= QTY_EPSILON {
            self.quantity = 0.0;
            self.avg_cost = 0.0;
        }
    }
}
