//! TradeRecord — immutable record of one executed order.

use super::ids::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Side of an executed trade. Closed set, matched exhaustively at the
/// execution boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn is_buy(&self) -> bool {
        matches!(self, TradeSide::Buy)
    }
}

/// One executed order, appended to the portfolio's trade log and never
/// mutated afterward.
///
/// `quantity` and `price` are strictly positive, `commission` non-negative;
/// the gatekeeper enforces this before the record is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub order_id: OrderId,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: f64,
    pub price: f64,
    pub commission: f64,
}

impl TradeRecord {
    /// Traded notional before commission.
    pub fn gross_amount(&self) -> f64 {
        self.quantity * self.price
    }

    /// Signed cash delta: a buy drains `gross + commission`, a sell adds
    /// `gross - commission`.
    pub fn cash_delta(&self) -> f64 {
        match self.side {
            TradeSide::Buy => -(self.gross_amount() + self.commission),
            TradeSide::Sell => self.gross_amount() - self.commission,
        }
    }
}
