//! Realized P&L reconstruction — average-cost replay of the trade log.
//!
//! For each symbol, a running `(held_quantity, held_cost_total)` pair is
//! maintained over the trades in execution order. Buys fold their commission
//! into the cost total; each sell books `(price - avg_cost) * qty -
//! commission` and reduces the cost total proportionally. Average cost, not
//! FIFO lot matching.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tapelab_core::domain::{OrderId, TradeRecord, TradeSide, QTY_EPSILON};
use thiserror::Error;

/// Profit or loss booked by one closing (sell) trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizedPnl {
    pub order_id: OrderId,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub quantity: f64,
    pub pnl: f64,
}

/// A sell in the log that the replayed holdings cannot cover is a defect in
/// the log's producer, surfaced rather than silently ignored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PnlError {
    #[error("sell of {requested} '{symbol}' at {timestamp} exceeds replayed holding of {held}")]
    SellExceedsHolding {
        symbol: String,
        timestamp: DateTime<Utc>,
        requested: f64,
        held: f64,
    },
}

/// Replay a trade log into per-sell realized P&L, in execution order.
///
/// The log must be ordered as executed (the engine's trade log is). The
/// output has exactly one entry per sell trade.
pub fn reconstruct_realized_pnl(trades: &[TradeRecord]) -> Result<Vec<RealizedPnl>, PnlError> {
    // Per-symbol running (held_quantity, held_cost_total).
    let mut book: HashMap<&str, (f64, f64)> = HashMap::new();
    let mut realized = Vec::new();

    for trade in trades {
        let (held, cost) = book.entry(trade.symbol.as_str()).or_insert((0.0, 0.0));
        match trade.side {
            TradeSide::Buy => {
                *held += trade.quantity;
                *cost += trade.quantity * trade.price + trade.commission;
            }
            TradeSide::Sell => {
                // A flat book cannot cover any sell; guarding it here also
                // keeps the average-cost division away from zero holdings.
                if *held <= QTY_EPSILON || trade.quantity > *held + QTY_EPSILON {
                    return Err(PnlError::SellExceedsHolding {
                        symbol: trade.symbol.clone(),
                        timestamp: trade.timestamp,
                        requested: trade.quantity,
                        held: *held,
                    });
                }
                let avg_cost = *cost / *held;
                let pnl = (trade.price - avg_cost) * trade.quantity - trade.commission;
                realized.push(RealizedPnl {
                    order_id: trade.order_id,
                    timestamp: trade.timestamp,
                    symbol: trade.symbol.clone(),
                    quantity: trade.quantity,
                    pnl,
                });

                *held -= trade.quantity;
                if *held <= QTY_EPSILON {
                    *held = 0.0;
                    *cost = 0.0;
                } else {
                    *cost = avg_cost * *held;
                }
            }
        }
    }

    Ok(realized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn trade(id: u64, day: u32, side: TradeSide, qty: f64, price: f64, commission: f64) -> TradeRecord {
        TradeRecord {
            order_id: OrderId(id),
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 21, 0, 0).unwrap(),
            symbol: "SPY".into(),
            side,
            quantity: qty,
            price,
            commission,
        }
    }

    #[test]
    fn simple_round_trip_books_the_spread() {
        let trades = vec![
            trade(1, 2, TradeSide::Buy, 1.0, 100.0, 0.0),
            trade(2, 3, TradeSide::Sell, 1.0, 110.0, 0.0),
        ];
        let realized = reconstruct_realized_pnl(&trades).unwrap();
        assert_eq!(realized.len(), 1);
        assert!((realized[0].pnl - 10.0).abs() < 1e-12);
    }

    #[test]
    fn commission_folds_into_basis_on_buy_and_off_proceeds_on_sell() {
        // Buy 50 @ 100 with commission 5: basis (5000+5)/50 = 100.1.
        // Sell 50 @ 120 with commission 6: (120 - 100.1)*50 - 6 = 989.
        let trades = vec![
            trade(1, 2, TradeSide::Buy, 50.0, 100.0, 5.0),
            trade(2, 3, TradeSide::Sell, 50.0, 120.0, 6.0),
        ];
        let realized = reconstruct_realized_pnl(&trades).unwrap();
        assert_eq!(realized.len(), 1);
        assert!((realized[0].pnl - 989.0).abs() < 1e-9);
    }

    #[test]
    fn partial_sells_reduce_cost_proportionally() {
        // Buy 100 @ 100. Sell 40 @ 110: pnl 400, remaining cost 60*100.
        // Sell 60 @ 90: pnl -600.
        let trades = vec![
            trade(1, 2, TradeSide::Buy, 100.0, 100.0, 0.0),
            trade(2, 3, TradeSide::Sell, 40.0, 110.0, 0.0),
            trade(3, 4, TradeSide::Sell, 60.0, 90.0, 0.0),
        ];
        let realized = reconstruct_realized_pnl(&trades).unwrap();
        assert_eq!(realized.len(), 2);
        assert!((realized[0].pnl - 400.0).abs() < 1e-9);
        assert!((realized[1].pnl + 600.0).abs() < 1e-9);
    }

    #[test]
    fn averaging_across_buys() {
        // Buy 50 @ 100, buy 50 @ 110: basis 105. Sell 100 @ 120: pnl 1500.
        let trades = vec![
            trade(1, 2, TradeSide::Buy, 50.0, 100.0, 0.0),
            trade(2, 3, TradeSide::Buy, 50.0, 110.0, 0.0),
            trade(3, 4, TradeSide::Sell, 100.0, 120.0, 0.0),
        ];
        let realized = reconstruct_realized_pnl(&trades).unwrap();
        assert!((realized[0].pnl - 1_500.0).abs() < 1e-9);
    }

    #[test]
    fn sell_without_holding_is_an_error() {
        let trades = vec![trade(1, 2, TradeSide::Sell, 10.0, 100.0, 0.0)];
        let err = reconstruct_realized_pnl(&trades).unwrap_err();
        assert!(matches!(err, PnlError::SellExceedsHolding { held, .. } if held == 0.0));
    }

    #[test]
    fn micro_sell_on_flat_book_is_an_error_not_nan() {
        // A sub-epsilon sell against zero holdings must error out rather
        // than divide a zero cost basis by a zero quantity.
        let trades = vec![trade(1, 2, TradeSide::Sell, 5e-11, 100.0, 0.0)];
        let err = reconstruct_realized_pnl(&trades).unwrap_err();
        assert!(matches!(err, PnlError::SellExceedsHolding { held, .. } if held == 0.0));
    }

    #[test]
    fn symbols_are_tracked_independently() {
        let mut qqq = trade(2, 3, TradeSide::Buy, 10.0, 200.0, 0.0);
        qqq.symbol = "QQQ".into();
        let mut qqq_sell = trade(3, 4, TradeSide::Sell, 10.0, 210.0, 0.0);
        qqq_sell.symbol = "QQQ".into();

        let trades = vec![
            trade(1, 2, TradeSide::Buy, 10.0, 100.0, 0.0),
            qqq,
            qqq_sell,
            trade(4, 5, TradeSide::Sell, 10.0, 95.0, 0.0),
        ];
        let realized = reconstruct_realized_pnl(&trades).unwrap();
        assert_eq!(realized.len(), 2);
        assert_eq!(realized[0].symbol, "QQQ");
        assert!((realized[0].pnl - 100.0).abs() < 1e-9);
        assert_eq!(realized[1].symbol, "SPY");
        assert!((realized[1].pnl + 50.0).abs() < 1e-9);
    }
}
