//! SimContext — the order-execution gatekeeper handed to strategies.
//!
//! Turns strategy intent into a validated trade or a rejection. Orders fill
//! in full at the computed price or not at all; there is no partial-fill
//! modeling. An omitted price means the current bar's close, a zero-slippage
//! market order.

use crate::domain::{Bar, IdGen, OrderId, Portfolio, Position, TradeRecord, TradeSide, QTY_EPSILON};
use std::collections::HashMap;
use thiserror::Error;

/// Why an order did not execute. Rejections leave the portfolio untouched
/// and are returned to the strategy, never propagated through the loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderRejection {
    #[error("invalid order: quantity must be positive and finite, got {0}")]
    InvalidQuantity(f64),

    #[error("invalid order: price must be positive and finite, got {0}")]
    InvalidPrice(f64),

    #[error("insufficient funds: order costs {required:.2}, cash is {available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("insufficient position in '{symbol}': selling {requested}, holding {held}")]
    InsufficientPosition {
        symbol: String,
        requested: f64,
        held: f64,
    },
}

/// Per-bar view of the simulation handed to the strategy.
///
/// Reads go through the accessors; the only mutation path is
/// [`place_order`](SimContext::place_order). The context borrows run state
/// and is rebuilt each bar, so strategies must not hold it across bars.
pub struct SimContext<'a> {
    portfolio: &'a mut Portfolio,
    ids: &'a mut IdGen,
    last_closes: &'a HashMap<String, f64>,
    commission_rate: f64,
    current_bar: &'a Bar,
}

impl<'a> SimContext<'a> {
    /// Normally constructed by the loop runner once per bar; public so
    /// custom drivers and tests can script the gatekeeper directly.
    pub fn new(
        portfolio: &'a mut Portfolio,
        ids: &'a mut IdGen,
        last_closes: &'a HashMap<String, f64>,
        commission_rate: f64,
        current_bar: &'a Bar,
    ) -> Self {
        Self {
            portfolio,
            ids,
            last_closes,
            commission_rate,
            current_bar,
        }
    }

    pub fn bar(&self) -> &Bar {
        self.current_bar
    }

    pub fn cash(&self) -> f64 {
        self.portfolio.cash
    }

    /// Total portfolio value at the latest known closes.
    pub fn equity(&self) -> f64 {
        self.portfolio.mark_to_market(self.last_closes)
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.portfolio.position(symbol)
    }

    pub fn held_quantity(&self, symbol: &str) -> f64 {
        self.portfolio.held_quantity(symbol)
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.portfolio.trades
    }

    /// Validate and execute an order against the portfolio.
    ///
    /// `price` defaults to the current bar's close; `symbol` defaults to the
    /// current bar's symbol. Commission is `quantity * price * rate`. A buy
    /// must be fully covered by cash including commission; a sell must not
    /// exceed the held quantity. On acceptance the trade is assigned a
    /// sequential order id, appended to the trade log, and applied.
    pub fn place_order(
        &mut self,
        side: TradeSide,
        quantity: f64,
        price: Option<f64>,
        symbol: Option<&str>,
    ) -> Result<OrderId, OrderRejection> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(OrderRejection::InvalidQuantity(quantity));
        }
        let price = price.unwrap_or(self.current_bar.close);
        if !price.is_finite() || price <= 0.0 {
            return Err(OrderRejection::InvalidPrice(price));
        }
        let symbol = symbol.unwrap_or(&self.current_bar.symbol);
        let commission = quantity * price * self.commission_rate;

        match side {
            TradeSide::Buy => {
                let required = quantity * price + commission;
                if required > self.portfolio.cash + 1e-9 {
                    return Err(OrderRejection::InsufficientFunds {
                        required,
                        available: self.portfolio.cash,
                    });
                }
            }
            TradeSide::Sell => {
                let held = self.portfolio.held_quantity(symbol);
                // The epsilon only absorbs float residue on a real holding;
                // a flat book rejects every sell, however small.
                if held <= QTY_EPSILON || quantity > held + QTY_EPSILON {
                    return Err(OrderRejection::InsufficientPosition {
                        symbol: symbol.to_string(),
                        requested: quantity,
                        held,
                    });
                }
            }
        }

        let order_id = self.ids.next_order_id();
        self.portfolio.apply_trade(TradeRecord {
            order_id,
            timestamp: self.current_bar.timestamp,
            symbol: symbol.to_string(),
            side,
            quantity,
            price,
            commission,
        });
        // The buy gate's 1e-9 tolerance can leave sub-tolerance negative
        // cash from float residue; snap it back to zero.
        if self.portfolio.cash < 0.0 {
            self.portfolio.cash = 0.0;
        }
        Ok(order_id)
    }
}
