//! Domain types: bars, trades, positions, portfolio, value snapshots.

pub mod bar;
pub mod ids;
pub mod portfolio;
pub mod position;
pub mod snapshot;
pub mod trade;

pub use bar::Bar;
pub use ids::{IdGen, OrderId};
pub use portfolio::Portfolio;
pub use position::{Position, QTY_EPSILON};
pub use snapshot::ValueSnapshot;
pub use trade::{TradeRecord, TradeSide};
