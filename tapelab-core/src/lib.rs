//! TapeLab Core — the simulation engine: domain types, order gatekeeper,
//! and the bar-by-bar loop.
//!
//! This crate contains the stateful heart of the backtester:
//! - Domain types (bars, trades, positions, portfolio, value snapshots)
//! - Order execution gatekeeper with full-or-nothing fills
//! - Strategy trait with explicit named parameters
//! - Single-pass, deterministic bar loop with per-bar fault capture
//!
//! Analysis of a finished run (realized P&L, performance metrics, reports,
//! parameter sweeps) lives in `tapelab-runner`.

pub mod domain;
pub mod engine;
pub mod strategy;

pub use domain::{Bar, OrderId, Portfolio, Position, TradeRecord, TradeSide, ValueSnapshot};
pub use engine::{
    run_backtest, EngineConfig, OrderRejection, RunResult, SimContext, StrategyFault,
};
pub use strategy::{ParamValue, Strategy, StrategyError, StrategyParams};
