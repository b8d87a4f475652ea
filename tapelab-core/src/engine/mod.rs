//! Simulation engine — order gatekeeper, run configuration, and the
//! bar-by-bar loop.

pub mod context;
pub mod loop_runner;
pub mod state;

pub use context::{OrderRejection, SimContext};
pub use loop_runner::run_backtest;
pub use state::{EngineConfig, RunResult, StrategyFault};
