//! Bar-by-bar simulation loop — the heart of the engine.
//!
//! One deterministic, synchronous pass: per bar, the strategy is evaluated
//! with a fresh [`SimContext`], faults are captured, and a value snapshot is
//! recorded at that bar's close. All inputs are in memory before the loop
//! starts; there is no I/O inside it.

use crate::domain::{Bar, IdGen, Portfolio};
use crate::engine::context::SimContext;
use crate::engine::state::{EngineConfig, RunResult, StrategyFault};
use crate::strategy::{Strategy, StrategyParams};
use std::collections::HashMap;
use std::time::Instant;

/// Run one backtest over `bars` with a caller-supplied strategy.
///
/// The portfolio is constructed fresh for this call and never shared, so
/// concurrent runs (parameter sweeps) are safe by construction. Bars outside
/// the config's inclusive `[start, end]` window are skipped. An empty bar
/// slice yields a result with zero trades and `final_value == initial
/// capital`, never an error.
pub fn run_backtest(
    strategy: &mut dyn Strategy,
    bars: &[Bar],
    params: &StrategyParams,
    config: &EngineConfig,
) -> RunResult {
    let started = Instant::now();

    let mut portfolio = Portfolio::new(config.initial_capital);
    let mut ids = IdGen::new();
    let mut faults: Vec<StrategyFault> = Vec::new();
    // Latest close per symbol, for marking multi-asset books through gaps.
    let mut last_closes: HashMap<String, f64> = HashMap::new();

    let in_window = |bar: &Bar| {
        config.start.map_or(true, |s| bar.timestamp >= s)
            && config.end.map_or(true, |e| bar.timestamp <= e)
    };

    for bar in bars.iter().filter(|b| in_window(b)) {
        last_closes.insert(bar.symbol.clone(), bar.close);

        {
            let mut ctx = SimContext::new(
                &mut portfolio,
                &mut ids,
                &last_closes,
                config.commission_rate,
                bar,
            );
            if let Err(err) = strategy.evaluate(&mut ctx, bar, params) {
                faults.push(StrategyFault {
                    timestamp: bar.timestamp,
                    message: err.to_string(),
                });
            }
        }

        portfolio.record_snapshot(bar.timestamp, &last_closes);
    }

    RunResult {
        portfolio,
        faults,
        elapsed: started.elapsed(),
        periods_per_year: config.periods_per_year,
    }
}
