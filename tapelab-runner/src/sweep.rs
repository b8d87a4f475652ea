//! Parameter sweep utilities for grid search.
//!
//! Each grid point gets a freshly constructed strategy and engine, so runs
//! share no mutable state and rayon can fan them out across threads.

use rayon::prelude::*;
use thiserror::Error;

use crate::runner::{run_backtest, BacktestResult, RunError};
use tapelab_core::domain::Bar;
use tapelab_core::engine::EngineConfig;
use tapelab_core::strategy::{Strategy, StrategyParams};

/// A sweep fails as a whole if any grid point fails; the offending
/// parameters ride along for diagnosis.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("sweep run failed for params {params:?}")]
    Run {
        params: StrategyParams,
        #[source]
        source: RunError,
    },
}

/// Parameter grid: one axis per named parameter, swept as a cartesian
/// product.
#[derive(Debug, Clone, Default)]
pub struct ParamGrid {
    axes: Vec<(String, Vec<f64>)>,
}

impl ParamGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style axis. An empty-valued axis contributes nothing.
    pub fn axis(mut self, name: &str, values: Vec<f64>) -> Self {
        if !values.is_empty() {
            self.axes.push((name.to_string(), values));
        }
        self
    }

    /// Total number of grid points.
    pub fn size(&self) -> usize {
        self.axes.iter().map(|(_, v)| v.len()).product()
    }

    /// Generate every parameter combination in the grid. A grid with no
    /// axes yields a single empty parameter set.
    pub fn generate(&self) -> Vec<StrategyParams> {
        let mut combos = vec![StrategyParams::new()];
        for (name, values) in &self.axes {
            combos = combos
                .into_iter()
                .flat_map(|base| {
                    values
                        .iter()
                        .map(move |&v| base.clone().with(name, v))
                        .collect::<Vec<_>>()
                })
                .collect();
        }
        combos
    }
}

/// One evaluated grid point.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub params: StrategyParams,
    pub result: BacktestResult,
}

/// Evaluate the whole grid in parallel. `make_strategy` is called once per
/// grid point on the worker thread, so strategies need not be `Sync`
/// themselves.
pub fn run_sweep<S, F>(
    make_strategy: F,
    bars: &[Bar],
    grid: &ParamGrid,
    config: &EngineConfig,
) -> Result<Vec<SweepOutcome>, SweepError>
where
    S: Strategy,
    F: Fn() -> S + Sync,
{
    grid.generate()
        .into_par_iter()
        .map(|params| {
            let mut strategy = make_strategy();
            match run_backtest(&mut strategy, bars, &params, config) {
                Ok(result) => Ok(SweepOutcome { params, result }),
                Err(source) => Err(SweepError::Run { params, source }),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_generates_full_cartesian_product() {
        let grid = ParamGrid::new()
            .axis("fast", vec![10.0, 20.0])
            .axis("slow", vec![50.0, 100.0, 200.0]);
        assert_eq!(grid.size(), 6);

        let combos = grid.generate();
        assert_eq!(combos.len(), 6);
        assert!(combos
            .iter()
            .any(|p| p.get_float("fast") == Some(20.0) && p.get_float("slow") == Some(100.0)));
    }

    #[test]
    fn empty_grid_yields_one_empty_combo() {
        let grid = ParamGrid::new();
        assert_eq!(grid.size(), 1);
        let combos = grid.generate();
        assert_eq!(combos.len(), 1);
        assert!(combos[0].0.is_empty());
    }
}
