//! Run fingerprinting — deterministic identity for replayable runs.
//!
//! Two runs with the same strategy, bars, parameters, and engine config get
//! the same `RunId`; any difference in inputs changes it. Wall-clock time is
//! deliberately excluded so a replay hashes identically.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use tapelab_core::domain::Bar;
use tapelab_core::engine::EngineConfig;
use tapelab_core::strategy::StrategyParams;

/// Content hash of the bar sequence a run consumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    /// BLAKE3 over the canonical serialization of each bar, in order.
    pub fn from_bars(bars: &[Bar]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for bar in bars {
            let canonical = serde_json::to_vec(bar).expect("Bar must serialize");
            hasher.update(&canonical);
            hasher.update(b"\n");
        }
        Self(hasher.finalize().to_hex().to_string())
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic run identifier: hash of strategy + dataset + params + config.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Complete identity record of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub strategy: String,
    pub dataset_hash: DatasetHash,
    pub params: StrategyParams,
    pub initial_capital: f64,
    pub commission_rate: f64,
    pub periods_per_year: f64,
    pub run_id: RunId,
}

impl RunFingerprint {
    pub fn new(
        strategy: &str,
        bars: &[Bar],
        params: &StrategyParams,
        config: &EngineConfig,
    ) -> Self {
        let dataset_hash = DatasetHash::from_bars(bars);

        // Canonical JSON: StrategyParams is a BTreeMap, so key order is
        // stable and the hash is reproducible across runs and platforms.
        let canonical = json!({
            "strategy": strategy,
            "dataset_hash": &dataset_hash.0,
            "params": params,
            "initial_capital": config.initial_capital,
            "commission_rate": config.commission_rate,
            "periods_per_year": config.periods_per_year,
            "start": config.start,
            "end": config.end,
        });
        let run_id = RunId(
            blake3::hash(canonical.to_string().as_bytes())
                .to_hex()
                .to_string(),
        );

        Self {
            strategy: strategy.to_string(),
            dataset_hash,
            params: params.clone(),
            initial_capital: config.initial_capital,
            commission_rate: config.commission_rate,
            periods_per_year: config.periods_per_year,
            run_id,
        }
    }
}
