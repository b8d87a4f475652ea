//! Strategy trait — the pluggable decision unit the engine drives.
//!
//! A strategy is evaluated once per bar and may place zero or more orders
//! through the [`SimContext`](crate::engine::SimContext) handle. It must not
//! retain cross-bar references other than order ids; no other handle is
//! stable across bars.

use crate::domain::Bar;
use crate::engine::SimContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A typed strategy parameter value.
///
/// Untagged serde keeps the JSON plain (`true`, `20`, `0.05`, `"SPY"`),
/// which also keeps parameter hashes stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric view; `Int` coerces losslessly enough for window sizes and
    /// thresholds.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ParamValue::Flag(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ParamValue::Flag(_) => "flag",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "text",
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Flag(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Explicit, named strategy parameters.
///
/// `BTreeMap` gives deterministic key ordering, so serializing the same
/// parameters always hashes to the same run fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams(pub BTreeMap<String, ParamValue>);

impl StrategyParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_float)
    }

    pub fn float_or(&self, name: &str, default: f64) -> f64 {
        self.get_float(name).unwrap_or(default)
    }

    pub fn flag_or(&self, name: &str, default: bool) -> bool {
        self.get(name)
            .and_then(ParamValue::as_flag)
            .unwrap_or(default)
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_text)
    }

    /// Fetch a required numeric parameter, failing the bar's evaluation if
    /// absent or non-numeric.
    pub fn require_float(&self, name: &str) -> Result<f64, StrategyError> {
        let value = self
            .get(name)
            .ok_or_else(|| StrategyError::MissingParam(name.to_string()))?;
        value.as_float().ok_or_else(|| StrategyError::WrongType {
            name: name.to_string(),
            expected: "float",
            found: value.kind(),
        })
    }
}

/// Errors raised by a strategy during evaluation.
///
/// The simulation driver catches these at the loop boundary, records a
/// diagnostic tied to the offending bar, and continues with the next bar.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("missing required parameter '{0}'")]
    MissingParam(String),

    #[error("parameter '{name}' has the wrong type: expected {expected}, found {found}")]
    WrongType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Other(String),
}

/// The decision unit contract.
///
/// Implementations may keep their own cross-bar state (indicator windows,
/// cooldown counters) in `self`; engine state is read through `ctx` and
/// mutated only via `ctx.place_order`.
pub trait Strategy {
    /// Short stable name, used in run fingerprints and reports.
    fn name(&self) -> &str;

    /// Act on one bar. Order rejections are returned to the strategy by
    /// `place_order` and are not faults; returning `Err` here marks the bar
    /// as faulted without aborting the run.
    fn evaluate(
        &mut self,
        ctx: &mut SimContext<'_>,
        bar: &Bar,
        params: &StrategyParams,
    ) -> Result<(), StrategyError>;
}
