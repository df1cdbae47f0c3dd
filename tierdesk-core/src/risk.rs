//! Position/risk calculator — sizes the maximum position from the volatility
//! estimate and derives the dollar exposure of a candidate position.
//!
//! # Formula
//! ```text
//! risk_ceiling = standard_deviation * std_mult          (dollars)
//! dollars_per_contract = tick_size * tick_value
//! max_position = trunc(risk_ceiling / dollars_per_contract)
//! risk(q) = |q| * dollars_per_contract
//! ```
//! Truncation is toward zero: the computed position never implies more
//! exposure than the trader's stated ceiling. The two functions are
//! independent and pure; the caller picks which to recompute from the edit
//! it just received.

use thiserror::Error;

use crate::params::{field, HeuristicParams};

#[derive(Debug, Error, PartialEq)]
pub enum RiskError {
    /// Upstream volatility input absent. Leave the dependent field blank and
    /// retry on the next invocation; never default it.
    #[error("standard deviation unavailable; position not yet computable")]
    IncompleteHeuristic,

    #[error("tick economics must be positive: tick_size {tick_size}, tick_value {tick_value}")]
    InvalidTickEconomics { tick_size: f64, tick_value: f64 },
}

fn dollars_per_contract(params: &HeuristicParams) -> Result<f64, RiskError> {
    if params.tick_size <= 0.0 || params.tick_value <= 0.0 {
        return Err(RiskError::InvalidTickEconomics {
            tick_size: params.tick_size,
            tick_value: params.tick_value,
        });
    }
    Ok(params.tick_size * params.tick_value)
}

/// Maximum position implied by the volatility estimate and the trader's
/// multiplier, truncated toward zero.
pub fn max_position(params: &HeuristicParams) -> Result<i64, RiskError> {
    let std = params.standard_deviation.ok_or(RiskError::IncompleteHeuristic)?;
    let per_contract = dollars_per_contract(params)?;
    Ok(((std * params.std_mult) / per_contract).trunc() as i64)
}

/// Maximum position that keeps dollar exposure within an explicit risk
/// budget. Used when the trader edits `Risk` directly.
pub fn max_position_for_risk(params: &HeuristicParams, risk_dollars: f64) -> Result<i64, RiskError> {
    let per_contract = dollars_per_contract(params)?;
    Ok((risk_dollars / per_contract).trunc() as i64)
}

/// Dollar exposure of a candidate position.
pub fn risk(params: &HeuristicParams, candidate_position: i64) -> Result<f64, RiskError> {
    let per_contract = dollars_per_contract(params)?;
    Ok(candidate_position.unsigned_abs() as f64 * per_contract)
}

/// Recompute the derived fields after a trader edit.
///
/// An edit to `Risk` resizes `Max Position` to fit the new budget; any other
/// numeric edit re-derives `Risk` from the current maximum. Fields whose
/// inputs are unavailable are left blank, not defaulted.
pub fn refresh_after_edit(params: &mut HeuristicParams, edited: &str) -> Result<(), RiskError> {
    if edited == field::RISK {
        match params.risk {
            Some(budget) => params.max_position = Some(max_position_for_risk(params, budget)?),
            None => params.max_position = None,
        }
    } else {
        match params.max_position {
            Some(max) => params.risk = Some(risk(params, max)?),
            None => params.risk = None,
        }
    }
    Ok(())
}
