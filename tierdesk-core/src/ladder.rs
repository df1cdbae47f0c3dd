//! Tier generator — turns a heuristic parameter set into the executable
//! price ladders for scaling into a position (Adding) and back out of it
//! (Unwinding).
//!
//! # Ladder law
//! ```text
//! anchor  = start_price ∓ scalp          (toward the adding direction)
//! price_n = anchor ∓ n · tier_length     (rounded to product precision)
//! qty_n   = round(tier_quantity · (1 + tier_growth_pct/100)^n), min 1
//! ```
//! Tiers accumulate until the cumulative position reaches `max_position`;
//! the final tier is clamped so the ladder never commits more than the
//! trader's stated maximum. The Unwinding ladder reflects the price walk
//! about `start_price` and runs the same quantity progression, with the
//! cumulative column walking from the maximum back to zero.

use serde::{Deserialize, Serialize};

use crate::params::{HeuristicParams, ParamsError};
use crate::product::ProductConfig;

/// Direction of the trade that *builds* the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Sign convention for cumulative positions: long-building is positive.
    pub fn sign(self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }

    fn price_direction(self) -> f64 {
        // Buy ladders add into weakness, sell ladders into strength.
        match self {
            Side::Buy => -1.0,
            Side::Sell => 1.0,
        }
    }
}

/// Whether a chart builds the position or takes it back to flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Adding,
    Unwinding,
}

impl Role {
    /// Row label prefix in the caller's lookup table.
    pub fn label(self) -> &'static str {
        match self {
            Role::Adding => "Adding",
            Role::Unwinding => "Unwinding",
        }
    }
}

/// One ladder level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierRow {
    /// Level price, rounded to the product's precision.
    pub price: f64,
    /// Contracts traded at this level.
    pub qty_per_level: i64,
    /// Signed cumulative position after this level executes.
    pub position: i64,
}

/// An ordered ladder, tagged with the side that builds the position and the
/// role this chart plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub side: Side,
    pub role: Role,
    pub rows: Vec<TierRow>,
}

impl Chart {
    /// The side that executes this chart's orders. Adding charts trade their
    /// own side; unwinding trades the opposite (a long is sold back).
    pub fn exec_side(&self) -> Side {
        match self.role {
            Role::Adding => self.side,
            Role::Unwinding => self.side.opposite(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Generate the tier ladder for one side/role combination.
///
/// Pure function: identical inputs always produce the identical chart.
/// Fails with `InvalidParameters` when any ladder input is non-positive or
/// `max_position` is blank ("not yet computable") or zero.
pub fn generate_tiers(
    params: &HeuristicParams,
    product: &ProductConfig,
    side: Side,
    role: Role,
) -> Result<Chart, ParamsError> {
    params.validate()?;

    // A spacing finer than the product's rounding unit would collapse
    // adjacent tiers onto the same rounded price.
    let rounding_unit = 10f64.powi(-(product.precision as i32));
    if params.tier_length + 1e-9 < rounding_unit {
        return Err(ParamsError::InvalidParameters(format!(
            "Tier Length {} is finer than the product's rounding unit {}",
            params.tier_length, rounding_unit
        )));
    }

    let max_position = match params.max_position {
        Some(max) if max > 0 => max,
        Some(max) => {
            return Err(ParamsError::InvalidParameters(format!(
                "Max Position must be positive, got {max}"
            )))
        }
        None => {
            return Err(ParamsError::InvalidParameters(
                "Max Position is not yet computable (standard deviation unavailable)".into(),
            ))
        }
    };

    let quantities = tier_quantities(params, max_position);
    let sign = side.sign();
    let dir = side.price_direction();

    // The adding anchor sits `scalp` away from the start toward the adding
    // direction; the unwinding anchor is its reflection, and the unwind walk
    // steps back the other way.
    let (anchor, step) = match role {
        Role::Adding => (params.start_price + dir * params.scalp, dir * params.tier_length),
        Role::Unwinding => (params.start_price - dir * params.scalp, -dir * params.tier_length),
    };

    let mut rows = Vec::with_capacity(quantities.len());
    let mut cumulative: i64 = 0;
    for (n, qty) in quantities.iter().copied().enumerate() {
        cumulative += qty;
        let position = match role {
            Role::Adding => sign * cumulative,
            Role::Unwinding => sign * (max_position - cumulative),
        };
        rows.push(TierRow {
            price: product.round_price(anchor + n as f64 * step),
            qty_per_level: qty,
            position,
        });
    }

    Ok(Chart { side, role, rows })
}

/// Quantity progression: compounding growth, floored at one contract, with
/// the final tier clamped so the total lands exactly on `max_position`.
fn tier_quantities(params: &HeuristicParams, max_position: i64) -> Vec<i64> {
    let growth = 1.0 + params.tier_growth_pct / 100.0;
    let mut quantities = Vec::new();
    let mut cumulative: i64 = 0;
    let mut n = 0u32;
    while cumulative < max_position {
        let raw = (params.tier_quantity as f64) * growth.powi(n as i32);
        let mut qty = (raw.round() as i64).max(1);
        if cumulative + qty > max_position {
            qty = max_position - cumulative;
        }
        cumulative += qty;
        quantities.push(qty);
        n += 1;
    }
    quantities
}
