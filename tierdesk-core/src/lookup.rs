//! Chart index and lookup engine — answers "what should I be doing next?"
//! for a price or a position against a generated ladder.
//!
//! Prices are keyed in integer ticks at the product's precision, so float
//! identity is never compared directly. Position lookups fall back to a
//! boundary tier when the query sits between levels:
//!
//! - Sell-executed charts (and positions past the last tier of a
//!   buy-executed chart) look *backward* to the nearest tier already passed
//!   and report the overshoot as a signed diff.
//! - Buy-executed charts between tiers look *forward* to the next trigger.
//!
//! The engine is stateless: the caller owns the lookup table, applies each
//! result to it, and snapshots it as the "previous" state for the next
//! diff-based invocation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ladder::{Chart, Role, Side, TierRow};
use crate::params::parse_numeric;
use crate::product::ProductConfig;

#[derive(Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("chart has no tiers")]
    EmptyChart,

    #[error("price {price} is not a ladder price")]
    PriceNotFound { price: f64 },

    #[error("no boundary tier for position {position}")]
    PositionOutOfRange { position: i64 },

    #[error("more than one cell changed between snapshots")]
    AmbiguousChange,

    #[error("no cell changed between snapshots")]
    NoChange,

    #[error("changed {column:?} cell is not numeric: {value:?}")]
    ChangeNotNumeric { column: Column, value: String },
}

/// The two editable lookup columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Price,
    Position,
}

/// Explicit change signal: which cell the caller edited, with its new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangeEvent {
    Price(f64),
    Position(i64),
}

/// A chart re-indexed for O(log n) lookup by price and by position.
#[derive(Debug, Clone)]
pub struct ChartIndex {
    exec_side: Side,
    role: Role,
    /// Rows sorted ascending by cumulative position.
    by_position: Vec<TierRow>,
    /// (tick key, row) pairs sorted ascending by key.
    by_price: Vec<(i64, TierRow)>,
    precision: u32,
}

impl ChartIndex {
    pub fn new(chart: &Chart, product: &ProductConfig) -> Self {
        let mut by_position = chart.rows.clone();
        by_position.sort_by_key(|r| r.position);

        let mut by_price: Vec<(i64, TierRow)> =
            chart.rows.iter().map(|r| (product.price_key(r.price), *r)).collect();
        by_price.sort_by_key(|(key, _)| *key);

        Self {
            exec_side: chart.exec_side(),
            role: chart.role,
            by_position,
            by_price,
            precision: product.precision,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    /// Exact-match a ladder price. No interpolation: a price off the ladder
    /// is `PriceNotFound`.
    pub fn lookup_price(&self, price: f64) -> Result<LookupResult, LookupError> {
        if self.is_empty() {
            return Err(LookupError::EmptyChart);
        }
        let scale = 10f64.powi(self.precision as i32);
        let key = (price * scale).round() as i64;
        match self.by_price.binary_search_by_key(&key, |(k, _)| *k) {
            Ok(idx) => Ok(self.result(self.by_price[idx].1, None)),
            Err(_) => Err(LookupError::PriceNotFound { price }),
        }
    }

    /// Match a cumulative position, falling back to the side-appropriate
    /// boundary tier with a signed diff when the query is off-ladder.
    pub fn lookup_position(&self, position: i64) -> Result<LookupResult, LookupError> {
        if self.is_empty() {
            return Err(LookupError::EmptyChart);
        }

        // idx = first row with position >= query
        let idx = self.by_position.partition_point(|r| r.position < position);
        if let Some(row) = self.by_position.get(idx) {
            if row.position == position {
                return Ok(self.result(*row, None));
            }
        }

        let min = self.by_position[0].position;
        let max = self.by_position[self.by_position.len() - 1].position;

        // Sell-executed charts look backward whenever the query has passed a
        // tier; buy-executed charts look backward only past the top of the
        // ladder, and forward otherwise.
        let backward = match self.exec_side {
            Side::Sell => position > min,
            Side::Buy => position > max,
        };

        let row = if backward {
            idx.checked_sub(1).and_then(|i| self.by_position.get(i))
        } else {
            self.by_position.get(idx)
        }
        .ok_or(LookupError::PositionOutOfRange { position })?;

        Ok(self.result_at(*row, position))
    }

    fn result(&self, row: TierRow, diff: Option<i64>) -> LookupResult {
        LookupResult {
            role: self.role,
            price: row.price,
            qty_per_level: row.qty_per_level,
            position: row.position,
            diff,
        }
    }

    fn result_at(&self, row: TierRow, queried: i64) -> LookupResult {
        LookupResult {
            role: self.role,
            price: row.price,
            qty_per_level: row.qty_per_level,
            // The row reports the *queried* position; the boundary tier's
            // distance from it rides in `diff`.
            position: queried,
            diff: Some(row.position - queried),
        }
    }
}

/// Resolve a change event against an indexed chart.
pub fn lookup(index: &ChartIndex, change: ChangeEvent) -> Result<LookupResult, LookupError> {
    match change {
        ChangeEvent::Price(price) => index.lookup_price(price),
        ChangeEvent::Position(position) => index.lookup_position(position),
    }
}

/// The answer to one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub role: Role,
    pub price: f64,
    pub qty_per_level: i64,
    pub position: i64,
    /// Signed distance to the boundary tier; `None` on an exact match.
    pub diff: Option<i64>,
}

impl LookupResult {
    pub fn lookup_label(&self) -> String {
        format!("{} Lookup", self.role.label())
    }

    pub fn diff_label(&self) -> String {
        format!("{} Diff", self.role.label())
    }

    /// Write this result into the caller's table, touching only this role's
    /// `Lookup` and `Diff` rows.
    pub fn apply(&self, table: &mut LookupTable, product: &ProductConfig) {
        table.set_cells(
            &self.lookup_label(),
            product.format_price(self.price),
            self.qty_per_level.to_string(),
            self.position.to_string(),
        );
        let diff_cell = self.diff.map(|d| d.to_string()).unwrap_or_default();
        table.set_position_cell(&self.diff_label(), diff_cell);
    }
}

/// One row of the caller-owned lookup table. Serialized field names match
/// the table headers of the legacy records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupRow {
    #[serde(rename = "Chart")]
    pub label: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Qty/Level")]
    pub qty: String,
    #[serde(rename = "Position")]
    pub position: String,
}

impl LookupRow {
    fn blank(label: &str) -> Self {
        Self {
            label: label.to_string(),
            price: String::new(),
            qty: String::new(),
            position: String::new(),
        }
    }
}

/// The four fixed lookup rows, owned by the caller and snapshotted between
/// invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupTable {
    rows: Vec<LookupRow>,
}

pub const LOOKUP_LABELS: [&str; 2] = ["Adding Lookup", "Unwinding Lookup"];

impl LookupTable {
    /// Blank table with the four fixed row labels.
    pub fn blank() -> Self {
        Self {
            rows: ["Adding Lookup", "Adding Diff", "Unwinding Lookup", "Unwinding Diff"]
                .iter()
                .map(|label| LookupRow::blank(label))
                .collect(),
        }
    }

    pub fn rows(&self) -> &[LookupRow] {
        &self.rows
    }

    pub fn row(&self, label: &str) -> Option<&LookupRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Set one editable cell, as a UI edit would.
    pub fn set_cell(&mut self, label: &str, column: Column, value: impl Into<String>) {
        let row = self.row_mut(label);
        match column {
            Column::Price => row.price = value.into(),
            Column::Position => row.position = value.into(),
        }
    }

    fn set_cells(&mut self, label: &str, price: String, qty: String, position: String) {
        let row = self.row_mut(label);
        row.price = price;
        row.qty = qty;
        row.position = position;
    }

    fn set_position_cell(&mut self, label: &str, value: String) {
        self.row_mut(label).position = value;
    }

    fn row_mut(&mut self, label: &str) -> &mut LookupRow {
        if let Some(idx) = self.rows.iter().position(|r| r.label == label) {
            return &mut self.rows[idx];
        }
        self.rows.push(LookupRow::blank(label));
        self.rows.last_mut().unwrap()
    }
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::blank()
    }
}

/// Recover the change event from two consecutive snapshots of the lookup
/// table, for callers without an explicit change signal.
///
/// Only the `Price` and `Position` cells of the two `Lookup` rows are
/// editable, so only those four cells are compared. Exactly one may differ;
/// on first use (blank previous cells) any newly filled cell counts as the
/// change.
pub fn diff_snapshots(
    current: &LookupTable,
    previous: &LookupTable,
) -> Result<ChangeEvent, LookupError> {
    let mut changed: Option<(Column, &str)> = None;

    for label in LOOKUP_LABELS {
        let curr = current.row(label);
        let prev = previous.row(label);
        for column in [Column::Price, Column::Position] {
            let curr_cell = cell(curr, column);
            let prev_cell = cell(prev, column);
            if curr_cell != prev_cell {
                if changed.is_some() {
                    return Err(LookupError::AmbiguousChange);
                }
                changed = Some((column, curr_cell));
            }
        }
    }

    let (column, value) = changed.ok_or(LookupError::NoChange)?;
    parse_change(column, value)
}

fn cell(row: Option<&LookupRow>, column: Column) -> &str {
    match (row, column) {
        (Some(r), Column::Price) => &r.price,
        (Some(r), Column::Position) => &r.position,
        (None, _) => "",
    }
}

fn parse_change(column: Column, value: &str) -> Result<ChangeEvent, LookupError> {
    let not_numeric = || LookupError::ChangeNotNumeric {
        column,
        value: value.to_string(),
    };
    let number = parse_numeric("", value).map_err(|_| not_numeric())?;
    match column {
        Column::Price => Ok(ChangeEvent::Price(number)),
        Column::Position => {
            if number.fract() != 0.0 {
                return Err(not_numeric());
            }
            Ok(ChangeEvent::Position(number as i64))
        }
    }
}
