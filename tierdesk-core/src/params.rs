//! Heuristic parameter set — the trader-edited inputs every ladder is built
//! from, in both typed form and the two-column `Params`/`Value` string table
//! the integrator's UI and the on-disk records speak.
//!
//! Blank values in the table mean "not yet computed", never zero. All
//! conversions are total functions with explicit errors; nothing is silently
//! defaulted except the two genuinely optional knobs (`Scalp` and
//! `Tier Growth %`, which read as zero when blank).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::ProductConfig;

/// Fixed parameter row names, in table order.
pub mod field {
    pub const MAX_POSITION: &str = "Max Position";
    pub const STANDARD_DEVIATION: &str = "Standard Deviation";
    pub const STD_MULT: &str = "Standard Deviation Mult";
    pub const TICK_SIZE: &str = "Tick Size";
    pub const TICK_VALUE: &str = "Tick Value";
    pub const START_PRICE: &str = "Start Price";
    pub const SCALP: &str = "Scalp";
    pub const TIER_LENGTH: &str = "Tier Length";
    pub const TIER_QUANTITY: &str = "Tier Quantity";
    pub const TIER_GROWTH_PCT: &str = "Tier Growth %";
    pub const RISK: &str = "Risk";
    pub const LAST_UPDATED: &str = "Last Updated";

    pub const ORDER: [&str; 12] = [
        MAX_POSITION,
        STANDARD_DEVIATION,
        STD_MULT,
        TICK_SIZE,
        TICK_VALUE,
        START_PRICE,
        SCALP,
        TIER_LENGTH,
        TIER_QUANTITY,
        TIER_GROWTH_PCT,
        RISK,
        LAST_UPDATED,
    ];
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("parameter {0:?} is blank")]
    MissingField(String),

    #[error("parameter {field:?} is not numeric: {value:?}")]
    NotNumeric { field: String, value: String },
}

/// Typed heuristic parameter set.
///
/// `standard_deviation`, `max_position` and `risk` are derived fields:
/// `None` means the upstream input has not arrived or the derivation has not
/// run yet. Everything else is trader-edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicParams {
    pub standard_deviation: Option<f64>,
    pub std_mult: f64,
    pub tick_size: f64,
    pub tick_value: f64,
    pub start_price: f64,
    pub scalp: f64,
    pub tier_length: f64,
    pub tier_quantity: i64,
    pub tier_growth_pct: f64,
    pub max_position: Option<i64>,
    pub risk: Option<f64>,
    pub last_updated: Option<String>,
}

impl HeuristicParams {
    /// Check the ladder-input invariants.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let positive: [(&str, f64); 4] = [
            (field::TICK_SIZE, self.tick_size),
            (field::TICK_VALUE, self.tick_value),
            (field::TIER_LENGTH, self.tier_length),
            (field::TIER_QUANTITY, self.tier_quantity as f64),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(ParamsError::InvalidParameters(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.std_mult < 0.0 {
            return Err(ParamsError::InvalidParameters(format!(
                "{} must be non-negative, got {}",
                field::STD_MULT,
                self.std_mult
            )));
        }
        if self.tier_growth_pct <= -100.0 {
            return Err(ParamsError::InvalidParameters(format!(
                "{} must keep tier quantities positive, got {}",
                field::TIER_GROWTH_PCT,
                self.tier_growth_pct
            )));
        }
        Ok(())
    }

    /// Set `Last Updated` from a caller-supplied clock reading.
    pub fn stamp(&mut self, now: NaiveDateTime) {
        self.last_updated = Some(now.format("%b %d %Y %X").to_string());
    }
}

/// One `Params`/`Value` row. Serialized field names match the table headers,
/// so the JSON records on disk read the same as the UI columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamRow {
    #[serde(rename = "Params")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Ordered `Params`/`Value` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamTable {
    rows: Vec<ParamRow>,
}

impl ParamTable {
    /// A table with every parameter row present and blank.
    pub fn blank() -> Self {
        Self {
            rows: field::ORDER
                .iter()
                .map(|name| ParamRow { name: name.to_string(), value: String::new() })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[ParamRow] {
        &self.rows
    }

    /// Value of a named row; `None` when the row is absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.rows.iter().find(|r| r.name == name).map(|r| r.value.as_str())
    }

    /// Set a named row, appending it if the record predates the field.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.rows.iter_mut().find(|r| r.name == name) {
            Some(row) => row.value = value,
            None => self.rows.push(ParamRow { name: name.to_string(), value }),
        }
    }

    fn required_f64(&self, name: &str) -> Result<f64, ParamsError> {
        match self.get(name) {
            None | Some("") => Err(ParamsError::MissingField(name.to_string())),
            Some(value) => parse_numeric(name, value),
        }
    }

    fn optional_f64(&self, name: &str) -> Result<Option<f64>, ParamsError> {
        match self.get(name) {
            None | Some("") => Ok(None),
            Some(value) => parse_numeric(name, value).map(Some),
        }
    }

    fn default_f64(&self, name: &str, default: f64) -> Result<f64, ParamsError> {
        Ok(self.optional_f64(name)?.unwrap_or(default))
    }

    /// Parse the table into typed, validated parameters.
    pub fn to_params(&self) -> Result<HeuristicParams, ParamsError> {
        let tier_quantity = self.required_f64(field::TIER_QUANTITY)?;
        if tier_quantity.fract() != 0.0 {
            return Err(ParamsError::NotNumeric {
                field: field::TIER_QUANTITY.to_string(),
                value: self.get(field::TIER_QUANTITY).unwrap_or_default().to_string(),
            });
        }

        let params = HeuristicParams {
            standard_deviation: self.optional_f64(field::STANDARD_DEVIATION)?,
            std_mult: self.required_f64(field::STD_MULT)?,
            tick_size: self.required_f64(field::TICK_SIZE)?,
            tick_value: self.required_f64(field::TICK_VALUE)?,
            start_price: self.required_f64(field::START_PRICE)?,
            scalp: self.default_f64(field::SCALP, 0.0)?,
            tier_length: self.required_f64(field::TIER_LENGTH)?,
            tier_quantity: tier_quantity as i64,
            tier_growth_pct: self.default_f64(field::TIER_GROWTH_PCT, 0.0)?,
            max_position: self.optional_f64(field::MAX_POSITION)?.map(|v| v as i64),
            risk: self.optional_f64(field::RISK)?,
            last_updated: self
                .get(field::LAST_UPDATED)
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string()),
        };
        params.validate()?;
        Ok(params)
    }

    /// Render typed parameters back into the table, price-like fields at the
    /// product's precision.
    pub fn from_params(params: &HeuristicParams, product: &ProductConfig) -> Self {
        let mut table = Self::blank();
        if let Some(max) = params.max_position {
            table.set(field::MAX_POSITION, max.to_string());
        }
        if let Some(std) = params.standard_deviation {
            table.set(field::STANDARD_DEVIATION, product.format_price(std));
        }
        table.set(field::STD_MULT, fmt_plain(params.std_mult));
        table.set(field::TICK_SIZE, fmt_plain(params.tick_size));
        table.set(field::TICK_VALUE, fmt_plain(params.tick_value));
        table.set(field::START_PRICE, product.format_price(params.start_price));
        table.set(field::SCALP, fmt_plain(params.scalp));
        table.set(field::TIER_LENGTH, fmt_plain(params.tier_length));
        table.set(field::TIER_QUANTITY, params.tier_quantity.to_string());
        table.set(field::TIER_GROWTH_PCT, fmt_plain(params.tier_growth_pct));
        if let Some(risk) = params.risk {
            table.set(field::RISK, format!("{risk:.2}"));
        }
        if let Some(updated) = &params.last_updated {
            table.set(field::LAST_UPDATED, updated.clone());
        }
        table
    }
}

fn fmt_plain(value: f64) -> String {
    format!("{value}")
}

/// Parse a table cell as a number, tolerating thousands separators.
pub fn parse_numeric(field: &str, value: &str) -> Result<f64, ParamsError> {
    let cleaned = value.replace(',', "");
    cleaned.trim().parse::<f64>().map_err(|_| ParamsError::NotNumeric {
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductCatalog;

    fn brent() -> ProductConfig {
        ProductCatalog::builtin().get("Brent").unwrap().clone()
    }

    fn full_params() -> HeuristicParams {
        HeuristicParams {
            standard_deviation: Some(100.0),
            std_mult: 1.5,
            tick_size: 0.01,
            tick_value: 100.0,
            start_price: 1.5,
            scalp: 0.02,
            tier_length: 0.05,
            tier_quantity: 5,
            tier_growth_pct: 10.0,
            max_position: Some(150),
            risk: Some(150.0),
            last_updated: None,
        }
    }

    #[test]
    fn test_table_round_trips_typed_params() {
        let params = full_params();
        let table = ParamTable::from_params(&params, &brent());
        let parsed = table.to_params().unwrap();
        assert_eq!(parsed, params);
    }

    #[test]
    fn test_blank_derived_fields_stay_blank() {
        let mut params = full_params();
        params.standard_deviation = None;
        params.max_position = None;
        params.risk = None;

        let table = ParamTable::from_params(&params, &brent());
        assert_eq!(table.get(field::MAX_POSITION), Some(""));
        assert_eq!(table.get(field::STANDARD_DEVIATION), Some(""));
        assert_eq!(table.get(field::RISK), Some(""));

        let parsed = table.to_params().unwrap();
        assert_eq!(parsed.max_position, None);
        assert_eq!(parsed.risk, None);
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        let mut table = ParamTable::from_params(&full_params(), &brent());
        table.set(field::TICK_SIZE, "");
        assert_eq!(
            table.to_params(),
            Err(ParamsError::MissingField(field::TICK_SIZE.to_string()))
        );
    }

    #[test]
    fn test_non_numeric_cell_is_an_error() {
        let mut table = ParamTable::from_params(&full_params(), &brent());
        table.set(field::TIER_LENGTH, "five ticks");
        assert!(matches!(
            table.to_params(),
            Err(ParamsError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_thousands_separators_parse() {
        let mut table = ParamTable::from_params(&full_params(), &brent());
        table.set(field::STANDARD_DEVIATION, "1,250.50");
        let params = table.to_params().unwrap();
        assert_eq!(params.standard_deviation, Some(1250.5));
    }

    #[test]
    fn test_validate_rejects_non_positive_ladder_inputs() {
        let mut params = full_params();
        params.tier_length = 0.0;
        assert!(matches!(
            params.validate(),
            Err(ParamsError::InvalidParameters(_))
        ));

        let mut params = full_params();
        params.tier_quantity = -5;
        assert!(params.validate().is_err());

        let mut params = full_params();
        params.std_mult = -0.1;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_stamp_formats_like_the_saved_records() {
        let mut params = full_params();
        let now = chrono::NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap();
        params.stamp(now);
        assert_eq!(params.last_updated.as_deref(), Some("Mar 09 2026 14:30:05"));
    }

    #[test]
    fn test_json_rows_match_the_legacy_record_shape() {
        let table = ParamTable::from_params(&full_params(), &brent());
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains(r#""Params":"Max Position""#));
        assert!(json.contains(r#""Value":"150""#));
    }
}
