//! First-use seeding — a fresh parameter table built from the product's
//! reference tick data, with `Max Position` pre-sized when the upstream
//! volatility estimate is available and left blank when it is not.

use tierdesk_core::params::{field, HeuristicParams, ParamTable};
use tierdesk_core::product::ProductConfig;
use tierdesk_core::risk;

/// Reference tick data for a product, as carried by the ticker database.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceTickData {
    pub std_mult: f64,
    pub tick_size: f64,
    pub tick_value: f64,
}

/// Build the table a contract starts from. Tier fields stay blank for the
/// trader to fill; `Max Position` is sized from the standard deviation when
/// one is available.
pub fn seed_table(
    tick: &ReferenceTickData,
    standard_deviation: Option<f64>,
    product: &ProductConfig,
) -> ParamTable {
    let mut table = ParamTable::blank();
    table.set(field::STD_MULT, format!("{}", tick.std_mult));
    table.set(field::TICK_SIZE, format!("{}", tick.tick_size));
    table.set(field::TICK_VALUE, format!("{}", tick.tick_value));

    if let Some(std) = standard_deviation {
        table.set(field::STANDARD_DEVIATION, product.format_price(std));

        let sizing_inputs = HeuristicParams {
            standard_deviation: Some(std),
            std_mult: tick.std_mult,
            tick_size: tick.tick_size,
            tick_value: tick.tick_value,
            start_price: 0.0,
            scalp: 0.0,
            tier_length: 0.0,
            tier_quantity: 0,
            tier_growth_pct: 0.0,
            max_position: None,
            risk: None,
            last_updated: None,
        };
        if let Ok(max) = risk::max_position(&sizing_inputs) {
            table.set(field::MAX_POSITION, max.to_string());
        }
    }

    table
}
