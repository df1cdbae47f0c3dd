//! Ladder generation — worked desk scenario and the generator's contract
//! invariants, driven through the public string-table surface.

use tierdesk_core::ladder::{generate_tiers, Role, Side};
use tierdesk_core::params::{field, HeuristicParams, ParamTable, ParamsError};
use tierdesk_core::product::{ProductCatalog, ProductConfig};
use tierdesk_core::risk;

fn brent() -> ProductConfig {
    ProductCatalog::builtin().get("Brent").unwrap().clone()
}

/// The worked scenario: std 100, mult 1.5, tick economics worth $1 per
/// contract-tick, 5 lots per tier every 0.05.
fn desk_params() -> HeuristicParams {
    let mut params = HeuristicParams {
        standard_deviation: Some(100.0),
        std_mult: 1.5,
        tick_size: 0.01,
        tick_value: 100.0,
        start_price: 1.50,
        scalp: 0.0,
        tier_length: 0.05,
        tier_quantity: 5,
        tier_growth_pct: 0.0,
        max_position: None,
        risk: None,
        last_updated: None,
    };
    params.max_position = Some(risk::max_position(&params).unwrap());
    params
}

#[test]
fn end_to_end_buy_scenario() {
    let params = desk_params();
    assert_eq!(params.max_position, Some(150));

    let adding = generate_tiers(&params, &brent(), Side::Buy, Role::Adding).unwrap();

    // 150 / 5 per tier = 30 levels, first at the start price, walking down
    assert_eq!(adding.len(), 30);
    assert_eq!(adding.rows[0].price, 1.50);
    assert_eq!(adding.rows[0].position, 5);
    assert_eq!(adding.rows[29].price, 0.05);
    assert_eq!(adding.rows[29].position, 150);

    // The unwind walks the position back to flat on the other side
    let unwinding = generate_tiers(&params, &brent(), Side::Buy, Role::Unwinding).unwrap();
    assert_eq!(unwinding.len(), 30);
    assert_eq!(unwinding.rows[0].position, 145);
    assert_eq!(unwinding.rows[29].position, 0);
    assert!(unwinding.rows[0].price < unwinding.rows[29].price);

    // The ladder's full exposure stays inside the configured ceiling
    let exposure = risk::risk(&params, adding.rows[29].position).unwrap();
    assert!(exposure <= 100.0 * 1.5);
}

#[test]
fn string_table_drives_generation() {
    let table = ParamTable::from_params(&desk_params(), &brent());
    let params = table.to_params().unwrap();
    let chart = generate_tiers(&params, &brent(), Side::Buy, Role::Adding).unwrap();
    assert_eq!(chart.rows.last().unwrap().position, 150);
}

#[test]
fn blank_max_position_in_table_refuses_generation() {
    let mut table = ParamTable::from_params(&desk_params(), &brent());
    table.set(field::MAX_POSITION, "");
    let params = table.to_params().unwrap();
    assert!(matches!(
        generate_tiers(&params, &brent(), Side::Buy, Role::Adding),
        Err(ParamsError::InvalidParameters(_))
    ));
}

#[test]
fn both_sides_mirror_about_the_start() {
    let mut params = desk_params();
    params.scalp = 0.02;

    let buy = generate_tiers(&params, &brent(), Side::Buy, Role::Adding).unwrap();
    let sell = generate_tiers(&params, &brent(), Side::Sell, Role::Adding).unwrap();

    for (b, s) in buy.rows.iter().zip(&sell.rows) {
        // Prices reflect about the start price, positions about zero
        let b_offset = params.start_price - b.price;
        let s_offset = s.price - params.start_price;
        assert!((b_offset - s_offset).abs() < 1e-9);
        assert_eq!(b.position, -s.position);
    }
}

#[test]
fn tier_length_finer_than_product_precision_is_rejected() {
    let mut params = desk_params();
    params.tier_length = 0.001; // Brent rounds to 2dp
    assert!(matches!(
        generate_tiers(&params, &brent(), Side::Buy, Role::Adding),
        Err(ParamsError::InvalidParameters(_))
    ));
}

#[test]
fn generation_is_pure() {
    let params = desk_params();
    let a = generate_tiers(&params, &brent(), Side::Sell, Role::Unwinding).unwrap();
    let b = generate_tiers(&params, &brent(), Side::Sell, Role::Unwinding).unwrap();
    assert_eq!(a, b);
}
