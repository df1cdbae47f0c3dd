//! Lookup engine — boundary policy over generated charts and the full
//! edit → diff → lookup → apply → snapshot cycle a caller runs.

use tierdesk_core::ladder::{generate_tiers, Role, Side};
use tierdesk_core::lookup::{
    diff_snapshots, lookup, ChangeEvent, ChartIndex, Column, LookupError, LookupTable,
};
use tierdesk_core::params::HeuristicParams;
use tierdesk_core::product::{ProductCatalog, ProductConfig};

fn brent() -> ProductConfig {
    ProductCatalog::builtin().get("Brent").unwrap().clone()
}

/// 100 lots per tier up to 300: tier positions 100, 200, 300.
fn params() -> HeuristicParams {
    HeuristicParams {
        standard_deviation: Some(300.0),
        std_mult: 1.0,
        tick_size: 0.01,
        tick_value: 100.0,
        start_price: 1.50,
        scalp: 0.0,
        tier_length: 0.05,
        tier_quantity: 100,
        tier_growth_pct: 0.0,
        max_position: Some(300),
        risk: None,
        last_updated: None,
    }
}

#[test]
fn buy_adding_lookup_between_tiers_returns_next_trigger() {
    let chart = generate_tiers(&params(), &brent(), Side::Buy, Role::Adding).unwrap();
    let index = ChartIndex::new(&chart, &brent());

    let result = index.lookup_position(150).unwrap();
    assert_eq!(result.position, 150);
    assert_eq!(result.diff, Some(50)); // the 200 row is 50 away
    assert_eq!(result.qty_per_level, 100);
}

#[test]
fn unwinding_lookup_between_tiers_reports_overshoot() {
    let chart = generate_tiers(&params(), &brent(), Side::Buy, Role::Unwinding).unwrap();
    let index = ChartIndex::new(&chart, &brent());

    // Sell-executed: the 200 trigger has already passed on the way to 100
    let result = index.lookup_position(150).unwrap();
    assert_eq!(result.position, 150);
    assert_eq!(result.diff, Some(-50));
}

#[test]
fn price_lookup_round_trips_every_ladder_level() {
    let chart = generate_tiers(&params(), &brent(), Side::Sell, Role::Adding).unwrap();
    let index = ChartIndex::new(&chart, &brent());

    for row in &chart.rows {
        let result = index.lookup_price(row.price).unwrap();
        assert_eq!(result.position, row.position);
        assert_eq!(result.diff, None);
    }
}

#[test]
fn full_edit_cycle_through_the_caller_table() {
    let product = brent();
    let adding = generate_tiers(&params(), &product, Side::Buy, Role::Adding).unwrap();
    let unwinding = generate_tiers(&params(), &product, Side::Buy, Role::Unwinding).unwrap();
    let adding_index = ChartIndex::new(&adding, &product);
    let unwinding_index = ChartIndex::new(&unwinding, &product);

    // Page load: position 150 is on, both lookups seeded explicitly
    let mut table = LookupTable::blank();
    lookup(&adding_index, ChangeEvent::Position(150))
        .unwrap()
        .apply(&mut table, &product);
    lookup(&unwinding_index, ChangeEvent::Position(150))
        .unwrap()
        .apply(&mut table, &product);

    assert_eq!(table.row("Adding Diff").unwrap().position, "50");
    assert_eq!(table.row("Unwinding Diff").unwrap().position, "-50");

    // Trader edits one price cell; the snapshot diff recovers the change
    let previous = table.clone();
    let ladder_price = adding.rows[2].price;
    table.set_cell("Adding Lookup", Column::Price, product.format_price(ladder_price));

    let change = diff_snapshots(&table, &previous).unwrap();
    let result = lookup(&adding_index, change).unwrap();
    assert_eq!(result.position, adding.rows[2].position);
    result.apply(&mut table, &product);
    assert_eq!(table.row("Adding Diff").unwrap().position, "");

    // Two simultaneous edits are refused, not guessed at
    let previous = table.clone();
    table.set_cell("Adding Lookup", Column::Position, "175");
    table.set_cell("Unwinding Lookup", Column::Position, "175");
    assert_eq!(diff_snapshots(&table, &previous), Err(LookupError::AmbiguousChange));
}

#[test]
fn off_ladder_price_is_not_interpolated() {
    let chart = generate_tiers(&params(), &brent(), Side::Buy, Role::Adding).unwrap();
    let index = ChartIndex::new(&chart, &brent());
    assert!(matches!(
        index.lookup_price(1.51),
        Err(LookupError::PriceNotFound { .. })
    ));
}
