//! TierDesk Core — tier-ladder engine for scaling into and out of
//! commodity-futures positions.
//!
//! This crate contains the whole of the engine:
//! - Heuristic parameter set (typed + the `Params`/`Value` table surface)
//! - Product catalog (rounding precision, relationships, CME ids)
//! - Tier generator (Adding ladders and their Unwinding mirrors)
//! - Chart index and lookup engine (price/position queries, boundary diffs)
//! - Position/risk calculator (volatility-sized maximum, dollar exposure)
//!
//! Every operation is a pure function over its explicit inputs: the caller
//! owns all state between invocations (snapshots, persisted records) and
//! serializes edits so each call sees one atomic change.

pub mod ladder;
pub mod lookup;
pub mod params;
pub mod product;
pub mod risk;

pub use ladder::{generate_tiers, Chart, Role, Side, TierRow};
pub use lookup::{diff_snapshots, lookup, ChangeEvent, ChartIndex, LookupResult, LookupTable};
pub use params::{HeuristicParams, ParamTable, ParamsError};
pub use product::{ProductCatalog, ProductConfig};
pub use risk::{max_position, risk, RiskError};
