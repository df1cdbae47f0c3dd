//! TierDesk Store — file-per-contract persistence for heuristic records.
//!
//! One record per `(product, relationship)` pair, living in an active
//! location while the contract trades and a read-only archived location once
//! it expires. The engine in `tierdesk-core` never persists anything itself;
//! this crate is the integrator-facing half of that contract, and any other
//! backing store can stand in by implementing [`HeuristicStore`].

mod json_store;
mod seed;

pub use json_store::JsonFileStore;
pub use seed::{seed_table, ReferenceTickData};

use serde::{Deserialize, Serialize};

use tierdesk_core::params::ParamTable;

/// Lifecycle state of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Active,
    /// Expired contract. Loadable for postmortems, never written.
    Archived,
}

/// Identity of one heuristic record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractKey {
    pub product: String,
    pub relationship: String,
}

impl ContractKey {
    pub fn new(product: impl Into<String>, relationship: impl Into<String>) -> Self {
        Self { product: product.into(), relationship: relationship.into() }
    }

    /// Filename stem: the relationship with spaces flattened.
    pub fn file_stem(&self) -> String {
        self.relationship.replace(' ', "_")
    }
}

/// A loaded record plus where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredHeuristic {
    pub table: ParamTable,
    pub status: Status,
}

/// Read/write contract for heuristic records and their trader notes.
///
/// `load` returning `Ok(None)` means first use, not an error; both locations
/// may legitimately be absent. Implementations must never write to the
/// archived location.
pub trait HeuristicStore {
    fn load(&self, key: &ContractKey) -> anyhow::Result<Option<StoredHeuristic>>;
    fn save(&self, key: &ContractKey, table: &ParamTable) -> anyhow::Result<()>;
    fn load_notes(&self, key: &ContractKey) -> anyhow::Result<Option<String>>;
    fn save_notes(&self, key: &ContractKey, notes: &str) -> anyhow::Result<()>;
}
