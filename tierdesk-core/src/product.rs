//! Product catalog — per-product rounding precision, tradable relationships,
//! and CME lookup ids.
//!
//! The catalog is an immutable value injected into the engine at construction.
//! A built-in table covers the products the desk trades; deployments can
//! replace or extend individual entries from a TOML override without touching
//! the rest of the table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-product configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Decimal digits prices are rounded to before entering a ladder.
    pub precision: u32,
    /// Relationships traded on this product (flies, 2x, spreads, cracks).
    pub relationships: Vec<String>,
    /// CME product id for open-interest downloads, where one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cme_id: Option<u32>,
}

impl ProductConfig {
    /// Round a price half-up to this product's precision.
    pub fn round_price(&self, price: f64) -> f64 {
        let scale = 10f64.powi(self.precision as i32);
        (price * scale).round() / scale
    }

    /// Integer tick key at this product's precision.
    ///
    /// Ladder prices are compared through this key, never as raw floats.
    pub fn price_key(&self, price: f64) -> i64 {
        let scale = 10f64.powi(self.precision as i32);
        (price * scale).round() as i64
    }

    /// Render a price with this product's precision.
    pub fn format_price(&self, price: f64) -> String {
        format!("{:.*}", self.precision as usize, price)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown product {0:?}")]
    UnknownProduct(String),

    #[error("malformed catalog override: {0}")]
    MalformedOverride(#[from] toml::de::Error),
}

/// Immutable product name → configuration map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    products: BTreeMap<String, ProductConfig>,
}

impl ProductCatalog {
    pub fn new(products: BTreeMap<String, ProductConfig>) -> Self {
        Self { products }
    }

    /// The desk's standard product table.
    pub fn builtin() -> Self {
        fn entry(precision: u32, rels: &[&str], cme_id: Option<u32>) -> ProductConfig {
            ProductConfig {
                precision,
                relationships: rels.iter().map(|r| r.to_string()).collect(),
                cme_id,
            }
        }

        let mut products = BTreeMap::new();
        products.insert(
            "Brent".into(),
            entry(2, &["1m Fly", "1m 2x", "1m DC", "2m Fly", "2m 2x", "3m Fly", "3m 2x"], None),
        );
        products.insert(
            "Brent 6m".into(),
            entry(2, &["6m Fly", "6m 2x", "12m Fly", "12m 2x"], None),
        );
        products.insert(
            "Brent Crack".into(),
            entry(2, &["1m Crack", "2m Crack", "3m Crack", "6m Crack", "12m Crack"], None),
        );
        products.insert(
            "Cocoa".into(),
            entry(0, &["consecutive Fly", "consecutive 2x"], None),
        );
        products.insert(
            "Cocoa Liffe".into(),
            entry(0, &["consecutive Fly", "consecutive 2x"], None),
        );
        products.insert(
            "Cocoa-Liffe Spread".into(),
            entry(0, &["consecutive Sp"], None),
        );
        products.insert(
            "Feeder Cattle".into(),
            entry(3, &["consecutive Fly", "consecutive 2x"], Some(34)),
        );
        products.insert(
            "Lean Hogs".into(),
            entry(3, &["consecutive Fly", "consecutive 2x"], Some(19)),
        );
        products.insert("Live Cattle".into(), entry(3, &["2m Fly", "2m 2x"], Some(22)));
        products.insert(
            "Gasoil".into(),
            entry(
                2,
                &["1m 2x", "2m 2x", "3m Fly", "3m 2x", "6m Fly", "6m 2x", "12m Fly", "12m 2x"],
                None,
            ),
        );
        products.insert(
            "Heating Oil".into(),
            entry(0, &["1m Fly", "1m 2x", "2m Fly", "2m 2x", "3m Fly", "3m 2x"], Some(426)),
        );
        products.insert(
            "HO-Gasoil Spread".into(),
            entry(2, &["1m Sp", "2m Sp", "3m Sp", "6m Sp", "12m Sp"], None),
        );
        products.insert(
            "Natural Gas".into(),
            entry(3, &["1m Fly", "1m 2x", "2m Fly", "2m 2x", "12m 2x"], Some(444)),
        );
        products.insert(
            "Gasoline (RBOB)".into(),
            entry(0, &["1m Fly", "1m 2x", "2m Fly", "2m 2x", "3m Fly", "3m 2x"], Some(429)),
        );
        products.insert(
            "Soybean Oil".into(),
            entry(2, &["consecutive Fly", "consecutive 2x"], Some(312)),
        );
        products.insert(
            "Sugar No.11".into(),
            entry(2, &["consecutive Fly", "consecutive 2x"], None),
        );
        products.insert(
            "Wheat".into(),
            entry(2, &["consecutive Fly", "consecutive 2x"], Some(323)),
        );
        products.insert(
            "KC Wheat".into(),
            entry(2, &["consecutive Fly", "consecutive 2x"], Some(348)),
        );
        Self::new(products)
    }

    /// Parse a standalone catalog from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        Ok(toml::from_str(s)?)
    }

    /// Apply a TOML override: products it names replace the existing entry,
    /// everything else is untouched.
    pub fn with_overrides(mut self, s: &str) -> Result<Self, CatalogError> {
        let overrides: ProductCatalog = toml::from_str(s)?;
        self.products.extend(overrides.products);
        Ok(self)
    }

    pub fn get(&self, product: &str) -> Result<&ProductConfig, CatalogError> {
        self.products
            .get(product)
            .ok_or_else(|| CatalogError::UnknownProduct(product.to_string()))
    }

    pub fn contains(&self, product: &str) -> bool {
        self.products.contains_key(product)
    }

    pub fn products(&self) -> impl Iterator<Item = (&str, &ProductConfig)> {
        self.products.iter().map(|(name, cfg)| (name.as_str(), cfg))
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
