//! # Supplier-Price Map
//!
//! Per-item mapping from supplier name to quoted unit price.
//!
//! ## Storage Encoding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SupplierPrices (in memory)          items.suppliers_prices (TEXT)      │
//! │  ───────────────────────────         ─────────────────────────────      │
//! │  "Fornecedor A" → 5.5         ──►    {"Fornecedor A":5.5,               │
//! │  "Fornecedor B" → 6.0                 "Fornecedor B":6.0}               │
//! │                                                                         │
//! │  Keys are supplier NAMES, not supplier ids. Renaming or deleting a     │
//! │  supplier leaves existing keys untouched.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Supplier name → quoted unit price.
///
/// Backed by a `BTreeMap`, so iteration is ordered by supplier name and keys
/// are unique. Prices are not checked here; see
/// [`validate_item`](crate::validation::validate_item).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierPrices(BTreeMap<String, f64>);

impl SupplierPrices {
    /// Creates an empty map.
    pub fn new() -> Self {
        SupplierPrices(BTreeMap::new())
    }

    /// Creates a map holding a single quote.
    pub fn single(supplier: impl Into<String>, price: f64) -> Self {
        let mut prices = SupplierPrices::new();
        prices.insert(supplier, price);
        prices
    }

    /// Sets the price for a supplier, returning the previous quote.
    pub fn insert(&mut self, supplier: impl Into<String>, price: f64) -> Option<f64> {
        self.0.insert(supplier.into(), price)
    }

    /// Removes a supplier's quote.
    pub fn remove(&mut self, supplier: &str) -> Option<f64> {
        self.0.remove(supplier)
    }

    pub fn get(&self, supplier: &str) -> Option<f64> {
        self.0.get(supplier).copied()
    }

    /// Exact, case-sensitive key lookup.
    pub fn contains(&self, supplier: &str) -> bool {
        self.0.contains_key(supplier)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, price)| (name.as_str(), *price))
    }

    pub fn suppliers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Lowest quoted price, if any.
    pub fn min_price(&self) -> Option<f64> {
        self.0.values().copied().reduce(f64::min)
    }

    /// Supplier with the lowest price. Ties go to the first name in order.
    pub fn best(&self) -> Option<(&str, f64)> {
        self.iter().fold(None, |best, (name, price)| match best {
            Some((_, best_price)) if best_price <= price => best,
            _ => Some((name, price)),
        })
    }

    /// Serialises to the JSON object stored in the database.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(&self.0).map_err(|e| CoreError::InvalidPriceMap(e.to_string()))
    }

    /// Parses the stored JSON object. Blank text decodes to an empty map.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        if text.trim().is_empty() {
            return Ok(SupplierPrices::new());
        }

        serde_json::from_str(text).map_err(|e| CoreError::InvalidPriceMap(e.to_string()))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for SupplierPrices {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        SupplierPrices(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[(S, f64); N]> for SupplierPrices {
    fn from(entries: [(S, f64); N]) -> Self {
        entries.into_iter().collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
