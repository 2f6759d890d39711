//! # Domain Types
//!
//! Core domain types used throughout Compras.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │    Company      │   │    Supplier     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  description    │   │  name           │   │  name ◄───────┐ │       │
//! │  │  code, brand    │   │  cnpj           │   │  cnpj         │ │       │
//! │  │  status         │   │  buyer_name     │   │  seller_name  │ │       │
//! │  │  quantity       │   └─────────────────┘   └───────────────┼─┘       │
//! │  │  prices ────────┼── SupplierPrices keys ──────────────────┘         │
//! │  └─────────────────┘   (by name, not a foreign key)                    │
//! │                                                                         │
//! │  ┌─────────────────────────────┐                                       │
//! │  │        ItemStatus           │                                       │
//! │  │  ToBuy → Purchased          │                                       │
//! │  │       → PartiallyPurchased  │                                       │
//! │  └─────────────────────────────┘                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Identifiers are assigned by the store on insert. A value with `id: None`
//! has not been persisted yet.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::prices::SupplierPrices;
use crate::NOT_AVAILABLE;

// =============================================================================
// Item Status
// =============================================================================

/// Purchase status of an item.
///
/// Stored as snake_case text (`to_buy`, `purchased`, `partially_purchased`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Newly created or imported, not yet bought.
    #[default]
    ToBuy,
    /// Fully bought.
    Purchased,
    /// Some of the quantity bought.
    PartiallyPurchased,
}

impl ItemStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [ItemStatus; 3] = [
        ItemStatus::ToBuy,
        ItemStatus::Purchased,
        ItemStatus::PartiallyPurchased,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::ToBuy => "To Buy",
            ItemStatus::Purchased => "Purchased",
            ItemStatus::PartiallyPurchased => "Partially Purchased",
        }
    }

    /// Storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::ToBuy => "to_buy",
            ItemStatus::Purchased => "purchased",
            ItemStatus::PartiallyPurchased => "partially_purchased",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ItemStatus {
    type Err = ValidationError;

    /// Accepts labels ("To Buy"), storage keys ("to_buy") and kebab-case
    /// ("partially-purchased"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();

        match key.as_str() {
            "to_buy" => Ok(ItemStatus::ToBuy),
            "purchased" => Ok(ItemStatus::Purchased),
            "partially_purchased" | "partial" => Ok(ItemStatus::PartiallyPurchased),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: ItemStatus::ALL.iter().map(|s| s.label().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// A purchasable line with its supplier quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Store-assigned identifier (`None` until created).
    pub id: Option<i64>,

    /// Free-text description, e.g. "PARAFUSO SEXTAVADO 1/4".
    pub description: String,

    /// Internal or manufacturer code.
    pub code: String,

    /// Brand; `"N/A"` when not provided.
    pub brand: String,

    pub status: ItemStatus,

    /// Quantity to buy (may be fractional, e.g. metres or kilograms).
    pub quantity: f64,

    /// Supplier name → quoted unit price.
    pub prices: SupplierPrices,
}

impl Item {
    /// Creates an unsaved item with status [`ItemStatus::ToBuy`].
    ///
    /// A blank brand becomes `"N/A"`.
    pub fn new(
        description: impl Into<String>,
        code: impl Into<String>,
        brand: impl Into<String>,
        quantity: f64,
        prices: SupplierPrices,
    ) -> Self {
        Item {
            id: None,
            description: description.into(),
            code: code.into(),
            brand: brand_or_default(brand.into()),
            status: ItemStatus::ToBuy,
            quantity,
            prices,
        }
    }

    /// Quantity × lowest quoted price (0.0 without quotes).
    ///
    /// ```rust
    /// use compras_core::{Item, SupplierPrices};
    ///
    /// let item = Item::new("Parafuso", "P001", "ABC", 10.0, SupplierPrices::single("Fornecedor A", 5.5));
    /// assert_eq!(item.total_value(), 55.0);
    /// ```
    pub fn total_value(&self) -> f64 {
        self.prices
            .min_price()
            .map_or(0.0, |price| self.quantity * price)
    }

    /// Supplier with the lowest quote.
    pub fn best_supplier(&self) -> Option<(&str, f64)> {
        self.prices.best()
    }

    /// Case-insensitive match on (description, code, brand), as used by import.
    pub fn matches_identity(&self, description: &str, code: &str, brand: &str) -> bool {
        eq_ignore_case(&self.description, description)
            && eq_ignore_case(&self.code, code)
            && eq_ignore_case(&self.brand, brand)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "Item({}): {} - {} - {}", id, self.description, self.code, self.status),
            None => write!(f, "Item(new): {} - {} - {}", self.description, self.code, self.status),
        }
    }
}

/// Returns `"N/A"` for a blank brand, otherwise the trimmed brand.
pub fn brand_or_default(brand: String) -> String {
    let trimmed = brand.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_string()
    } else if trimmed.len() == brand.len() {
        brand
    } else {
        trimmed.to_string()
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

// =============================================================================
// Company
// =============================================================================

/// The buying company printed on purchase orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: Option<i64>,
    pub name: String,
    pub cnpj: String,
    /// Contact person responsible for purchasing.
    pub buyer_name: String,
}

impl Company {
    pub fn new(name: impl Into<String>, cnpj: impl Into<String>, buyer_name: impl Into<String>) -> Self {
        Company {
            id: None,
            name: name.into(),
            cnpj: cnpj.into(),
            buyer_name: buyer_name.into(),
        }
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A vendor quoting prices. `name` is the key used in [`SupplierPrices`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Option<i64>,
    pub name: String,
    pub cnpj: String,
    /// Sales contact at the supplier.
    pub seller_name: String,
}

impl Supplier {
    pub fn new(name: impl Into<String>, cnpj: impl Into<String>, seller_name: impl Into<String>) -> Self {
        Supplier {
            id: None,
            name: name.into(),
            cnpj: cnpj.into(),
            seller_name: seller_name.into(),
        }
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Dashboard numbers over a set of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemStatistics {
    pub total_items: usize,
    pub status_counts: BTreeMap<ItemStatus, usize>,
    /// Sum of [`Item::total_value`] over all items.
    pub total_value: f64,
}

impl ItemStatistics {
    pub fn from_items(items: &[Item]) -> Self {
        let mut stats = ItemStatistics {
            total_items: items.len(),
            ..Default::default()
        };

        for item in items {
            *stats.status_counts.entry(item.status).or_insert(0) += 1;
            stats.total_value += item.total_value();
        }

        stats
    }

    /// Count for one status (0 when absent).
    pub fn count(&self, status: ItemStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parafuso() -> Item {
        Item::new(
            "Parafuso",
            "P001",
            "ABC",
            10.0,
            SupplierPrices::single("Fornecedor A", 5.5),
        )
    }

    #[test]
    fn test_new_item_defaults() {
        let item = Item::new("Porca", "N01", "  ", 1.0, SupplierPrices::new());
        assert_eq!(item.id, None);
        assert_eq!(item.status, ItemStatus::ToBuy);
        assert_eq!(item.brand, "N/A");
    }

    #[test]
    fn test_total_value_uses_lowest_price() {
        let mut item = parafuso();
        assert_eq!(item.total_value(), 55.0);

        item.prices.insert("Fornecedor B", 4.0);
        assert_eq!(item.total_value(), 40.0);
        assert_eq!(item.best_supplier(), Some(("Fornecedor B", 4.0)));

        item.prices = SupplierPrices::new();
        assert_eq!(item.total_value(), 0.0);
    }

    #[test]
    fn test_matches_identity_ignores_case() {
        let item = parafuso();
        assert!(item.matches_identity("PARAFUSO", "p001", "abc"));
        assert!(!item.matches_identity("PARAFUSO", "P002", "ABC"));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("To Buy".parse::<ItemStatus>().unwrap(), ItemStatus::ToBuy);
        assert_eq!("to_buy".parse::<ItemStatus>().unwrap(), ItemStatus::ToBuy);
        assert_eq!(
            "partially-purchased".parse::<ItemStatus>().unwrap(),
            ItemStatus::PartiallyPurchased
        );
        assert_eq!("PURCHASED".parse::<ItemStatus>().unwrap(), ItemStatus::Purchased);
        assert!("shipped".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn test_status_default_and_display() {
        assert_eq!(ItemStatus::default(), ItemStatus::ToBuy);
        assert_eq!(ItemStatus::PartiallyPurchased.to_string(), "Partially Purchased");
        assert_eq!(ItemStatus::PartiallyPurchased.as_str(), "partially_purchased");
    }

    #[test]
    fn test_statistics() {
        let mut bought = parafuso();
        bought.status = ItemStatus::Purchased;
        let items = vec![parafuso(), parafuso(), bought];

        let stats = ItemStatistics::from_items(&items);
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.count(ItemStatus::ToBuy), 2);
        assert_eq!(stats.count(ItemStatus::Purchased), 1);
        assert_eq!(stats.count(ItemStatus::PartiallyPurchased), 0);
        assert_eq!(stats.total_value, 165.0);
    }
}
