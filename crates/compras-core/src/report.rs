//! # Reports
//!
//! Purchase-order text and spreadsheet export rows.
//!
//! ## Purchase Order Layout
//! ```text
//! Order #4
//! Company: ACME LTDA - CNPJ: 11.222.333/0001-81
//! Buyer: Maria Souza
//!
//! I: PARAFUSO  Code: P001  Brand: ABC  Qty: 10  Prices: Fornecedor A: R$5.50
//! I: PORCA  Code: N01  Brand: N/A  Qty: 200  Prices: Fornecedor A: R$0.35, Fornecedor B: R$0.30
//! ```
//!
//! When a supplier is chosen, only items quoted by that supplier are listed
//! and only that supplier's price is shown.

use serde::Serialize;

use crate::cnpj::format_cnpj;
use crate::types::{Company, Item};

/// Formats a price the way orders and exports show it: `R$x.yy`.
///
/// ```rust
/// use compras_core::report::format_brl;
///
/// assert_eq!(format_brl(5.5), "R$5.50");
/// ```
pub fn format_brl(value: f64) -> String {
    format!("R${:.2}", value)
}

// =============================================================================
// Purchase Order
// =============================================================================

/// A purchase order ready to render.
#[derive(Debug, Clone)]
pub struct PurchaseOrder<'a> {
    /// Total number of items plus one.
    pub number: usize,
    pub company: &'a Company,
    pub supplier: Option<&'a str>,
    pub items: Vec<&'a Item>,
}

impl<'a> PurchaseOrder<'a> {
    /// Builds an order over `items`, keeping only those quoted by `supplier`
    /// when one is given. The order number counts every item, filtered or not.
    pub fn new(company: &'a Company, items: &'a [Item], supplier: Option<&'a str>) -> Self {
        let selected = items
            .iter()
            .filter(|item| supplier.map_or(true, |name| item.prices.contains(name)))
            .collect();

        PurchaseOrder {
            number: items.len() + 1,
            company,
            supplier,
            items: selected,
        }
    }

    /// Suggested output file name, e.g. `order_4.txt`.
    pub fn file_name(&self) -> String {
        format!("order_{}.txt", self.number)
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "Order #{}\nCompany: {} - CNPJ: {}\nBuyer: {}\n",
            self.number,
            self.company.name,
            format_cnpj(&self.company.cnpj),
            self.company.buyer_name
        );

        if !self.items.is_empty() {
            out.push('\n');
        }

        for item in &self.items {
            out.push_str(&self.render_line(item));
            out.push('\n');
        }

        out
    }

    fn render_line(&self, item: &Item) -> String {
        let prices = match self.supplier {
            Some(name) => format!("{}: {}", name, format_brl(item.prices.get(name).unwrap_or(0.0))),
            None => item
                .prices
                .iter()
                .map(|(name, price)| format!("{}: {}", name, format_brl(price)))
                .collect::<Vec<_>>()
                .join(", "),
        };

        format!(
            "I: {}  Code: {}  Brand: {}  Qty: {}  Prices: {}",
            item.description, item.code, item.brand, item.quantity, prices
        )
    }
}

// =============================================================================
// Spreadsheet Export
// =============================================================================

/// One exported (item, supplier) pair. Field order matches
/// [`SPREADSHEET_HEADER`](crate::import::SPREADSHEET_HEADER).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub description: String,
    pub code: String,
    pub brand: String,
    pub supplier: String,
    pub price: String,
    pub quantity: f64,
    pub status: String,
}

/// Expands items into one row per supplier quote, optionally restricted to
/// a single supplier.
pub fn export_rows(items: &[Item], supplier: Option<&str>) -> Vec<ExportRow> {
    items
        .iter()
        .flat_map(|item| {
            item.prices
                .iter()
                .filter(move |(name, _)| supplier.map_or(true, |wanted| *name == wanted))
                .map(move |(name, price)| ExportRow {
                    description: item.description.clone(),
                    code: item.code.clone(),
                    brand: item.brand.clone(),
                    supplier: name.to_string(),
                    price: format_brl(price),
                    quantity: item.quantity,
                    status: item.status.label().to_string(),
                })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
