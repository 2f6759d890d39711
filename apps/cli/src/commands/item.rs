//! # Item Commands
//!
//! ```text
//! compras item add "Parafuso sextavado" P001 --brand ABC \
//!        --supplier "Fornecedor A" --price 5,50 --quantity 10
//! compras item list --status to_buy --supplier "Fornecedor A"
//! compras item price 1 "Fornecedor B" 4,90
//! compras item status 1 purchased
//! ```
//!
//! Every write goes through `validate_item` before reaching the database.

use clap::{Args, Subcommand};
use tracing::debug;

use compras_core::report::format_brl;
use compras_core::validation::{validate_item, validate_numeric, validate_required, ItemForm};
use compras_core::{CoreError, Item, ItemStatus};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    /// Add an item with its first supplier quote
    Add(AddItemArgs),

    /// List items, newest first
    List {
        /// Only items in this status (to_buy, purchased, partially_purchased)
        #[arg(long)]
        status: Option<ItemStatus>,

        /// Only items quoted by this supplier
        #[arg(long)]
        supplier: Option<String>,
    },

    /// Show one item with all its quotes
    Show { id: i64 },

    /// Change description, code, brand or quantity
    Update(UpdateItemArgs),

    /// Set the purchase status
    Status { id: i64, status: ItemStatus },

    /// Add or replace a supplier's price
    Price {
        id: i64,
        supplier: String,
        price: String,
    },

    /// Remove a supplier's price
    RemovePrice { id: i64, supplier: String },

    /// Delete an item
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct AddItemArgs {
    pub description: String,
    pub code: String,

    /// Defaults to N/A
    #[arg(long, default_value = "")]
    pub brand: String,

    #[arg(long)]
    pub supplier: String,

    /// Unit price; `5,50`, `5.50` and `R$ 5,50` are accepted
    #[arg(long)]
    pub price: String,

    #[arg(long)]
    pub quantity: String,
}

impl From<AddItemArgs> for ItemForm {
    fn from(args: AddItemArgs) -> Self {
        ItemForm {
            description: args.description,
            code: args.code,
            brand: args.brand,
            supplier: args.supplier,
            price: args.price,
            quantity: args.quantity,
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct UpdateItemArgs {
    pub id: i64,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub code: Option<String>,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub quantity: Option<String>,
}

pub async fn run(state: &AppState, command: ItemCommand) -> AppResult<()> {
    match command {
        ItemCommand::Add(args) => {
            let id = add(state, args.into()).await?;
            println!("Item {} added", id);
        }
        ItemCommand::List { status, supplier } => {
            let items = list(state, status, supplier.as_deref()).await?;
            if items.is_empty() {
                println!("No items");
            }
            for item in &items {
                println!("{}", summary_line(item));
            }
        }
        ItemCommand::Show { id } => {
            let item = show(state, id).await?;
            print!("{}", details(&item));
        }
        ItemCommand::Update(args) => {
            let item = update(state, args).await?;
            println!("Updated: {}", summary_line(&item));
        }
        ItemCommand::Status { id, status } => {
            set_status(state, id, status).await?;
            println!("Item {} is now {}", id, status);
        }
        ItemCommand::Price { id, supplier, price } => {
            let item = set_price(state, id, &supplier, &price).await?;
            print!("{}", details(&item));
        }
        ItemCommand::RemovePrice { id, supplier } => {
            let item = remove_price(state, id, &supplier).await?;
            print!("{}", details(&item));
        }
        ItemCommand::Delete { id } => {
            state.db().items().delete(id).await?;
            println!("Item {} deleted", id);
        }
    }

    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Validates the form and inserts a `To Buy` item.
pub async fn add(state: &AppState, form: ItemForm) -> AppResult<i64> {
    let config = &state.config().validation;

    let item = form.into_item(config)?;
    CoreError::check(validate_item(&item, config))?;

    let id = state.db().items().create(&item).await?;
    debug!(id, "Item added");
    Ok(id)
}

/// Lists items; both filters together give the intersection.
pub async fn list(
    state: &AppState,
    status: Option<ItemStatus>,
    supplier: Option<&str>,
) -> AppResult<Vec<Item>> {
    let items = state.db().items();

    let result = match (status, supplier) {
        (Some(status), Some(supplier)) => items.get_by_status_and_supplier(status, supplier).await?,
        (Some(status), None) => items.get_by_status(status).await?,
        (None, Some(supplier)) => items.get_by_supplier(supplier).await?,
        (None, None) => items.get_all().await?,
    };

    Ok(result)
}

pub async fn show(state: &AppState, id: i64) -> AppResult<Item> {
    state
        .db()
        .items()
        .get_by_id(id)
        .await?
        .ok_or_else(|| CoreError::ItemNotFound(id).into())
}

/// Applies the given field changes and saves the item.
pub async fn update(state: &AppState, args: UpdateItemArgs) -> AppResult<Item> {
    let config = &state.config().validation;
    let mut item = show(state, args.id).await?;
    let mut errors = Vec::new();

    if let Some(description) = args.description {
        item.description = description.trim().to_string();
    }
    if let Some(code) = args.code {
        item.code = code.trim().to_string();
    }
    if let Some(brand) = args.brand {
        item.brand = compras_core::brand_or_default(brand.trim().to_string());
    }
    if let Some(quantity) = args.quantity {
        match validate_numeric(
            &quantity,
            "Quantity",
            Some(config.min_quantity),
            Some(config.max_quantity),
        ) {
            Ok(quantity) => item.quantity = quantity,
            Err(e) => errors.push(e),
        }
    }

    errors.extend(validate_item(&item, config));
    CoreError::check(errors)?;

    state.db().items().update(&item).await?;
    Ok(item)
}

pub async fn set_status(state: &AppState, id: i64, status: ItemStatus) -> AppResult<()> {
    state.db().items().update_status(id, status).await?;
    Ok(())
}

/// Records `supplier`'s price for an item, replacing any previous quote.
pub async fn set_price(state: &AppState, id: i64, supplier: &str, price: &str) -> AppResult<Item> {
    let config = &state.config().validation;

    let supplier = supplier.trim();
    validate_required(supplier, "Supplier")?;
    let price = validate_numeric(price, "Price", Some(config.min_price), Some(config.max_price))?;

    let mut item = show(state, id).await?;
    item.prices.insert(supplier, price);
    CoreError::check(validate_item(&item, config))?;

    state.db().items().update(&item).await?;
    Ok(item)
}

/// Drops one supplier quote. The last quote cannot be removed.
pub async fn remove_price(state: &AppState, id: i64, supplier: &str) -> AppResult<Item> {
    let mut item = show(state, id).await?;

    if item.prices.remove(supplier).is_none() {
        return Err(AppError::not_found("Price from supplier", supplier));
    }
    CoreError::check(validate_item(&item, &state.config().validation))?;

    state.db().items().update(&item).await?;
    Ok(item)
}

// =============================================================================
// Output
// =============================================================================

fn summary_line(item: &Item) -> String {
    let best = match item.best_supplier() {
        Some((supplier, price)) => format!("{} {}", supplier, format_brl(price)),
        None => "-".to_string(),
    };

    format!(
        "#{:<4} {:<40} {:<12} {:<10} qty {:<8} {:<20} best: {}",
        item.id.unwrap_or_default(),
        item.description,
        item.code,
        item.brand,
        item.quantity,
        item.status.label(),
        best
    )
}

fn details(item: &Item) -> String {
    let mut out = format!(
        "Item #{}\n  Description: {}\n  Code: {}\n  Brand: {}\n  Quantity: {}\n  Status: {}\n  Quotes:\n",
        item.id.unwrap_or_default(),
        item.description,
        item.code,
        item.brand,
        item.quantity,
        item.status.label()
    );

    for (supplier, price) in item.prices.iter() {
        out.push_str(&format!("    {}: {}\n", supplier, format_brl(price)));
    }
    out.push_str(&format!("  Total (best price): {}\n", format_brl(item.total_value())));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::test_support::memory_state;

    fn form(description: &str, supplier: &str, price: &str) -> ItemForm {
        ItemForm {
            description: description.to_string(),
            code: "P001".to_string(),
            brand: String::new(),
            supplier: supplier.to_string(),
            price: price.to_string(),
            quantity: "10".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_and_show() {
        let state = memory_state().await;

        let id = add(&state, form("Parafuso", "Fornecedor A", "5,50")).await.unwrap();
        let item = show(&state, id).await.unwrap();

        assert_eq!(item.brand, "N/A");
        assert_eq!(item.status, ItemStatus::ToBuy);
        assert_eq!(item.prices.get("Fornecedor A"), Some(5.5));
        assert_eq!(item.total_value(), 55.0);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_form() {
        let state = memory_state().await;

        let err = add(&state, form("Pa", "", "abc")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("Supplier is required"));
        assert!(list(&state, None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_intersect() {
        let state = memory_state().await;
        let a = add(&state, form("Parafuso", "Fornecedor A", "5")).await.unwrap();
        let b = add(&state, form("Porca sextavada", "Fornecedor A", "1")).await.unwrap();
        add(&state, form("Arruela", "Fornecedor B", "0,5")).await.unwrap();
        set_status(&state, b, ItemStatus::Purchased).await.unwrap();

        let quoted_by_a = list(&state, None, Some("Fornecedor A")).await.unwrap();
        assert_eq!(quoted_by_a.len(), 2);

        let to_buy_from_a = list(&state, Some(ItemStatus::ToBuy), Some("Fornecedor A"))
            .await
            .unwrap();
        assert_eq!(to_buy_from_a.len(), 1);
        assert_eq!(to_buy_from_a[0].id, Some(a));
    }

    #[tokio::test]
    async fn test_prices_can_be_added_but_not_all_removed() {
        let state = memory_state().await;
        let id = add(&state, form("Parafuso", "Fornecedor A", "5")).await.unwrap();

        let item = set_price(&state, id, "Fornecedor B", "R$ 4,00").await.unwrap();
        assert_eq!(item.best_supplier(), Some(("Fornecedor B", 4.0)));

        remove_price(&state, id, "Fornecedor A").await.unwrap();
        let err = remove_price(&state, id, "Fornecedor B").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = remove_price(&state, id, "Fornecedor Z").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        assert_eq!(show(&state, id).await.unwrap().prices.len(), 1);
    }

    #[tokio::test]
    async fn test_update_validates_changes() {
        let state = memory_state().await;
        let id = add(&state, form("Parafuso", "Fornecedor A", "5")).await.unwrap();

        let item = update(
            &state,
            UpdateItemArgs {
                id,
                brand: Some("  ".to_string()),
                quantity: Some("3".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(item.brand, "N/A");
        assert_eq!(item.quantity, 3.0);

        let err = update(
            &state,
            UpdateItemArgs {
                id,
                description: Some("x".to_string()),
                quantity: Some("0".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(show(&state, id).await.unwrap().description, "Parafuso");
    }

    #[tokio::test]
    async fn test_missing_item_is_not_found() {
        let state = memory_state().await;

        assert_eq!(show(&state, 42).await.unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(
            set_status(&state, 42, ItemStatus::Purchased).await.unwrap_err().code,
            ErrorCode::NotFound
        );
    }
}
