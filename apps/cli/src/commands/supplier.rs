//! # Supplier Commands
//!
//! Suppliers are a registry of names, CNPJs and sellers. Items reference
//! suppliers by name inside their price map, so renaming or deleting a
//! supplier here does not touch existing quotes.

use clap::{Args, Subcommand};

use compras_core::cnpj::format_cnpj;
use compras_core::validation::validate_supplier;
use compras_core::{CoreError, Supplier};

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Subcommand)]
pub enum SupplierCommand {
    /// Register a supplier
    Add {
        name: String,
        cnpj: String,
        /// Salesperson at the supplier
        seller: String,
    },

    /// List suppliers alphabetically
    List,

    /// Print supplier names only
    Names,

    Show { id: i64 },

    /// Change name, CNPJ or seller (item quotes keep the old name)
    Update(UpdateSupplierArgs),

    Delete { id: i64 },
}

#[derive(Debug, Default, Args)]
pub struct UpdateSupplierArgs {
    pub id: i64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub cnpj: Option<String>,

    #[arg(long)]
    pub seller: Option<String>,
}

pub async fn run(state: &AppState, command: SupplierCommand) -> AppResult<()> {
    match command {
        SupplierCommand::Add { name, cnpj, seller } => {
            let id = add(state, Supplier::new(name, cnpj, seller)).await?;
            println!("Supplier {} added", id);
        }
        SupplierCommand::List => {
            let suppliers = state.db().suppliers().get_all().await?;
            if suppliers.is_empty() {
                println!("No suppliers");
            }
            for supplier in &suppliers {
                println!("{}", line(supplier));
            }
        }
        SupplierCommand::Names => {
            for name in state.db().suppliers().get_names().await? {
                println!("{}", name);
            }
        }
        SupplierCommand::Show { id } => println!("{}", line(&show(state, id).await?)),
        SupplierCommand::Update(args) => {
            let supplier = update(state, args).await?;
            println!("Updated: {}", line(&supplier));
        }
        SupplierCommand::Delete { id } => {
            state.db().suppliers().delete(id).await?;
            println!("Supplier {} deleted", id);
        }
    }

    Ok(())
}

pub async fn add(state: &AppState, supplier: Supplier) -> AppResult<i64> {
    let supplier = normalized(supplier)?;
    Ok(state.db().suppliers().create(&supplier).await?)
}

pub async fn show(state: &AppState, id: i64) -> AppResult<Supplier> {
    state
        .db()
        .suppliers()
        .get_by_id(id)
        .await?
        .ok_or_else(|| CoreError::SupplierNotFound(id).into())
}

pub async fn update(state: &AppState, args: UpdateSupplierArgs) -> AppResult<Supplier> {
    let mut supplier = show(state, args.id).await?;

    if let Some(name) = args.name {
        supplier.name = name;
    }
    if let Some(cnpj) = args.cnpj {
        supplier.cnpj = cnpj;
    }
    if let Some(seller) = args.seller {
        supplier.seller_name = seller;
    }

    let supplier = normalized(supplier)?;
    state.db().suppliers().update(&supplier).await?;
    Ok(supplier)
}

fn normalized(mut supplier: Supplier) -> AppResult<Supplier> {
    supplier.name = supplier.name.trim().to_string();
    supplier.seller_name = supplier.seller_name.trim().to_string();
    CoreError::check(validate_supplier(&supplier))?;

    supplier.cnpj = format_cnpj(&supplier.cnpj);
    Ok(supplier)
}

fn line(supplier: &Supplier) -> String {
    format!(
        "#{:<4} {:<40} CNPJ {:<18} seller: {}",
        supplier.id.unwrap_or_default(),
        supplier.name,
        supplier.cnpj,
        supplier.seller_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::test_support::memory_state;

    #[tokio::test]
    async fn test_add_and_names() {
        let state = memory_state().await;

        add(&state, Supplier::new("Zeta Ferragens", "45997418000153", "Carlos"))
            .await
            .unwrap();
        let id = add(&state, Supplier::new("Alfa Parafusos", "11.222.333/0001-81", "Bia"))
            .await
            .unwrap();

        assert_eq!(
            state.db().suppliers().get_names().await.unwrap(),
            vec!["Alfa Parafusos", "Zeta Ferragens"]
        );
        assert_eq!(show(&state, id).await.unwrap().seller_name, "Bia");
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected() {
        let state = memory_state().await;

        let err = add(&state, Supplier::new("  ", "11.222.333/0001-81", ""))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("Supplier name is required"));
        assert!(err.message.contains("Seller name is required"));
    }

    #[tokio::test]
    async fn test_update_missing_supplier() {
        let state = memory_state().await;

        let err = update(
            &state,
            UpdateSupplierArgs {
                id: 9,
                name: Some("Novo".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
