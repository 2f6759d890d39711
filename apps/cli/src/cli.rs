//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::backup::BackupCommand;
use crate::commands::company::CompanyCommand;
use crate::commands::config::ConfigCommand;
use crate::commands::item::ItemCommand;
use crate::commands::supplier::SupplierCommand;

#[derive(Debug, Parser)]
#[command(
    name = "compras",
    version,
    about = "Purchasing management: items, supplier quotes and purchase orders"
)]
pub struct Cli {
    /// Config file (default: compras.toml in the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Items and their supplier quotes
    #[command(subcommand)]
    Item(ItemCommand),

    /// The buying company
    #[command(subcommand)]
    Company(CompanyCommand),

    /// Supplier registry
    #[command(subcommand)]
    Supplier(SupplierCommand),

    /// Merge a CSV spreadsheet into the item list
    Import { file: PathBuf },

    /// Write items to a CSV spreadsheet, one row per quote
    Export {
        file: PathBuf,

        /// Only this supplier's quotes
        #[arg(long)]
        supplier: Option<String>,
    },

    /// Generate a purchase order for the default company
    Order {
        /// Only items quoted by this supplier
        #[arg(long)]
        supplier: Option<String>,

        /// Output file (default: order_<n>.txt)
        #[arg(long, conflicts_with = "print")]
        output: Option<PathBuf>,

        /// Print to the terminal instead of writing a file
        #[arg(long)]
        print: bool,
    },

    /// Item counts by status and total value
    Stats,

    /// Database backups
    #[command(subcommand)]
    Backup(BackupCommand),

    /// Configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}
