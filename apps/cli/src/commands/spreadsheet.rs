//! # Spreadsheet Import / Export
//!
//! CSV files in the column order
//! `description,code,brand,supplier,price,quantity,status`.
//!
//! ## Import
//! ```text
//! compras.csv ──► read_rows ──► import_rows (compras-db)
//!                    │               │
//!                    │               ├── match (description, code, brand)
//!                    │               │     └── set prices[supplier], quantity
//!                    │               └── no match ──► new `To Buy` item
//!                    └── header row optional, short rows padded
//! ```
//!
//! ## Export
//! One row per (item, supplier) pair, prices written as `R$x.yy`.

use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use compras_core::import::{ImportSummary, SpreadsheetRow, SPREADSHEET_HEADER};
use compras_core::report::export_rows;
use compras_db::import_rows;

use crate::error::AppResult;
use crate::state::AppState;

/// Imports a CSV file and prints the summary.
pub async fn run_import(state: &AppState, path: &Path) -> AppResult<()> {
    let summary = import(state, path).await?;

    println!(
        "Import finished: {} updated, {} added, {} skipped",
        summary.updated,
        summary.added,
        summary.skipped.len()
    );
    for skipped in &summary.skipped {
        println!("  {}", skipped);
    }

    Ok(())
}

/// Exports items to a CSV file and prints the row count.
pub async fn run_export(state: &AppState, path: &Path, supplier: Option<&str>) -> AppResult<()> {
    let count = export(state, path, supplier).await?;
    println!("Exported {} rows to {}", count, path.display());
    Ok(())
}

pub async fn import(state: &AppState, path: &Path) -> AppResult<ImportSummary> {
    info!(path = %path.display(), "Importing spreadsheet");

    let file = std::fs::File::open(path)?;
    let rows = read_rows(file)?;

    Ok(import_rows(state.db(), &rows, &state.config().validation).await?)
}

/// Writes every quote (or only `supplier`'s) and returns the number of rows.
pub async fn export(state: &AppState, path: &Path, supplier: Option<&str>) -> AppResult<usize> {
    let items = match supplier {
        Some(name) => state.db().items().get_by_supplier(name).await?,
        None => state.db().items().get_all().await?,
    };

    let file = std::fs::File::create(path)?;
    let count = write_rows(file, &items, supplier)?;

    info!(path = %path.display(), rows = count, "Spreadsheet exported");
    Ok(count)
}

/// Reads rows by position. A first row whose first cell is `description`
/// is taken as the header and skipped.
pub fn read_rows<R: Read>(reader: R) -> AppResult<Vec<SpreadsheetRow>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in csv.records().enumerate() {
        let record = record?;

        let is_header = index == 0
            && record
                .get(0)
                .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(SPREADSHEET_HEADER[0]));
        if is_header {
            continue;
        }

        let cell = |i: usize| record.get(i).unwrap_or_default().to_string();
        rows.push(SpreadsheetRow {
            description: cell(0),
            code: cell(1),
            brand: cell(2),
            supplier: cell(3),
            price: cell(4),
            quantity: cell(5),
            status: cell(6),
        });
    }

    Ok(rows)
}

/// Writes the header and one row per quote.
pub fn write_rows<W: Write>(
    writer: W,
    items: &[compras_core::Item],
    supplier: Option<&str>,
) -> AppResult<usize> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(SPREADSHEET_HEADER)?;

    let rows = export_rows(items, supplier);
    for row in &rows {
        csv.serialize(row)?;
    }
    csv.flush()?;

    Ok(rows.len())
}
