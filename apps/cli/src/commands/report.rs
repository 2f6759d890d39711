//! # Reports
//!
//! Purchase orders and the item statistics shown on the dashboard.

use std::path::{Path, PathBuf};

use tracing::info;

use compras_core::report::{format_brl, PurchaseOrder};
use compras_core::{ItemStatistics, ItemStatus};

use crate::commands::company::default_company;
use crate::error::AppResult;
use crate::state::AppState;

/// Writes (or prints) a purchase order for the default company.
///
/// Without `--output` the file is written as `order_<n>.txt` in the current
/// directory.
pub async fn run_order(
    state: &AppState,
    supplier: Option<&str>,
    output: Option<&Path>,
    print: bool,
) -> AppResult<()> {
    let (file_name, text) = order(state, supplier).await?;

    if print {
        print!("{}", text);
        return Ok(());
    }

    let path = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(file_name));
    std::fs::write(&path, text)?;

    info!(path = %path.display(), "Purchase order written");
    println!("Order written to {}", path.display());
    Ok(())
}

/// Renders the order; returns its suggested file name and text.
///
/// Fails with `NoDefaultCompany` when no company is registered.
pub async fn order(state: &AppState, supplier: Option<&str>) -> AppResult<(String, String)> {
    let company = default_company(state).await?;
    let items = state.db().items().get_all().await?;

    let order = PurchaseOrder::new(&company, &items, supplier);
    Ok((order.file_name(), order.render()))
}

pub async fn run_stats(state: &AppState) -> AppResult<()> {
    let stats = state.db().items().statistics().await?;
    print!("{}", render_stats(&stats));
    Ok(())
}

fn render_stats(stats: &ItemStatistics) -> String {
    let mut out = format!("Total items: {}\n", stats.total_items);

    for status in ItemStatus::ALL {
        out.push_str(&format!("  {:<20} {}\n", status.label(), stats.count(status)));
    }
    out.push_str(&format!("Total value: {}\n", format_brl(stats.total_value)));

    out
}
