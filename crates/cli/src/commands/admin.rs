//! Store-admin commands.
//!
//! # Environment Variables
//!
//! - `PASAR_API_BASE_URL` - Backend base URL
//! - `PASAR_SESSION_COOKIE` - Session cookie of a store admin

use chrono::NaiveDate;
use pasar_admin::api::AdminClient;
use pasar_admin::config::AdminConfig;
use pasar_admin::dashboard::DashboardSummary;
use pasar_admin::inventory::{ActionTone, HistoryFilter, InventoryHistory, signed_quantity};
use pasar_admin::store::load_store;
use pasar_core::{InventoryAction, ProductId, StoreId};

type BoxError = Box<dyn std::error::Error>;

fn client() -> Result<AdminClient, BoxError> {
    let config = AdminConfig::from_env()?;
    Ok(AdminClient::new(&config)?)
}

/// Print the catalog.
#[allow(clippy::print_stdout)]
pub async fn products() -> Result<(), BoxError> {
    let summary = DashboardSummary::load(&client()?).await?;
    for product in &summary.products {
        println!("  {:<12} {:<30} {:>20}", product.id, product.name, product.price);
    }
    println!("Total products: {}", summary.product_count);
    Ok(())
}

/// Print the inventory history of the admin's store.
#[allow(clippy::print_stdout)]
pub async fn history(
    action: Option<InventoryAction>,
    product: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(), BoxError> {
    let filter = HistoryFilter {
        action,
        product: product.map(ProductId::new),
        start_date: from,
        end_date: to,
    };
    let view = InventoryHistory::load(&client()?, filter).await?;

    println!("Inventory history for {}", view.store.name);
    if view.entries.is_empty() {
        println!("{}", view.empty_message());
        return Ok(());
    }

    for entry in &view.entries {
        let changed_by = entry
            .user
            .as_ref()
            .map(|u| format!("{} ({})", u.full_name(), u.role))
            .unwrap_or_default();
        println!(
            "{}  {:<30} {:<8} {:<3} {:>6}  {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.product.name,
            entry.action,
            ActionTone::from(entry.action).label(),
            signed_quantity(entry.quantity),
            changed_by
        );
    }

    if let Some(summary) = view.summary() {
        println!();
        println!("{summary}");
    }
    Ok(())
}

/// Print a store's details.
#[allow(clippy::print_stdout)]
pub async fn store(id: &str) -> Result<(), BoxError> {
    let store = load_store(&client()?, &StoreId::new(id)).await?;

    println!("{}", store.name);
    println!("{}", store.full_address());
    for item in &store.products {
        println!(
            "  {:<30} {:>20}  {} kg  stock {}",
            item.product.name, item.product.price, item.product.weight, item.stock
        );
    }
    Ok(())
}
