//! Store-admin dashboard: catalog size and listing.

use serde_json::Value;
use tracing::{instrument, warn};

use crate::api::AdminClient;
use crate::error::Result;
use crate::types::ProductSummary;

/// Figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Number of products in the catalog.
    pub product_count: usize,
    /// Catalog rows that parsed; malformed rows are counted but not listed.
    pub products: Vec<ProductSummary>,
}

impl DashboardSummary {
    /// Load the dashboard figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    #[instrument(skip(client))]
    pub async fn load(client: &AdminClient) -> Result<Self> {
        let raw = client.products_raw().await?;
        let items = product_items(&raw);
        Ok(Self {
            product_count: items.len(),
            products: product_list(items),
        })
    }
}

/// The product entries of a catalog response.
///
/// Accepts a bare array or a `{"data": [...]}` envelope. Any other shape is
/// logged and treated as an empty catalog.
#[must_use]
pub fn product_items(raw: &Value) -> &[Value] {
    match raw {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => {
                warn!("Unexpected product list format");
                &[]
            }
        },
        _ => {
            warn!("Unexpected product list format");
            &[]
        }
    }
}

/// Parse catalog entries into product summaries, skipping malformed rows.
#[must_use]
pub fn product_list(items: &[Value]) -> Vec<ProductSummary> {
    items
        .iter()
        .filter_map(|item| {
            serde_json::from_value(item.clone())
                .map_err(|e| warn!(error = %e, "Skipping malformed product row"))
                .ok()
        })
        .collect()
}
