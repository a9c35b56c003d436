//! Wire types for the store-admin endpoints.

use chrono::{DateTime, Utc};
use pasar_core::{InventoryAction, JournalId, ProductId, Rupiah, StoreId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Profile Types
// =============================================================================

/// A store as referenced from profiles and journal rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRef {
    pub id: StoreId,
    pub name: String,
}

/// Response of `GET /api/v1/auth/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub user: Profile,
}

/// The signed-in user's profile, reduced to what the admin views need.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Stores the user administers; the first one is the active store.
    #[serde(rename = "Store", default)]
    pub stores: Vec<StoreRef>,
}

// =============================================================================
// Product Types
// =============================================================================

/// A product row in the catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Rupiah,
}

// =============================================================================
// Inventory Types
// =============================================================================

/// The product a journal entry refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Rupiah,
}

/// The user who made an inventory change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalUser {
    pub id: UserId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl JournalUser {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// One inventory ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryJournal {
    pub id: JournalId,
    pub store_id: StoreId,
    pub product_id: ProductId,
    /// Signed stock change: positive for additions, negative for sales.
    #[serde(deserialize_with = "signed_quantity")]
    pub quantity: i64,
    pub action: InventoryAction,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "Store", default)]
    pub store: Option<StoreRef>,
    #[serde(rename = "Product")]
    pub product: JournalProduct,
    #[serde(rename = "User", default)]
    pub user: Option<JournalUser>,
}

/// Accept the quantity as a JSON number or a numeric string.
fn signed_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Paging information attached to history responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u32,
    pub items_per_page: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// Response of `GET /api/v1/inventory/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Vec<InventoryJournal>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

// =============================================================================
// Store Types
// =============================================================================

/// Catalog details of a product stocked by a store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StockedProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Rupiah,
    #[serde(with = "pasar_core::json_number")]
    pub weight: Decimal,
}

/// A product and its stock level in one store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProduct {
    pub product_id: ProductId,
    pub store_id: StoreId,
    pub stock: i64,
    #[serde(rename = "Product")]
    pub product: StockedProduct,
}

/// A store with its address and stocked products.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDetail {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    #[serde(rename = "StoreProduct", default)]
    pub products: Vec<StoreProduct>,
}

impl StoreDetail {
    /// Street, city, province and postal code on one line.
    #[must_use]
    pub fn full_address(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.address, self.city, self.province, self.postal_code
        )
    }

    /// Units in stock across every product of the store.
    #[must_use]
    pub fn total_stock(&self) -> i64 {
        self.products.iter().map(|p| p.stock).sum()
    }
}
