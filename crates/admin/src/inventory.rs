//! Inventory history view.
//!
//! Resolves the admin's store from their profile, offers the store's
//! products as filter options and lists the inventory journal filtered by
//! action, product and date range.

use std::collections::HashSet;

use chrono::{Local, NaiveDate};
use pasar_core::{InventoryAction, ProductId};
use tracing::{info, instrument, warn};

use crate::api::AdminClient;
use crate::error::{AdminError, FilterError, Result};
use crate::types::{InventoryJournal, JournalProduct, Pagination, StoreRef};

const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Filter
// =============================================================================

/// Filters applied to the inventory history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub action: Option<InventoryAction>,
    pub product: Option<ProductId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl HistoryFilter {
    /// Check the date range against today's local date.
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] if a date is in the future or the range is
    /// reversed.
    pub fn validate(&self) -> std::result::Result<(), FilterError> {
        self.validate_on(Local::now().date_naive())
    }

    /// Check the date range against a given date.
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] if a date is after `today` or the end date
    /// is before the start date.
    pub fn validate_on(&self, today: NaiveDate) -> std::result::Result<(), FilterError> {
        for date in [self.start_date, self.end_date].into_iter().flatten() {
            if date > today {
                return Err(FilterError::FutureDate(date));
            }
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && end < start
        {
            return Err(FilterError::EndBeforeStart { start, end });
        }
        Ok(())
    }

    /// Reset every filter.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any filter is set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.action.is_some()
            || self.product.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    /// Query string pairs for the history endpoint. Unset filters are omitted.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(action) = self.action {
            query.push(("action", action.as_str().to_string()));
        }
        if let Some(product) = &self.product {
            query.push(("productId", product.to_string()));
        }
        if let Some(start) = self.start_date {
            query.push(("startDate", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end_date {
            query.push(("endDate", end.format(DATE_FORMAT).to_string()));
        }
        query
    }
}

// =============================================================================
// Display Helpers
// =============================================================================

/// Whether an action adds or removes stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTone {
    Inbound,
    Outbound,
}

impl ActionTone {
    /// Short column label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inbound => "in",
            Self::Outbound => "out",
        }
    }
}

impl From<InventoryAction> for ActionTone {
    fn from(action: InventoryAction) -> Self {
        if action.is_inbound() {
            Self::Inbound
        } else {
            Self::Outbound
        }
    }
}

/// Quantity with an explicit sign for increases (`+5`, `-3`, `0`).
#[must_use]
pub fn signed_quantity(quantity: i64) -> String {
    if quantity > 0 {
        format!("+{quantity}")
    } else {
        quantity.to_string()
    }
}

/// Distinct products of a journal, in first-seen order.
#[must_use]
pub fn distinct_products(entries: &[InventoryJournal]) -> Vec<JournalProduct> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert(entry.product.id.clone()))
        .map(|entry| entry.product.clone())
        .collect()
}

// =============================================================================
// View
// =============================================================================

/// Resolve the store the signed-in admin manages.
///
/// # Errors
///
/// Returns [`AdminError::NoStoreAssigned`] if the profile lists no store.
pub async fn resolve_store(client: &AdminClient) -> Result<StoreRef> {
    let profile = client.profile().await?;
    profile
        .stores
        .into_iter()
        .next()
        .ok_or(AdminError::NoStoreAssigned)
}

/// A loaded inventory history page.
#[derive(Debug, Clone)]
pub struct InventoryHistory {
    /// The admin's store.
    pub store: StoreRef,
    /// Products offered in the product filter.
    pub products: Vec<JournalProduct>,
    /// Journal entries matching the filter.
    pub entries: Vec<InventoryJournal>,
    pub pagination: Option<Pagination>,
    /// The filter the entries were loaded with.
    pub filter: HistoryFilter,
}

impl InventoryHistory {
    /// Load the history page for the admin's store.
    ///
    /// A failure to load the product filter options is logged and leaves
    /// them empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter is invalid, the admin has no store, or
    /// the history cannot be fetched.
    #[instrument(skip(client))]
    pub async fn load(client: &AdminClient, filter: HistoryFilter) -> Result<Self> {
        filter.validate()?;
        let store = resolve_store(client).await?;

        let query = filter.to_query();
        let (inventory, history) =
            tokio::join!(client.inventory(&store.id), client.inventory_history(&query));

        let products = match inventory {
            Ok(entries) => distinct_products(&entries),
            Err(e) => {
                warn!(error = %e, store_id = %store.id, "Failed to load product filter options");
                Vec::new()
            }
        };
        let history = history?;

        info!(
            store = %store.name,
            entries = history.data.len(),
            "Inventory history loaded"
        );

        Ok(Self {
            store,
            products,
            entries: history.data,
            pagination: history.pagination,
            filter,
        })
    }

    /// Footer sentence describing what is shown, `None` when nothing is.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        let noun = if self.entries.len() == 1 {
            "transaction"
        } else {
            "transactions"
        };
        let mut summary = format!(
            "Showing {} inventory {noun} for {}",
            self.entries.len(),
            self.store.name
        );
        if let Some(action) = self.filter.action {
            summary.push_str(&format!(" with action: {action}"));
        }
        if self.filter.product.is_some() {
            summary.push_str(" for selected product");
        }
        if self.filter.start_date.is_some() || self.filter.end_date.is_some() {
            summary.push_str(" within date range");
        }
        Some(summary)
    }

    /// Hint shown when no entries match.
    #[must_use]
    pub const fn empty_message(&self) -> &'static str {
        if self.filter.is_active() {
            "Try adjusting your filters"
        } else {
            "No inventory changes have been made yet"
        }
    }
}
