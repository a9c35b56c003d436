//! Store-admin view errors.

use chrono::NaiveDate;
use pasar_core::StoreId;
use thiserror::Error;

use crate::api::AdminApiError;

/// Errors from the store-admin views.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Admin API operation failed.
    #[error("API error: {0}")]
    Api(#[from] AdminApiError),

    /// The signed-in user does not administer any store.
    #[error("You are not assigned to any store")]
    NoStoreAssigned,

    /// The store does not exist.
    #[error("Store not found: {0}")]
    StoreNotFound(StoreId),

    /// The history filter is inconsistent.
    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),
}

/// Reasons a history filter is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("date {0} is in the future")]
    FutureDate(NaiveDate),
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;
