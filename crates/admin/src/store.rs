//! Store detail view.

use pasar_core::StoreId;
use tracing::instrument;

use crate::api::{AdminApiError, AdminClient};
use crate::error::{AdminError, Result};
use crate::types::StoreDetail;

/// Load a store with its address and stocked products.
///
/// # Errors
///
/// Returns [`AdminError::StoreNotFound`] if the store does not exist, or an
/// API error if the request fails.
#[instrument(skip(client), fields(store_id = %id))]
pub async fn load_store(client: &AdminClient, id: &StoreId) -> Result<StoreDetail> {
    match client.store(id).await {
        Ok(store) => Ok(store),
        Err(AdminApiError::NotFound(_)) => Err(AdminError::StoreNotFound(id.clone())),
        Err(e) => Err(e.into()),
    }
}
