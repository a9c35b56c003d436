//! Product endpoints.

use pasar_core::ProductId;
use tracing::instrument;

use super::types::{AddToCartRequest, ProductDetail};
use super::{ApiClient, ApiError, DataEnvelope};

const PRODUCTS_PATH: &str = "/api/v1/products";
const ADD_TO_CART_PATH: &str = "/api/v1/cart";

impl ApiClient {
    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<ProductDetail, ApiError> {
        let envelope: DataEnvelope<Option<ProductDetail>> = self
            .get_json(&format!("{PRODUCTS_PATH}/{id}"), &[])
            .await?;
        envelope.data.ok_or(ApiError::MissingField("data"))
    }

    /// Add units of a product to the user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        let request = self
            .http()
            .post(self.endpoint(ADD_TO_CART_PATH)?)
            .json(&AddToCartRequest {
                product_id,
                quantity,
            });
        Self::send(request).await?;
        Ok(())
    }
}
