//! Services the checkout controller calls.

use std::future::Future;

use crate::api::{
    ApiClient, ApiError, CartLine, OrderSubmission, QuoteParams, SavedAddress, ShippingQuotes,
    SubmissionReceipt,
};

/// Cart, address book, shipping-rate and order services.
///
/// Implemented by [`ApiClient`]; tests substitute in-memory fakes.
pub trait CheckoutBackend {
    /// The authenticated user's cart.
    fn fetch_cart(&self) -> impl Future<Output = Result<Vec<CartLine>, ApiError>> + Send;

    /// The user's saved addresses.
    fn fetch_addresses(&self) -> impl Future<Output = Result<Vec<SavedAddress>, ApiError>> + Send;

    /// Shipping quotes for a parcel.
    fn fetch_quotes(
        &self,
        params: &QuoteParams,
    ) -> impl Future<Output = Result<ShippingQuotes, ApiError>> + Send;

    /// Submit an order.
    fn submit_order(
        &self,
        submission: &OrderSubmission,
    ) -> impl Future<Output = Result<SubmissionReceipt, ApiError>> + Send;
}

impl CheckoutBackend for ApiClient {
    async fn fetch_cart(&self) -> Result<Vec<CartLine>, ApiError> {
        self.cart().await
    }

    async fn fetch_addresses(&self) -> Result<Vec<SavedAddress>, ApiError> {
        self.addresses().await
    }

    async fn fetch_quotes(&self, params: &QuoteParams) -> Result<ShippingQuotes, ApiError> {
        self.shipping_quotes(params).await
    }

    async fn submit_order(
        &self,
        submission: &OrderSubmission,
    ) -> Result<SubmissionReceipt, ApiError> {
        self.submit_checkout(submission).await
    }
}
