//! Checkout endpoints: cart, address book, shipping quotes, order submission.

use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument};

use super::types::{
    CartLine, OrderSubmission, QuoteParams, SavedAddress, SelectedShipping, ShippingQuotes,
    SubmissionReceipt, SubmissionResponse,
};
use super::{ApiClient, ApiError, DataEnvelope};

const CART_PATH: &str = "/api/v1/cart/index";
const ADDRESSES_PATH: &str = "/api/v1/addresses";
const SHIPPING_QUOTES_PATH: &str = "/api/v1/rajaongkir/calculate";
const CHECKOUT_PATH: &str = "/api/v1/checkout/manual";

impl ApiClient {
    /// Get the authenticated user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the session is missing or
    /// expired, or another error if the request fails.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<Vec<CartLine>, ApiError> {
        let envelope: DataEnvelope<Vec<CartLine>> = self.get_json(CART_PATH, &[]).await?;
        debug!(lines = envelope.data.len(), "Fetched cart");
        Ok(envelope.data)
    }

    /// Get the user's saved shipping addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn addresses(&self) -> Result<Vec<SavedAddress>, ApiError> {
        let addresses: Vec<SavedAddress> = self.get_json(ADDRESSES_PATH, &[]).await?;
        debug!(count = addresses.len(), "Fetched saved addresses");
        Ok(addresses)
    }

    /// Get shipping quotes for a parcel.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response carries no
    /// quote data.
    #[instrument(skip(self), fields(destination = %params.destination, weight = %params.weight))]
    pub async fn shipping_quotes(&self, params: &QuoteParams) -> Result<ShippingQuotes, ApiError> {
        let envelope: DataEnvelope<Option<ShippingQuotes>> =
            self.get_json(SHIPPING_QUOTES_PATH, &params.to_query()).await?;
        envelope.data.ok_or(ApiError::MissingField("data"))
    }

    /// Submit an order to the checkout service.
    ///
    /// Sends a multipart form with the selected address, shipping option,
    /// cart snapshot and payment method, plus the proof file for manual
    /// transfers.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded or the service does
    /// not accept the order.
    #[instrument(skip(self, submission), fields(method = %submission.payment_method))]
    pub async fn submit_checkout(
        &self,
        submission: &OrderSubmission,
    ) -> Result<SubmissionReceipt, ApiError> {
        let form = checkout_form(submission)?;
        let request = self.http().post(self.endpoint(CHECKOUT_PATH)?).multipart(form);

        let body = Self::send(request).await?;
        if body.trim().is_empty() {
            return Ok(SubmissionReceipt::default());
        }
        let response: SubmissionResponse = Self::parse(&body)?;
        Ok(response.into())
    }
}

/// Build the multipart body for an order submission.
fn checkout_form(submission: &OrderSubmission) -> Result<Form, ApiError> {
    let mut form = Form::new();

    if let Some(proof) = &submission.proof {
        let part = Part::bytes(proof.bytes.clone())
            .file_name(proof.file_name.clone())
            .mime_str(&proof.content_type)?;
        form = form.part("paymentProof", part);
    }

    Ok(form
        .text("address", serde_json::to_string(&submission.address)?)
        .text(
            "shippingOptions",
            serde_json::to_string(&SelectedShipping::from(&submission.shipping))?,
        )
        .text("cartItems", serde_json::to_string(&submission.cart)?)
        .text("paymentMethod", submission.payment_method.as_str()))
}
