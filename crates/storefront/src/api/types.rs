//! Wire and domain types for the platform REST API.
//!
//! Field names follow the backend's JSON (`Product`, `Address`,
//! `grandtotal`, ...); the Rust side uses snake case throughout.

use std::collections::BTreeMap;
use std::path::Path;

use pasar_core::{AddressId, CartItemId, DestinationId, PaymentMethod, ProductId, Rupiah};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Types
// =============================================================================

/// One line of the authenticated user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart item ID.
    pub id: CartItemId,
    /// Number of units, always at least one.
    pub quantity: u32,
    /// The product on this line.
    #[serde(rename = "Product")]
    pub product: CartProduct,
    /// Fields the client does not interpret (`productId`, `cartId`, ...),
    /// echoed back in the submitted cart snapshot.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CartLine {
    /// Price of the line (unit price x quantity).
    #[must_use]
    pub fn subtotal(&self) -> Rupiah {
        self.product.price.times(self.quantity)
    }

    /// Shipping weight of the line (unit weight x quantity).
    #[must_use]
    pub fn weight(&self) -> Decimal {
        self.product.weight * Decimal::from(self.quantity)
    }
}

/// Product snapshot embedded in a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    /// Product title.
    pub title: String,
    /// Main image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit price.
    pub price: Rupiah,
    /// Unit shipping weight.
    #[serde(with = "pasar_core::json_number")]
    pub weight: Decimal,
    /// Preview images, first one is shown in listings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_preview: Vec<ImageRef>,
    /// Uninterpreted product fields (`id`, `storeId`, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CartProduct {
    /// URL of the image to display for this product, if any.
    #[must_use]
    pub fn display_image(&self) -> Option<&str> {
        self.image_preview
            .first()
            .map(|img| img.image_url.as_str())
            .or(self.image.as_deref())
    }
}

/// Reference to a hosted image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Image URL.
    pub image_url: String,
}

// =============================================================================
// Address Types
// =============================================================================

/// A shipping address saved in the user's address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAddress {
    /// Address book entry ID.
    pub id: AddressId,
    /// Name of the person receiving the parcel.
    pub recipient: String,
    /// Whether this is the user's primary address.
    #[serde(default)]
    pub is_primary: bool,
    /// The postal address itself.
    #[serde(rename = "Address")]
    pub address: AddressDetails,
    /// Fields the client does not interpret, echoed back on submission.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Postal part of a saved address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDetails {
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Province.
    pub province: String,
    /// Postal code.
    pub postal_code: String,
    /// Shipping-rate service destination for this address.
    pub destination_id: DestinationId,
}

// =============================================================================
// Shipping Types
// =============================================================================

/// One shipping service offered by a carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingQuote {
    /// Carrier name (e.g., "JNE").
    pub shipping_name: String,
    /// Service name (e.g., "REG").
    pub service_name: String,
    /// Total shipping price for the parcel.
    #[serde(rename = "grandtotal")]
    pub grand_total: Rupiah,
    /// Estimated delivery time, free text (e.g., "2-3 day").
    #[serde(default)]
    pub etd: String,
}

impl ShippingQuote {
    /// Whether this quote is the given (carrier, service) pair.
    #[must_use]
    pub fn matches(&self, carrier: &str, service: &str) -> bool {
        self.shipping_name == carrier && self.service_name == service
    }
}

/// Shipping quotes grouped by carrier, as returned by the rate service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShippingQuotes(BTreeMap<String, Vec<ShippingQuote>>);

impl ShippingQuotes {
    /// Build a quote set from carrier groups.
    #[must_use]
    pub fn new(groups: BTreeMap<String, Vec<ShippingQuote>>) -> Self {
        Self(groups)
    }

    /// Find a quote by its (carrier, service) identity.
    #[must_use]
    pub fn find(&self, carrier: &str, service: &str) -> Option<&ShippingQuote> {
        self.iter().find(|quote| quote.matches(carrier, service))
    }

    /// Iterate over every quote of every carrier.
    pub fn iter(&self) -> impl Iterator<Item = &ShippingQuote> {
        self.0.values().flatten()
    }

    /// Iterate over carrier groups.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[ShippingQuote])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Total number of quotes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Returns true if no carrier offered any service.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parameters of a shipping quote request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteParams {
    /// Destination the parcel ships from.
    pub origin: DestinationId,
    /// Destination of the selected address.
    pub destination: DestinationId,
    /// Total parcel weight.
    pub weight: Decimal,
    /// Declared value of the parcel contents.
    pub item_value: Rupiah,
    /// Whether the parcel is cash on delivery.
    pub cash_on_delivery: bool,
}

impl QuoteParams {
    /// Query string pairs understood by the rate service.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("shipper_destination_id", self.origin.to_string()),
            ("receiver_destination_id", self.destination.to_string()),
            ("weight", self.weight.normalize().to_string()),
            ("item_value", self.item_value.amount().normalize().to_string()),
            ("cod", self.cash_on_delivery.to_string()),
        ]
    }
}

// =============================================================================
// Order Submission Types
// =============================================================================

/// A proof-of-payment file for manual bank transfers.
#[derive(Clone, PartialEq, Eq)]
pub struct ProofFile {
    /// Original file name.
    pub file_name: String,
    /// MIME type sent with the file part.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ProofFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ProofFile {
    /// Create a proof file from in-memory contents.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a proof file from disk, guessing its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "payment-proof".to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self {
            content_type: content_type_for(path).to_string(),
            file_name,
            bytes,
        })
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// The shipping option echoed to the checkout service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedShipping<'a> {
    pub shipping_name: &'a str,
    pub service_name: &'a str,
    pub grand_total: Rupiah,
    pub etd: &'a str,
}

impl<'a> From<&'a ShippingQuote> for SelectedShipping<'a> {
    fn from(quote: &'a ShippingQuote) -> Self {
        Self {
            shipping_name: &quote.shipping_name,
            service_name: &quote.service_name,
            grand_total: quote.grand_total,
            etd: &quote.etd,
        }
    }
}

/// Everything the checkout service needs to create an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    /// The selected saved address.
    pub address: SavedAddress,
    /// The selected shipping quote.
    pub shipping: ShippingQuote,
    /// Snapshot of the cart at submission time.
    pub cart: Vec<CartLine>,
    /// Chosen payment method.
    pub payment_method: PaymentMethod,
    /// Proof of payment (manual transfers only).
    pub proof: Option<ProofFile>,
}

/// Token identifying a hosted-payment transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionToken(String);

impl TransactionToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the checkout service returned for an accepted submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Hosted-payment token, present for hosted submissions.
    pub transaction_token: Option<TransactionToken>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmissionResponse {
    #[serde(default)]
    pub data: Option<SubmissionData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmissionData {
    #[serde(default)]
    pub midtrans_transaction: Option<HostedTransaction>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HostedTransaction {
    #[serde(default)]
    pub token: Option<TransactionToken>,
}

impl From<SubmissionResponse> for SubmissionReceipt {
    fn from(response: SubmissionResponse) -> Self {
        Self {
            transaction_token: response
                .data
                .and_then(|d| d.midtrans_transaction)
                .and_then(|t| t.token),
        }
    }
}

// =============================================================================
// Product Types
// =============================================================================

/// A product as shown on its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Rupiah,
    /// Units in stock.
    #[serde(default)]
    pub stock: u32,
    /// Preview images.
    #[serde(default)]
    pub image_preview: Vec<ImageRef>,
    /// Content (gallery) images.
    #[serde(default)]
    pub image_content: Vec<ImageRef>,
}

/// Body of an add-to-cart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest<'a> {
    pub product_id: &'a ProductId,
    pub quantity: u32,
}
