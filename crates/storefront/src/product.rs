//! Product detail page: quantity selection, add to cart, buy now.

use pasar_core::ProductId;
use tracing::{info, instrument};

use crate::api::{ApiClient, ProductDetail};
use crate::error::{Result, StorefrontError, add_breadcrumb, capture_failure};
use crate::navigation::Destination;

/// Notice shown after a successful add to cart.
pub const ADDED_TO_CART_NOTICE: &str = "Successfully added to cart!";

/// A loaded product page and the quantity the customer has chosen.
pub struct ProductPage {
    client: ApiClient,
    product: ProductDetail,
    quantity: u32,
}

impl ProductPage {
    /// Fetch a product and open its page with a quantity of one.
    ///
    /// # Errors
    ///
    /// Returns an error if the product cannot be loaded.
    #[instrument(skip(client), fields(product_id = %id))]
    pub async fn load(client: ApiClient, id: &ProductId) -> Result<Self> {
        let product = client.product(id).await?;
        Ok(Self::new(client, product))
    }

    /// Open a page for an already fetched product.
    #[must_use]
    pub const fn new(client: ApiClient, product: ProductDetail) -> Self {
        Self {
            client,
            product,
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn product(&self) -> &ProductDetail {
        &self.product
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Set the quantity, clamped to `[1, stock]`.
    ///
    /// Out-of-stock products stay at one; purchase is refused instead.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.min(self.product.stock).max(1);
    }

    pub fn increment(&mut self) {
        self.set_quantity(self.quantity.saturating_add(1));
    }

    pub fn decrement(&mut self) {
        self.set_quantity(self.quantity.saturating_sub(1));
    }

    #[must_use]
    pub const fn can_decrement(&self) -> bool {
        self.quantity > 1
    }

    #[must_use]
    pub const fn can_increment(&self) -> bool {
        self.product.stock > 0 && self.quantity < self.product.stock
    }

    /// Whether the product can be added to the cart at all.
    #[must_use]
    pub const fn can_purchase(&self) -> bool {
        self.product.stock > 0
    }

    /// URL of the main product image.
    #[must_use]
    pub fn display_image(&self) -> Option<&str> {
        self.product
            .image_preview
            .first()
            .map(|img| img.image_url.as_str())
    }

    /// Add the chosen quantity to the cart.
    ///
    /// Returns the notice to show the customer.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::OutOfStock`] without calling the cart
    /// service when nothing is in stock, or an API error if the cart service
    /// rejects the request.
    #[instrument(skip(self), fields(product_id = %self.product.id, quantity = self.quantity))]
    pub async fn add_to_cart(&self) -> Result<&'static str> {
        if !self.can_purchase() {
            return Err(StorefrontError::OutOfStock);
        }

        add_breadcrumb(
            "cart",
            "Add to cart",
            Some(&[("product_id", self.product.id.as_str())]),
        );

        if let Err(e) = self
            .client
            .add_to_cart(&self.product.id, self.quantity)
            .await
        {
            capture_failure(&e, "Add to cart failed");
            return Err(e.into());
        }

        info!("Added to cart");
        Ok(ADDED_TO_CART_NOTICE)
    }

    /// Add the chosen quantity to the cart and go to checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the add to cart fails; the customer stays on the
    /// product page.
    pub async fn buy_now(&self) -> Result<Destination> {
        self.add_to_cart().await?;
        Ok(Destination::Checkout)
    }
}
