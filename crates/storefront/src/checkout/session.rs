//! In-memory checkout state.
//!
//! Everything here is synchronous. The controller performs I/O and feeds
//! the results in; the rules about what a selection invalidates, when a
//! shipping quote request is due and whether an order may be submitted live
//! in [`CheckoutSession`].

use pasar_core::{AddressId, DestinationId, PaymentMethod, Rupiah};
use rust_decimal::Decimal;
use tracing::debug;

use super::payment::PaymentOutcome;
use crate::api::{
    CartLine, OrderSubmission, ProofFile, QuoteParams, SavedAddress, ShippingQuote, ShippingQuotes,
};
use crate::error::{Result, StorefrontError};

/// Shipping address form shown on the checkout page.
///
/// Filled only by selecting a saved address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressForm {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

impl AddressForm {
    /// Form contents for a saved address.
    #[must_use]
    pub fn from_saved(saved: &SavedAddress) -> Self {
        Self {
            full_name: saved.recipient.clone(),
            address: saved.address.address.clone(),
            city: saved.address.city.clone(),
            province: saved.address.province.clone(),
            postal_code: saved.address.postal_code.clone(),
        }
    }

    /// Whether every field holds non-blank text.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.full_name,
            &self.address,
            &self.city,
            &self.province,
            &self.postal_code,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// A shipping quote request issued by the session.
///
/// The generation identifies the request; only the response to the most
/// recently issued ticket is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteTicket {
    pub generation: u64,
    pub params: QuoteParams,
}

/// Why an order cannot be submitted yet.
///
/// Checked in declaration order; the first unmet condition wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocker {
    IncompleteAddress,
    NoShippingOption,
    MissingProof,
    WidgetNotReady,
}

impl SubmitBlocker {
    /// Message shown to the customer.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::IncompleteAddress => "Please complete your shipping address.",
            Self::NoShippingOption => "Please select a shipping method.",
            Self::MissingProof => "Please upload your payment proof.",
            Self::WidgetNotReady => {
                "The payment service is still loading. Please try again in a moment."
            }
        }
    }
}

impl std::fmt::Display for SubmitBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.user_message())
    }
}

impl std::error::Error for SubmitBlocker {}

/// Checkout state for one user session.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    origin: DestinationId,
    cart: Vec<CartLine>,
    addresses: Vec<SavedAddress>,
    form: AddressForm,
    selected_address: Option<AddressId>,
    quotes: ShippingQuotes,
    selected_quote: Option<ShippingQuote>,
    payment_method: PaymentMethod,
    proof: Option<ProofFile>,
    quote_generation: u64,
    last_payment: Option<PaymentOutcome>,
}

impl CheckoutSession {
    /// Create an empty session shipping from `origin`.
    #[must_use]
    pub fn new(origin: DestinationId) -> Self {
        Self {
            origin,
            cart: Vec::new(),
            addresses: Vec::new(),
            form: AddressForm::default(),
            selected_address: None,
            quotes: ShippingQuotes::default(),
            selected_quote: None,
            payment_method: PaymentMethod::default(),
            proof: None,
            quote_generation: 0,
            last_payment: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    #[must_use]
    pub fn addresses(&self) -> &[SavedAddress] {
        &self.addresses
    }

    #[must_use]
    pub const fn form(&self) -> &AddressForm {
        &self.form
    }

    #[must_use]
    pub const fn selected_address_id(&self) -> Option<&AddressId> {
        self.selected_address.as_ref()
    }

    /// The selected saved address, if it is still in the address book.
    #[must_use]
    pub fn selected_address(&self) -> Option<&SavedAddress> {
        let id = self.selected_address.as_ref()?;
        self.addresses.iter().find(|a| &a.id == id)
    }

    #[must_use]
    pub const fn quotes(&self) -> &ShippingQuotes {
        &self.quotes
    }

    #[must_use]
    pub const fn selected_quote(&self) -> Option<&ShippingQuote> {
        self.selected_quote.as_ref()
    }

    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    #[must_use]
    pub const fn proof(&self) -> Option<&ProofFile> {
        self.proof.as_ref()
    }

    /// How the last hosted payment ended, if one was attempted.
    #[must_use]
    pub const fn last_payment_outcome(&self) -> Option<&PaymentOutcome> {
        self.last_payment.as_ref()
    }

    // =========================================================================
    // Fetched data
    // =========================================================================

    /// Replace the cart snapshot.
    pub fn set_cart(&mut self, cart: Vec<CartLine>) {
        self.cart = cart;
    }

    /// Replace the address book.
    ///
    /// When nothing is selected yet and an address is flagged primary, that
    /// address becomes the selection.
    pub fn set_addresses(&mut self, addresses: Vec<SavedAddress>) {
        self.addresses = addresses;

        if self.selected_address.is_none()
            && let Some(primary) = self.addresses.iter().find(|a| a.is_primary)
        {
            let id = primary.id.clone();
            self.apply_address(id);
        }
    }

    // =========================================================================
    // Selections
    // =========================================================================

    /// Select a saved address and fill the form from it.
    ///
    /// Choosing a different address drops the selected shipping quote and
    /// the quotes fetched for the previous destination.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownAddress`] if the ID is not in the
    /// address book.
    pub fn select_address(&mut self, id: &AddressId) -> Result<()> {
        if !self.addresses.iter().any(|a| &a.id == id) {
            return Err(StorefrontError::UnknownAddress(id.clone()));
        }
        self.apply_address(id.clone());
        Ok(())
    }

    fn apply_address(&mut self, id: AddressId) {
        if let Some(saved) = self.addresses.iter().find(|a| a.id == id) {
            self.form = AddressForm::from_saved(saved);
        }

        if self.selected_address.as_ref() != Some(&id) {
            self.selected_quote = None;
            self.quotes = ShippingQuotes::default();
        }
        self.selected_address = Some(id);
    }

    /// Select a shipping quote by carrier and service.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownShippingQuote`] if the current quote
    /// set has no such pair.
    pub fn select_quote(&mut self, carrier: &str, service: &str) -> Result<()> {
        let quote = self.quotes.find(carrier, service).cloned().ok_or_else(|| {
            StorefrontError::UnknownShippingQuote {
                carrier: carrier.to_string(),
                service: service.to_string(),
            }
        })?;
        self.selected_quote = Some(quote);
        Ok(())
    }

    /// Choose how the order is paid. Switching to hosted payment drops any
    /// attached proof file.
    pub fn select_payment_method(&mut self, method: PaymentMethod) {
        if method == PaymentMethod::Hosted {
            self.proof = None;
        }
        self.payment_method = method;
    }

    /// Attach a proof of payment, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::ProofRequiresManualPayment`] unless manual
    /// transfer is the selected payment method.
    pub fn attach_proof(&mut self, proof: ProofFile) -> Result<()> {
        if self.payment_method != PaymentMethod::Manual {
            return Err(StorefrontError::ProofRequiresManualPayment);
        }
        self.proof = Some(proof);
        Ok(())
    }

    // =========================================================================
    // Shipping quotes
    // =========================================================================

    /// Issue a quote request if one is due.
    ///
    /// A request is due when a selected address is in the address book and
    /// the cart is non-empty. Each ticket supersedes every earlier one.
    pub fn begin_quote_request(&mut self) -> Option<QuoteTicket> {
        if self.cart.is_empty() {
            return None;
        }
        let destination = self.selected_address()?.address.destination_id.clone();

        self.quote_generation += 1;
        Some(QuoteTicket {
            generation: self.quote_generation,
            params: QuoteParams {
                origin: self.origin.clone(),
                destination,
                weight: self.total_weight(),
                item_value: self.subtotal(),
                cash_on_delivery: false,
            },
        })
    }

    /// Apply the quotes answering the ticket with `generation`.
    ///
    /// Returns false and leaves the quote set untouched when a newer ticket
    /// has been issued since.
    pub fn complete_quote_request(&mut self, generation: u64, quotes: ShippingQuotes) -> bool {
        if generation != self.quote_generation {
            debug!(
                generation,
                latest = self.quote_generation,
                "Discarding stale shipping quotes"
            );
            return false;
        }
        self.quotes = quotes;
        true
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Sum of price x quantity over the cart.
    #[must_use]
    pub fn subtotal(&self) -> Rupiah {
        self.cart.iter().map(CartLine::subtotal).sum()
    }

    /// Grand total of the selected quote, zero when none is selected.
    #[must_use]
    pub fn shipping_cost(&self) -> Rupiah {
        self.selected_quote
            .as_ref()
            .map_or(Rupiah::ZERO, |q| q.grand_total)
    }

    #[must_use]
    pub fn grand_total(&self) -> Rupiah {
        self.subtotal() + self.shipping_cost()
    }

    /// Sum of weight x quantity over the cart.
    #[must_use]
    pub fn total_weight(&self) -> Decimal {
        self.cart.iter().map(CartLine::weight).sum()
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Whether the place-order action should be enabled.
    ///
    /// Covers the address and shipping conditions only; payment conditions
    /// are reported when the customer submits.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.form.is_complete() && self.selected_quote.is_some()
    }

    /// Check every submission precondition.
    ///
    /// # Errors
    ///
    /// Returns the first unmet [`SubmitBlocker`].
    pub fn check_submission(&self, widget_ready: bool) -> std::result::Result<(), SubmitBlocker> {
        if !self.form.is_complete() || self.selected_address().is_none() {
            return Err(SubmitBlocker::IncompleteAddress);
        }
        if self.selected_quote.is_none() {
            return Err(SubmitBlocker::NoShippingOption);
        }
        match self.payment_method {
            PaymentMethod::Manual if self.proof.is_none() => Err(SubmitBlocker::MissingProof),
            PaymentMethod::Hosted if !widget_ready => Err(SubmitBlocker::WidgetNotReady),
            _ => Ok(()),
        }
    }

    /// Build the order payload from the current selections.
    ///
    /// The session is not modified, so a failed submission can be retried
    /// as is.
    ///
    /// # Errors
    ///
    /// Returns the first unmet [`SubmitBlocker`].
    pub fn build_submission(
        &self,
        widget_ready: bool,
    ) -> std::result::Result<OrderSubmission, SubmitBlocker> {
        self.check_submission(widget_ready)?;

        let address = self
            .selected_address()
            .cloned()
            .ok_or(SubmitBlocker::IncompleteAddress)?;
        let shipping = self
            .selected_quote
            .clone()
            .ok_or(SubmitBlocker::NoShippingOption)?;

        Ok(OrderSubmission {
            address,
            shipping,
            cart: self.cart.clone(),
            payment_method: self.payment_method,
            proof: match self.payment_method {
                PaymentMethod::Manual => self.proof.clone(),
                PaymentMethod::Hosted => None,
            },
        })
    }

    /// Remember how the hosted payment ended.
    pub fn record_payment_outcome(&mut self, outcome: PaymentOutcome) {
        self.last_payment = Some(outcome);
    }
}
