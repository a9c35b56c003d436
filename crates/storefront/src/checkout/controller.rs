//! Checkout flow controller.
//!
//! Drives a [`CheckoutSession`] through initialization, address and
//! shipping selection, payment method selection and order submission,
//! calling the injected [`CheckoutBackend`] and [`PaymentWidget`].

use pasar_core::{AddressId, PaymentMethod};
use tracing::{info, instrument, warn};

use super::backend::CheckoutBackend;
use super::payment::{PaymentOutcome, PaymentWidget};
use super::session::{CheckoutSession, SubmitBlocker};
use crate::api::{ApiError, ProofFile, TransactionToken};
use crate::config::{DEFAULT_PREFERRED_PAYMENT_TYPE, ShippingConfig};
use crate::error::{Result, add_breadcrumb, capture_failure};
use crate::navigation::Destination;

/// Message shown for every failed order submission.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to submit your order. Please try again.";

/// Result of loading the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Checkout data loaded; missing pieces were logged and left empty.
    Ready,
    /// The user must go elsewhere first (expired session).
    Redirect(Destination),
}

/// Result of a submission attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// A precondition failed; nothing was sent.
    Blocked(SubmitBlocker),
    /// Order placed; send the user to this page.
    Redirect(Destination),
    /// Order placed and handed to the payment widget.
    Payment {
        token: TransactionToken,
        outcome: PaymentOutcome,
    },
    /// The checkout service did not accept the order.
    Failed(ApiError),
}

impl SubmitOutcome {
    /// Message to show the customer, if the attempt did not go through.
    #[must_use]
    pub const fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Blocked(blocker) => Some(blocker.user_message()),
            Self::Failed(_) => Some(GENERIC_FAILURE_MESSAGE),
            Self::Redirect(_) | Self::Payment { .. } => None,
        }
    }
}

/// Checkout flow for one user session.
pub struct CheckoutController<B, W> {
    backend: B,
    widget: W,
    session: CheckoutSession,
    preferred_payment_type: String,
}

impl<B: CheckoutBackend, W: PaymentWidget> CheckoutController<B, W> {
    /// Create a controller with an empty session.
    #[must_use]
    pub fn new(backend: B, widget: W, shipping: &ShippingConfig) -> Self {
        Self {
            backend,
            widget,
            session: CheckoutSession::new(shipping.origin.clone()),
            preferred_payment_type: DEFAULT_PREFERRED_PAYMENT_TYPE.to_string(),
        }
    }

    /// Instrument preselected when the payment widget opens.
    #[must_use]
    pub fn with_preferred_payment_type(mut self, payment_type: impl Into<String>) -> Self {
        self.preferred_payment_type = payment_type.into();
        self
    }

    #[must_use]
    pub const fn session(&self) -> &CheckoutSession {
        &self.session
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn widget(&self) -> &W {
        &self.widget
    }

    /// Load the cart, address book and payment widget, then request
    /// shipping quotes for the primary address.
    ///
    /// Fetch failures other than an expired session are logged and leave
    /// the affected part of the session empty.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> InitOutcome {
        match self.backend.fetch_cart().await {
            Ok(cart) => self.session.set_cart(cart),
            Err(e) if e.is_unauthorized() => {
                info!("Session is not authenticated, redirecting to login");
                return InitOutcome::Redirect(Destination::Login);
            }
            Err(e) => warn!(error = %e, "Failed to load cart"),
        }

        match self.backend.fetch_addresses().await {
            Ok(addresses) => self.session.set_addresses(addresses),
            Err(e) => warn!(error = %e, "Failed to load saved addresses"),
        }

        if let Err(e) = self.widget.load().await {
            warn!(error = %e, "Failed to load payment widget");
        }

        self.refresh_quotes().await;

        info!(
            cart_lines = self.session.cart().len(),
            addresses = self.session.addresses().len(),
            "Checkout initialized"
        );
        InitOutcome::Ready
    }

    /// Request shipping quotes for the current address and cart, if due.
    ///
    /// A failed request leaves the current quotes in place.
    pub async fn refresh_quotes(&mut self) {
        let Some(ticket) = self.session.begin_quote_request() else {
            return;
        };

        match self.backend.fetch_quotes(&ticket.params).await {
            Ok(quotes) => {
                info!(
                    destination = %ticket.params.destination,
                    count = quotes.len(),
                    "Shipping quotes loaded"
                );
                self.session.complete_quote_request(ticket.generation, quotes);
            }
            Err(e) => warn!(error = %e, "Failed to load shipping quotes"),
        }
    }

    /// Select a saved address and request quotes for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not in the address book.
    pub async fn select_address(&mut self, id: &AddressId) -> Result<()> {
        self.session.select_address(id)?;
        add_breadcrumb("checkout", "Selected address", Some(&[("address_id", id.as_str())]));
        self.refresh_quotes().await;
        Ok(())
    }

    /// Select a shipping quote by carrier and service.
    ///
    /// # Errors
    ///
    /// Returns an error if the current quotes have no such pair.
    pub fn select_quote(&mut self, carrier: &str, service: &str) -> Result<()> {
        self.session.select_quote(carrier, service)?;
        add_breadcrumb(
            "checkout",
            "Selected shipping",
            Some(&[("carrier", carrier), ("service", service)]),
        );
        Ok(())
    }

    pub fn select_payment_method(&mut self, method: PaymentMethod) {
        self.session.select_payment_method(method);
    }

    /// Attach a proof of payment for a manual transfer.
    ///
    /// # Errors
    ///
    /// Returns an error unless manual transfer is selected.
    pub fn attach_proof(&mut self, proof: ProofFile) -> Result<()> {
        self.session.attach_proof(proof)
    }

    /// Submit the order.
    ///
    /// Nothing is sent when a precondition fails. A rejected submission
    /// leaves the session as it was so the customer can retry.
    #[instrument(skip(self), fields(method = %self.session.payment_method()))]
    pub async fn submit(&mut self) -> SubmitOutcome {
        let submission = match self.session.build_submission(self.widget.is_ready()) {
            Ok(submission) => submission,
            Err(blocker) => {
                info!(reason = %blocker, "Submission blocked");
                return SubmitOutcome::Blocked(blocker);
            }
        };

        add_breadcrumb(
            "checkout",
            "Submitting order",
            Some(&[("payment_method", submission.payment_method.as_str())]),
        );

        let receipt = match self.backend.submit_order(&submission).await {
            Ok(receipt) => receipt,
            Err(e) => {
                capture_failure(&e, "Order submission failed");
                return SubmitOutcome::Failed(e);
            }
        };

        match submission.payment_method {
            PaymentMethod::Manual => {
                info!("Manual transfer order placed");
                SubmitOutcome::Redirect(Destination::OrderHistory)
            }
            PaymentMethod::Hosted => {
                let Some(token) = receipt.transaction_token else {
                    let e = ApiError::MissingField("data.midtransTransaction.token");
                    capture_failure(&e, "Order submission failed");
                    return SubmitOutcome::Failed(e);
                };

                let outcome = self.widget.pay(&token, &self.preferred_payment_type).await;
                info!(outcome = outcome.label(), "Hosted payment finished");
                self.session.record_payment_outcome(outcome.clone());
                SubmitOutcome::Payment { token, outcome }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use pasar_core::Rupiah;

    use super::*;
    use crate::api::{
        CartLine, OrderSubmission, QuoteParams, SavedAddress, ShippingQuotes, SubmissionReceipt,
    };
    use crate::checkout::payment::{PaymentResult, WidgetError};
    use crate::checkout::session::tests::{cart_line, quote, quotes, saved_address};

    #[derive(Default)]
    struct FakeBackend {
        cart: Option<Vec<CartLine>>,
        cart_status: Option<u16>,
        addresses: Vec<SavedAddress>,
        quotes: ShippingQuotes,
        fail_quotes: AtomicBool,
        submit_status: Option<u16>,
        token: Option<&'static str>,
        address_calls: AtomicUsize,
        quote_calls: Mutex<Vec<QuoteParams>>,
        submissions: Mutex<Vec<OrderSubmission>>,
    }

    fn api_error(status: u16) -> ApiError {
        if status == 401 || status == 403 {
            ApiError::Unauthorized(status)
        } else {
            ApiError::Api {
                status,
                message: "boom".to_string(),
            }
        }
    }

    impl CheckoutBackend for FakeBackend {
        async fn fetch_cart(&self) -> std::result::Result<Vec<CartLine>, ApiError> {
            match self.cart_status {
                Some(status) => Err(api_error(status)),
                None => Ok(self.cart.clone().unwrap_or_default()),
            }
        }

        async fn fetch_addresses(&self) -> std::result::Result<Vec<SavedAddress>, ApiError> {
            self.address_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.addresses.clone())
        }

        async fn fetch_quotes(
            &self,
            params: &QuoteParams,
        ) -> std::result::Result<ShippingQuotes, ApiError> {
            self.quote_calls.lock().unwrap().push(params.clone());
            if self.fail_quotes.load(Ordering::SeqCst) {
                return Err(api_error(502));
            }
            Ok(self.quotes.clone())
        }

        async fn submit_order(
            &self,
            submission: &OrderSubmission,
        ) -> std::result::Result<SubmissionReceipt, ApiError> {
            self.submissions.lock().unwrap().push(submission.clone());
            if let Some(status) = self.submit_status {
                return Err(api_error(status));
            }
            Ok(SubmissionReceipt {
                transaction_token: self.token.map(TransactionToken::new),
            })
        }
    }

    #[derive(Default)]
    struct FakeWidget {
        fail_load: bool,
        ready: AtomicBool,
        paid: Mutex<Vec<(String, String)>>,
    }

    impl PaymentWidget for FakeWidget {
        fn is_ready(&self) -> bool {
            self.ready.load(Ordering::SeqCst)
        }

        async fn load(&self) -> std::result::Result<(), WidgetError> {
            if self.fail_load {
                return Err(WidgetError::ScriptUnavailable(503));
            }
            self.ready.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn pay(&self, token: &TransactionToken, preferred: &str) -> PaymentOutcome {
            self.paid
                .lock()
                .unwrap()
                .push((token.to_string(), preferred.to_string()));
            PaymentOutcome::Success(PaymentResult::default())
        }
    }

    fn backend() -> FakeBackend {
        FakeBackend {
            cart: Some(vec![cart_line("c1", 100_000, 1, 2)]),
            addresses: vec![saved_address("a1", "D1", true), saved_address("a2", "D2", false)],
            quotes: quotes(vec![quote("JNE", "REG", 15_000)]),
            ..FakeBackend::default()
        }
    }

    fn controller(
        backend: FakeBackend,
        widget: FakeWidget,
    ) -> CheckoutController<FakeBackend, FakeWidget> {
        CheckoutController::new(backend, widget, &ShippingConfig::default())
    }

    #[tokio::test]
    async fn test_initialize_selects_primary_and_fetches_quotes() {
        let mut c = controller(backend(), FakeWidget::default());

        assert_eq!(c.initialize().await, InitOutcome::Ready);

        assert_eq!(c.session().selected_address_id().unwrap().as_str(), "a1");
        assert!(c.widget().is_ready());
        let calls = c.backend().quote_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].destination.as_str(), "D1");
        assert_eq!(calls[0].origin.as_str(), "501");
        assert_eq!(calls[0].item_value, Rupiah::from_whole(200_000));
        assert_eq!(c.session().quotes().len(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_cart_redirects_to_login() {
        let backend = FakeBackend {
            cart_status: Some(401),
            ..backend()
        };
        let mut c = controller(backend, FakeWidget::default());

        assert_eq!(
            c.initialize().await,
            InitOutcome::Redirect(Destination::Login)
        );
        assert_eq!(c.backend().address_calls.load(Ordering::SeqCst), 0);
        assert!(c.backend().quote_calls.lock().unwrap().is_empty());
        assert!(!c.widget().is_ready());
    }

    #[tokio::test]
    async fn test_cart_failure_leaves_cart_empty() {
        let backend = FakeBackend {
            cart_status: Some(500),
            ..backend()
        };
        let mut c = controller(backend, FakeWidget::default());

        assert_eq!(c.initialize().await, InitOutcome::Ready);
        assert!(c.session().cart().is_empty());
        assert_eq!(c.session().addresses().len(), 2);
        // No quote request without cart contents
        assert!(c.backend().quote_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_new_address_triggers_fresh_quote_request() {
        let mut c = controller(backend(), FakeWidget::default());
        c.initialize().await;
        c.select_quote("JNE", "REG").unwrap();

        c.select_address(&AddressId::new("a2")).await.unwrap();

        let calls = c.backend().quote_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].destination.as_str(), "D2");
        assert!(c.session().selected_quote().is_none());
        assert_eq!(c.session().form().full_name, "Recipient a2");
    }

    #[tokio::test]
    async fn test_quote_failure_keeps_checkout_usable() {
        let backend = FakeBackend {
            fail_quotes: AtomicBool::new(true),
            ..backend()
        };
        let mut c = controller(backend, FakeWidget::default());

        assert_eq!(c.initialize().await, InitOutcome::Ready);
        assert_eq!(c.backend().quote_calls.lock().unwrap().len(), 1);
        assert!(c.session().quotes().is_empty());
        assert_eq!(c.session().selected_address_id().unwrap().as_str(), "a1");

        let outcome = c.submit().await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Blocked(SubmitBlocker::NoShippingOption)
        ));
        assert!(c.backend().submissions.lock().unwrap().is_empty());

        // A later request for the same address goes through
        c.backend().fail_quotes.store(false, Ordering::SeqCst);
        c.refresh_quotes().await;
        assert_eq!(c.session().quotes().len(), 1);
        c.select_quote("JNE", "REG").unwrap();
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_loaded_quotes() {
        let mut c = controller(backend(), FakeWidget::default());
        c.initialize().await;
        c.select_quote("JNE", "REG").unwrap();

        c.backend().fail_quotes.store(true, Ordering::SeqCst);
        c.refresh_quotes().await;

        assert_eq!(c.session().quotes().len(), 1);
        assert_eq!(c.session().selected_quote().unwrap().shipping_name, "JNE");
    }

    #[tokio::test]
    async fn test_submit_blocked_without_network_call() {
        let mut c = controller(backend(), FakeWidget::default());
        c.initialize().await;

        let outcome = c.submit().await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Blocked(SubmitBlocker::NoShippingOption)
        ));
        assert_eq!(outcome.user_message(), Some("Please select a shipping method."));

        c.select_quote("JNE", "REG").unwrap();
        c.select_payment_method(PaymentMethod::Manual);
        let outcome = c.submit().await;
        assert_eq!(outcome.user_message(), Some("Please upload your payment proof."));

        assert!(c.backend().submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hosted_blocked_until_widget_ready() {
        let widget = FakeWidget {
            fail_load: true,
            ..FakeWidget::default()
        };
        let mut c = controller(backend(), widget);
        c.initialize().await;
        c.select_quote("JNE", "REG").unwrap();

        let outcome = c.submit().await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Blocked(SubmitBlocker::WidgetNotReady)
        ));
        assert!(c.backend().submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_manual_submission_redirects_to_order_history() {
        let mut c = controller(backend(), FakeWidget::default());
        c.initialize().await;
        c.select_quote("JNE", "REG").unwrap();
        c.select_payment_method(PaymentMethod::Manual);
        c.attach_proof(ProofFile::new("proof.png", "image/png", vec![1, 2]))
            .unwrap();

        assert_eq!(c.session().grand_total(), Rupiah::from_whole(215_000));
        let outcome = c.submit().await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Redirect(Destination::OrderHistory)
        ));
        let submissions = c.backend().submissions.lock().unwrap().clone();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].payment_method, PaymentMethod::Manual);
        assert!(submissions[0].proof.is_some());
    }

    #[tokio::test]
    async fn test_hosted_submission_invokes_widget_with_token() {
        let backend = FakeBackend {
            token: Some("snap-token-1"),
            ..backend()
        };
        let mut c = controller(backend, FakeWidget::default()).with_preferred_payment_type("gopay");
        c.initialize().await;
        c.select_quote("JNE", "REG").unwrap();

        let outcome = c.submit().await;

        let SubmitOutcome::Payment { token, outcome } = outcome else {
            panic!("expected payment outcome");
        };
        assert_eq!(token.as_str(), "snap-token-1");
        assert_eq!(outcome.label(), "success");
        assert_eq!(
            c.widget().paid.lock().unwrap().clone(),
            vec![("snap-token-1".to_string(), "gopay".to_string())]
        );
        assert_eq!(c.session().last_payment_outcome().unwrap().label(), "success");
    }

    #[tokio::test]
    async fn test_hosted_submission_without_token_fails() {
        let mut c = controller(backend(), FakeWidget::default());
        c.initialize().await;
        c.select_quote("JNE", "REG").unwrap();

        let outcome = c.submit().await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(ApiError::MissingField(_))
        ));
        assert!(c.widget().paid.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_submission_keeps_selections() {
        let backend = FakeBackend {
            submit_status: Some(500),
            ..backend()
        };
        let mut c = controller(backend, FakeWidget::default());
        c.initialize().await;
        c.select_quote("JNE", "REG").unwrap();
        c.select_payment_method(PaymentMethod::Manual);
        c.attach_proof(ProofFile::new("proof.png", "image/png", vec![1]))
            .unwrap();

        let outcome = c.submit().await;

        assert_eq!(outcome.user_message(), Some(GENERIC_FAILURE_MESSAGE));
        assert_eq!(c.session().selected_address_id().unwrap().as_str(), "a1");
        assert!(c.session().selected_quote().is_some());
        assert_eq!(c.session().payment_method(), PaymentMethod::Manual);
        assert!(c.session().proof().is_some());
    }
}
