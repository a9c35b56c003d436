//! Hosted payment widget.
//!
//! The checkout controller never reaches for a global widget object: it
//! receives a [`PaymentWidget`] and asks it whether it is ready, to load
//! itself, and to run a payment for a transaction token.
//!
//! [`SnapWidget`] is the Midtrans Snap implementation used outside tests.
//! Loading fetches the Snap script once; paying hands the customer the
//! hosted payment page for the token and reports the transaction as pending,
//! since completion happens in the customer's browser.

use std::future::Future;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};
use url::Url;

use crate::api::TransactionToken;
use crate::config::PaymentConfig;

/// Errors that can occur while loading the payment widget.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The script host answered with a non-success status.
    #[error("Payment script unavailable: HTTP {0}")]
    ScriptUnavailable(u16),
}

/// Virtual account number issued for a bank transfer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VaNumber {
    pub bank: String,
    pub va_number: String,
}

/// Transaction details reported by the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaymentResult {
    pub transaction_id: Option<String>,
    pub order_id: Option<String>,
    pub gross_amount: Option<String>,
    pub payment_type: Option<String>,
    pub transaction_status: Option<String>,
    pub va_numbers: Vec<VaNumber>,
    pub fraud_status: Option<String>,
}

/// How a widget payment session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment captured.
    Success(PaymentResult),
    /// Payment started but awaiting completion (e.g., unpaid virtual account).
    Pending(PaymentResult),
    /// The payment provider reported an error.
    Error(PaymentResult),
    /// The customer closed the widget without finishing the payment.
    Closed,
}

impl PaymentOutcome {
    /// Short label for logs and summaries.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Pending(_) => "pending",
            Self::Error(_) => "error",
            Self::Closed => "closed",
        }
    }

    /// Transaction details, if the widget reported any.
    #[must_use]
    pub const fn result(&self) -> Option<&PaymentResult> {
        match self {
            Self::Success(r) | Self::Pending(r) | Self::Error(r) => Some(r),
            Self::Closed => None,
        }
    }
}

/// A hosted payment widget the checkout hands transaction tokens to.
pub trait PaymentWidget {
    /// Whether the widget has finished loading and can take a payment.
    fn is_ready(&self) -> bool;

    /// Load the widget. Calling this again after a successful load is a no-op.
    fn load(&self) -> impl Future<Output = Result<(), WidgetError>> + Send;

    /// Run a payment for a transaction token.
    fn pay(
        &self,
        token: &TransactionToken,
        preferred_payment_type: &str,
    ) -> impl Future<Output = PaymentOutcome> + Send;
}

// =============================================================================
// SnapWidget
// =============================================================================

/// Midtrans Snap payment widget.
pub struct SnapWidget {
    client: reqwest::Client,
    script_url: Url,
    redirect_base_url: Url,
    client_key: Option<SecretString>,
    loaded: OnceCell<()>,
}

impl SnapWidget {
    /// Create a widget from payment configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PaymentConfig) -> Result<Self, WidgetError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            script_url: config.snap_script_url.clone(),
            redirect_base_url: config.redirect_base_url.clone(),
            client_key: config.client_key.clone(),
            loaded: OnceCell::new(),
        })
    }

    /// The hosted payment page for a transaction token.
    #[must_use]
    pub fn payment_url(&self, token: &TransactionToken) -> Url {
        let mut url = self.redirect_base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(token.as_str());
        }
        url
    }

    async fn fetch_script(&self) -> Result<(), WidgetError> {
        let mut request = self.client.get(self.script_url.clone());
        if let Some(key) = &self.client_key {
            request = request.header("data-client-key", key.expose_secret());
        } else {
            warn!("MIDTRANS_CLIENT_KEY is not set; Snap will reject payments");
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::ScriptUnavailable(status.as_u16()));
        }

        info!(script = %self.script_url, "Payment widget loaded");
        Ok(())
    }
}

impl PaymentWidget for SnapWidget {
    fn is_ready(&self) -> bool {
        self.loaded.initialized()
    }

    async fn load(&self) -> Result<(), WidgetError> {
        self.loaded.get_or_try_init(|| self.fetch_script()).await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn pay(&self, token: &TransactionToken, preferred_payment_type: &str) -> PaymentOutcome {
        let url = self.payment_url(token);
        info!(payment_url = %url, "Hosted payment page ready");

        PaymentOutcome::Pending(PaymentResult {
            payment_type: Some(preferred_payment_type.to_string()),
            transaction_status: Some("pending".to_string()),
            ..PaymentResult::default()
        })
    }
}
