//! Unified error handling with Sentry integration.
//!
//! Provides the `StorefrontError` type returned by the checkout and product
//! page controllers, plus helpers that report failures and leave
//! breadcrumbs in Sentry.

use pasar_core::AddressId;
use thiserror::Error;

use crate::api::ApiError;

/// Errors from storefront operations that the caller must handle.
///
/// Submission preconditions are not errors; they are reported as
/// [`crate::checkout::SubmitBlocker`] values.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Platform API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The address is not in the user's address book.
    #[error("Unknown address: {0}")]
    UnknownAddress(AddressId),

    /// No quote with this carrier and service in the current quote set.
    #[error("Unknown shipping option: {carrier} {service}")]
    UnknownShippingQuote { carrier: String, service: String },

    /// A proof of payment was attached while paying through the widget.
    #[error("Payment proof can only be attached for manual bank transfers")]
    ProofRequiresManualPayment,

    /// The product has no stock left.
    #[error("Product is out of stock")]
    OutOfStock,
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Report a failure to Sentry and log it with the event ID.
pub fn capture_failure(error: &(dyn std::error::Error + 'static), context: &str) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        error = %error,
        sentry_event_id = %event_id,
        "{context}"
    );
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Selected address", Some(&[("address_id", "a-1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
