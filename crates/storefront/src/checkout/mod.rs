//! Checkout flow.
//!
//! # Flow
//!
//! 1. [`CheckoutController::initialize`] loads the cart and address book,
//!    selects the primary address, loads the payment widget and requests
//!    shipping quotes
//! 2. The customer picks an address, a shipping option and a payment method
//!    (attaching a transfer proof for manual payment)
//! 3. [`CheckoutController::submit`] checks the preconditions, posts the
//!    order and either redirects to the order history (manual) or hands the
//!    transaction token to the payment widget (hosted)
//!
//! # Example
//!
//! ```rust,ignore
//! use pasar_storefront::checkout::{CheckoutController, SnapWidget, SubmitOutcome};
//!
//! let widget = SnapWidget::new(&config.payment)?;
//! let mut checkout = CheckoutController::new(client, widget, &config.shipping);
//! checkout.initialize().await;
//! checkout.select_quote("JNE", "REG")?;
//! match checkout.submit().await {
//!     SubmitOutcome::Payment { token, .. } => println!("pay at {token}"),
//!     other => println!("{:?}", other.user_message()),
//! }
//! ```

mod backend;
mod controller;
mod payment;
mod session;

pub use backend::CheckoutBackend;
pub use controller::{CheckoutController, GENERIC_FAILURE_MESSAGE, InitOutcome, SubmitOutcome};
pub use payment::{
    PaymentOutcome, PaymentResult, PaymentWidget, SnapWidget, VaNumber, WidgetError,
};
pub use session::{AddressForm, CheckoutSession, QuoteTicket, SubmitBlocker};
