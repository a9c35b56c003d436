//! Checkout commands.
//!
//! # Environment Variables
//!
//! - `PASAR_API_BASE_URL` - Backend base URL
//! - `PASAR_SESSION_COOKIE` - Session cookie of the signed-in customer
//! - `MIDTRANS_*` - Hosted payment widget settings

use std::path::PathBuf;

use pasar_core::{AddressId, PaymentMethod, Rupiah};
use pasar_storefront::api::{ApiClient, CartLine, ProofFile};
use pasar_storefront::checkout::{
    CheckoutController, CheckoutSession, InitOutcome, SnapWidget, SubmitOutcome,
};
use pasar_storefront::config::StorefrontConfig;
use pasar_storefront::navigation::Destination;

use super::CommandError;

type BoxError = Box<dyn std::error::Error>;

/// Arguments of `pasar checkout`.
pub struct OrderArgs {
    pub carrier: String,
    pub service: String,
    pub address: Option<String>,
    pub method: PaymentMethod,
    pub proof: Option<PathBuf>,
}

fn client() -> Result<(StorefrontConfig, ApiClient), BoxError> {
    let config = StorefrontConfig::from_env()?;
    let client = ApiClient::new(&config.api)?;
    Ok((config, client))
}

/// Build a controller and load the checkout page.
async fn open_checkout(
    address: Option<&str>,
) -> Result<CheckoutController<ApiClient, SnapWidget>, BoxError> {
    let (config, client) = client()?;
    let widget = SnapWidget::new(&config.payment)?;
    let mut checkout = CheckoutController::new(client, widget, &config.shipping)
        .with_preferred_payment_type(config.payment.preferred_payment_type.clone());

    if let InitOutcome::Redirect(destination) = checkout.initialize().await {
        return Err(CommandError::LoginRequired(destination.to_string()).into());
    }

    if let Some(id) = address {
        checkout.select_address(&AddressId::new(id)).await?;
    }

    Ok(checkout)
}

/// Print the cart.
#[allow(clippy::print_stdout)]
pub async fn cart() -> Result<(), BoxError> {
    let (_, client) = client()?;
    let lines = match client.cart().await {
        Ok(lines) => lines,
        Err(e) if e.is_unauthorized() => {
            return Err(CommandError::LoginRequired(Destination::Login.to_string()).into());
        }
        Err(e) => return Err(e.into()),
    };

    if lines.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    for line in &lines {
        println!(
            "{:>3} x {:<40} {}",
            line.quantity,
            line.product.title,
            line.subtotal()
        );
    }
    println!(
        "Subtotal: {}",
        lines.iter().map(CartLine::subtotal).sum::<Rupiah>()
    );
    Ok(())
}

/// Print the saved addresses.
#[allow(clippy::print_stdout)]
pub async fn addresses() -> Result<(), BoxError> {
    let (_, client) = client()?;
    let addresses = client.addresses().await?;

    if addresses.is_empty() {
        println!(
            "No saved addresses. Add one at {}",
            Destination::ManageAddresses
        );
        return Ok(());
    }

    for saved in &addresses {
        let marker = if saved.is_primary { "*" } else { " " };
        println!(
            "{marker} {:<12} {} - {}, {}, {}, {}",
            saved.id,
            saved.recipient,
            saved.address.address,
            saved.address.city,
            saved.address.province,
            saved.address.postal_code
        );
    }
    Ok(())
}

/// Print the shipping options for the selected address.
#[allow(clippy::print_stdout)]
pub async fn quotes(address: Option<&str>) -> Result<(), BoxError> {
    let checkout = open_checkout(address).await?;
    let session = checkout.session();

    let Some(selected) = session.selected_address() else {
        return Err(CommandError::Rejected(
            "No address selected. Pass --address or set a primary address.".to_string(),
        )
        .into());
    };

    println!("Shipping to {} ({})", selected.recipient, selected.address.city);
    if session.quotes().is_empty() {
        println!("No shipping options available.");
        return Ok(());
    }

    for (group, quotes) in session.quotes().groups() {
        println!("{group}:");
        for quote in quotes {
            println!(
                "  {:<10} {:<10} {:>20}  {}",
                quote.shipping_name, quote.service_name, quote.grand_total, quote.etd
            );
        }
    }
    Ok(())
}

/// Place an order.
#[allow(clippy::print_stdout)]
pub async fn place_order(args: OrderArgs) -> Result<(), BoxError> {
    let mut checkout = open_checkout(args.address.as_deref()).await?;

    checkout.select_quote(&args.carrier, &args.service)?;
    checkout.select_payment_method(args.method);
    if let Some(path) = &args.proof {
        checkout.attach_proof(ProofFile::from_path(path).await?)?;
    }

    print_totals(checkout.session());

    match checkout.submit().await {
        SubmitOutcome::Redirect(destination) => {
            println!("Order placed. Track it at {destination}");
            Ok(())
        }
        SubmitOutcome::Payment { token, outcome } => {
            println!("Order placed. Complete the payment at:");
            println!("  {}", checkout.widget().payment_url(&token));
            println!("Payment status: {}", outcome.label());
            Ok(())
        }
        other => Err(CommandError::Rejected(
            other
                .user_message()
                .unwrap_or_default()
                .to_string(),
        )
        .into()),
    }
}

#[allow(clippy::print_stdout)]
fn print_totals(session: &CheckoutSession) {
    println!("Subtotal: {:>20}", session.subtotal());
    println!("Shipping: {:>20}", session.shipping_cost());
    println!("Total:    {:>20}", session.grand_total());
}
