//! Pasar CLI - checkout and store-admin views from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart and saved addresses
//! pasar cart
//! pasar addresses
//!
//! # List shipping options for an address
//! pasar quotes --address a-2
//!
//! # Place an order paid by manual transfer
//! pasar checkout --carrier JNE --service REG --method manual --proof ./transfer.jpg
//!
//! # Buy a product right away
//! pasar product add p-1 --quantity 2 --buy-now
//!
//! # Inventory history of the admin's store
//! pasar admin history --action SALE --from 2025-06-01 --to 2025-06-30
//! ```
//!
//! # Commands
//!
//! - `cart`, `addresses`, `quotes`, `checkout` - Checkout flow
//! - `product show|add` - Product page
//! - `admin products|history|store` - Store-admin views

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pasar_core::{InventoryAction, PaymentMethod};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "pasar")]
#[command(author, version, about = "Pasar storefront and store-admin client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Cart,
    /// List saved shipping addresses
    Addresses,
    /// List shipping options for the cart
    Quotes {
        /// Saved address ID (default: primary address)
        #[arg(short, long)]
        address: Option<String>,
    },
    /// Place an order
    Checkout {
        /// Carrier name of the shipping option (e.g., JNE)
        #[arg(long)]
        carrier: String,

        /// Service name of the shipping option (e.g., REG)
        #[arg(long)]
        service: String,

        /// Saved address ID (default: primary address)
        #[arg(short, long)]
        address: Option<String>,

        /// Payment method (`hosted` or `manual`)
        #[arg(short, long, default_value = "hosted")]
        method: PaymentMethod,

        /// Proof of transfer, required for manual payment
        #[arg(short, long)]
        proof: Option<PathBuf>,
    },
    /// Product page
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Store-admin views
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Show a product
    Show {
        /// Product ID
        id: String,
    },
    /// Add a product to the cart
    Add {
        /// Product ID
        id: String,

        /// Units to add (clamped to stock)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Go to checkout afterwards
        #[arg(long)]
        buy_now: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List catalog products
    Products,
    /// Show inventory history of the admin's store
    History {
        /// Journal action (`ADD`, `RESTOCK`, `SALE`)
        #[arg(short, long)]
        action: Option<InventoryAction>,

        /// Product ID
        #[arg(short, long)]
        product: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Show a store's details
    Store {
        /// Store ID
        id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN")
        .ok()
        .filter(|v| !v.trim().is_empty())?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pasar_storefront=info,pasar_admin=info,pasar_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart => commands::checkout::cart().await?,
        Commands::Addresses => commands::checkout::addresses().await?,
        Commands::Quotes { address } => commands::checkout::quotes(address.as_deref()).await?,
        Commands::Checkout {
            carrier,
            service,
            address,
            method,
            proof,
        } => {
            let order = commands::checkout::OrderArgs {
                carrier,
                service,
                address,
                method,
                proof,
            };
            commands::checkout::place_order(order).await?;
        }
        Commands::Product { action } => match action {
            ProductAction::Show { id } => commands::product::show(&id).await?,
            ProductAction::Add {
                id,
                quantity,
                buy_now,
            } => commands::product::add(&id, quantity, buy_now).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Products => commands::admin::products().await?,
            AdminAction::History {
                action,
                product,
                from,
                to,
            } => commands::admin::history(action, product, from, to).await?,
            AdminAction::Store { id } => commands::admin::store(&id).await?,
        },
    }
    Ok(())
}
