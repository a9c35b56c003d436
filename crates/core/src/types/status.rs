//! Status enums shared by the storefront and admin clients.

use serde::{Deserialize, Serialize};

/// Error returned when parsing a status from an unknown string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    kind: &'static str,
    value: String,
}

impl ParseStatusError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// How the customer pays for an order.
///
/// The wire tag for the hosted widget is `epayment`, matching what the
/// checkout service expects in the `paymentMethod` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Hosted payment widget (virtual account, card, e-wallet).
    #[default]
    #[serde(rename = "epayment")]
    Hosted,
    /// Manual bank transfer with an uploaded proof of payment.
    #[serde(rename = "manual")]
    Manual,
}

impl PaymentMethod {
    /// The tag sent to the checkout service.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hosted => "epayment",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "epayment" | "hosted" => Ok(Self::Hosted),
            "manual" => Ok(Self::Manual),
            _ => Err(ParseStatusError::new("payment method", s)),
        }
    }
}

/// Inventory journal action recorded by the inventory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryAction {
    /// Initial stock added to a store.
    Add,
    /// Stock replenished.
    Restock,
    /// Stock reduced by a sale.
    Sale,
}

impl InventoryAction {
    /// The tag used in query strings and payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Restock => "RESTOCK",
            Self::Sale => "SALE",
        }
    }

    /// Whether the action increases stock.
    #[must_use]
    pub const fn is_inbound(&self) -> bool {
        matches!(self, Self::Add | Self::Restock)
    }
}

impl std::fmt::Display for InventoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for InventoryAction {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADD" => Ok(Self::Add),
            "RESTOCK" => Ok(Self::Restock),
            "SALE" => Ok(Self::Sale),
            _ => Err(ParseStatusError::new("inventory action", s)),
        }
    }
}
