//! CLI subcommand implementations.

pub mod admin;
pub mod checkout;
pub mod product;

use thiserror::Error;

/// Outcomes that end a command without a lower-level error.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The session cookie is missing or expired.
    #[error("Not logged in: sign in at {0} and update PASAR_SESSION_COOKIE")]
    LoginRequired(String),

    /// The action was refused; the message is meant for the user.
    #[error("{0}")]
    Rejected(String),
}
