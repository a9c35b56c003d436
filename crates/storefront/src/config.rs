//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PASAR_API_BASE_URL` - Base URL of the platform REST API
//!
//! ## Optional
//! - `PASAR_SESSION_COOKIE` - Session cookie (`name=value`) sent with every request
//! - `PASAR_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `PASAR_SHIPPER_DESTINATION_ID` - Shipping origin destination (default: 501)
//! - `MIDTRANS_CLIENT_KEY` - Snap client key
//! - `MIDTRANS_SNAP_URL` - Snap script URL (default: sandbox)
//! - `MIDTRANS_REDIRECT_BASE_URL` - Snap redirect base URL (default: sandbox)
//! - `MIDTRANS_PREFERRED_PAYMENT_TYPE` - Preferred instrument (default: `bca_va`)

use std::time::Duration;

use pasar_core::DestinationId;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: &str = "30";
const DEFAULT_SHIPPER_DESTINATION_ID: &str = "501";
const DEFAULT_SNAP_URL: &str = "https://app.sandbox.midtrans.com/snap/snap.js";
const DEFAULT_SNAP_REDIRECT_BASE_URL: &str = "https://app.sandbox.midtrans.com/snap/v2/vtweb";
pub(crate) const DEFAULT_PREFERRED_PAYMENT_TYPE: &str = "bca_va";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// REST API connection settings
    pub api: ApiConfig,
    /// Shipping quote settings
    pub shipping: ShippingConfig,
    /// Hosted payment widget settings
    pub payment: PaymentConfig,
}

/// Platform REST API configuration.
///
/// Implements `Debug` manually to redact the session cookie.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL every API path is joined onto
    pub base_url: Url,
    /// Session cookie installed in the client's cookie jar
    pub session_cookie: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Shipping quote configuration.
#[derive(Debug, Clone)]
pub struct ShippingConfig {
    /// Destination ID of the warehouse every parcel ships from
    pub origin: DestinationId,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            origin: DestinationId::new(DEFAULT_SHIPPER_DESTINATION_ID),
        }
    }
}

/// Hosted payment widget (Midtrans Snap) configuration.
///
/// Implements `Debug` manually to redact the client key.
#[derive(Clone)]
pub struct PaymentConfig {
    /// Snap client key
    pub client_key: Option<SecretString>,
    /// URL of the Snap script that must be loaded before paying
    pub snap_script_url: Url,
    /// Base URL for the hosted payment page of a transaction token
    pub redirect_base_url: Url,
    /// Instrument preselected in the widget
    pub preferred_payment_type: String,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("client_key", &self.client_key.as_ref().map(|_| "[REDACTED]"))
            .field("snap_script_url", &self.snap_script_url.as_str())
            .field("redirect_base_url", &self.redirect_base_url.as_str())
            .field("preferred_payment_type", &self.preferred_payment_type)
            .finish()
    }
}

impl Default for PaymentConfig {
    /// Sandbox Snap endpoints with no client key.
    ///
    /// # Panics
    ///
    /// Never in practice: the default URLs are compile-time constants.
    fn default() -> Self {
        Self {
            client_key: None,
            snap_script_url: Url::parse(DEFAULT_SNAP_URL).expect("default Snap URL is valid"),
            redirect_base_url: Url::parse(DEFAULT_SNAP_REDIRECT_BASE_URL)
                .expect("default Snap redirect URL is valid"),
            preferred_payment_type: DEFAULT_PREFERRED_PAYMENT_TYPE.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            api: ApiConfig::from_env()?,
            shipping: ShippingConfig::from_env(),
            payment: PaymentConfig::from_env()?,
        })
    }
}

impl ApiConfig {
    /// Load the API settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is missing or invalid, or the
    /// timeout is not a whole number of seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_url("PASAR_API_BASE_URL", &get_required_env("PASAR_API_BASE_URL")?)?;
        let timeout_secs = get_env_or_default("PASAR_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PASAR_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            session_cookie: get_optional_env("PASAR_SESSION_COOKIE").map(SecretString::from),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Settings for a base URL with no session and the default timeout.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            session_cookie: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ShippingConfig {
    fn from_env() -> Self {
        Self {
            origin: DestinationId::new(get_env_or_default(
                "PASAR_SHIPPER_DESTINATION_ID",
                DEFAULT_SHIPPER_DESTINATION_ID,
            )),
        }
    }
}

impl PaymentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_key: get_optional_env("MIDTRANS_CLIENT_KEY").map(SecretString::from),
            snap_script_url: parse_url(
                "MIDTRANS_SNAP_URL",
                &get_env_or_default("MIDTRANS_SNAP_URL", DEFAULT_SNAP_URL),
            )?,
            redirect_base_url: parse_url(
                "MIDTRANS_REDIRECT_BASE_URL",
                &get_env_or_default("MIDTRANS_REDIRECT_BASE_URL", DEFAULT_SNAP_REDIRECT_BASE_URL),
            )?,
            preferred_payment_type: get_env_or_default(
                "MIDTRANS_PREFERRED_PAYMENT_TYPE",
                DEFAULT_PREFERRED_PAYMENT_TYPE,
            ),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a URL-valued variable.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
