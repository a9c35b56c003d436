//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PASAR_API_BASE_URL` - Base URL of the platform REST API
//! - `PASAR_SESSION_COOKIE` - Session cookie (`name=value`) of a store admin
//!
//! ## Optional
//! - `PASAR_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `PASAR_ADMIN_CACHE_TTL_SECS` - Profile and store cache lifetime (default: 300)

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Blocklist of placeholder values copied from sample `.env` files
const PLACEHOLDER_PATTERNS: &[&str] = &["your-", "changeme", "placeholder", "xxx", "<", ">"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store-admin client configuration.
///
/// Implements `Debug` manually to redact the session cookie.
#[derive(Clone)]
pub struct AdminConfig {
    /// Base URL every API path is joined onto
    pub base_url: Url,
    /// Admin session cookie installed in the client's cookie jar
    pub session_cookie: SecretString,
    /// Per-request timeout
    pub timeout: Duration,
    /// Lifetime of cached profile and store lookups
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("base_url", &self.base_url.as_str())
            .field("session_cookie", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl AdminConfig {
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

        let base_url_raw = get_required_env("PASAR_API_BASE_URL")?;
        let base_url = Url::parse(&base_url_raw).map_err(|e| {
            ConfigError::InvalidEnvVar("PASAR_API_BASE_URL".to_string(), e.to_string())
        })?;

        let session_cookie = SecretString::from(get_required_env("PASAR_SESSION_COOKIE")?);
        validate_session_cookie(&session_cookie)?;

        Ok(Self {
            base_url,
            session_cookie,
            timeout: Duration::from_secs(get_secs(
                "PASAR_HTTP_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            cache_ttl: Duration::from_secs(get_secs(
                "PASAR_ADMIN_CACHE_TTL_SECS",
                DEFAULT_CACHE_TTL_SECS,
            )?),
        })
    }

    /// Settings for a base URL and session cookie with default timings.
    #[must_use]
    pub fn new(base_url: Url, session_cookie: SecretString) -> Self {
        Self {
            base_url,
            session_cookie,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable. Empty values count as missing.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a duration in whole seconds, falling back to a default.
fn get_secs(key: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(key).map_or(Ok(default), |v| {
        v.parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Check that the cookie looks like `name=value` and is not a sample value.
fn validate_session_cookie(cookie: &SecretString) -> Result<(), ConfigError> {
    let value = cookie.expose_secret();
    let invalid = |reason: &str| {
        Err(ConfigError::InvalidEnvVar(
            "PASAR_SESSION_COOKIE".to_string(),
            reason.to_string(),
        ))
    };

    let Some((name, token)) = value.split_once('=') else {
        return invalid("expected name=value");
    };
    if name.trim().is_empty() || token.trim().is_empty() {
        return invalid("expected name=value");
    }

    let lower = token.to_lowercase();
    if PLACEHOLDER_PATTERNS.iter().any(|p| lower.contains(p)) {
        return invalid("looks like a placeholder");
    }

    Ok(())
}
