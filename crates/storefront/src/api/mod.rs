//! Platform REST API client.
//!
//! # Architecture
//!
//! - The platform backend is the source of truth - NO local state is
//!   persisted, every screen fetches what it needs
//! - Session credentials travel as a cookie held in the client's jar
//! - 401/403 responses surface as [`ApiError::Unauthorized`] so callers can
//!   send the user to the login page
//!
//! # Endpoints
//!
//! - [`checkout`] - cart, saved addresses, shipping quotes, order submission
//! - [`products`] - product detail, add to cart
//!
//! # Example
//!
//! ```rust,ignore
//! use pasar_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let cart = client.cart().await?;
//! let addresses = client.addresses().await?;
//! ```

pub mod checkout;
pub mod products;
pub mod types;

use std::sync::Arc;

use reqwest::cookie::Jar;
use secrecy::ExposeSecret;
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;

pub use types::*;

/// Number of body characters kept in error messages and logs.
const ERROR_BODY_PREVIEW: usize = 500;

/// Errors that can occur when calling the platform API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The session is missing or not allowed to call the endpoint.
    #[error("Unauthorized (HTTP {0})")]
    Unauthorized(u16),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field the client depends on was absent from a success response.
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the error means the caller must log in again.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

/// Wrapper for the `{ "data": ... }` envelope most endpoints use.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the platform REST API.
///
/// Cheap to clone; clones share the connection pool and cookie jar.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// The configured session cookie, if any, is installed in a cookie jar
    /// scoped to the base URL so that every request carries it.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        if let Some(cookie) = &config.session_cookie {
            jar.add_cookie_str(cookie.expose_secret(), &config.base_url);
        }

        let client = reqwest::Client::builder()
            .cookie_provider(jar)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build the absolute URL for an API path such as `/api/v1/cart`.
    ///
    /// # Errors
    ///
    /// Returns error if the joined URL does not parse.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// GET a JSON document.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.http().get(self.endpoint(path)?).query(query);
        let body = Self::send(request).await?;
        Self::parse(&body)
    }

    /// Send a request and return the body of a success response.
    ///
    /// Maps 401/403 to [`ApiError::Unauthorized`] and every other non-2xx
    /// status to [`ApiError::Api`].
    pub(crate) async fn send(request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized(status.as_u16()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %preview(&body),
                "API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: preview(&body),
            });
        }

        Ok(body)
    }

    /// Parse a success body, logging it when it does not match.
    pub(crate) fn parse<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %preview(body),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }
}

fn preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW).collect()
}
