//! Store-admin REST API client.
//!
//! Profile and store lookups change rarely and are cached with `moka`
//! (5-minute TTL by default). Inventory data is always fetched fresh.

use std::sync::Arc;

use moka::future::Cache;
use pasar_core::StoreId;
use reqwest::cookie::Jar;
use secrecy::ExposeSecret;
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::AdminConfig;
use crate::types::{HistoryResponse, InventoryJournal, Profile, ProfileResponse, StoreDetail};

const PRODUCTS_PATH: &str = "/api/v1/products";
const PROFILE_PATH: &str = "/api/v1/auth/profile";
const INVENTORY_PATH: &str = "/api/v1/inventory";
const HISTORY_PATH: &str = "/api/v1/inventory/history";
const STORES_PATH: &str = "/api/v1/stores";

const CACHE_CAPACITY: u64 = 100;
const ERROR_BODY_PREVIEW: usize = 500;

/// Errors that can occur when calling the admin endpoints.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The session is missing or is not a store admin.
    #[error("Unauthorized (HTTP {0})")]
    Unauthorized(u16),

    /// Resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Profile(Profile),
    Store(Box<StoreDetail>),
}

// =============================================================================
// AdminClient
// =============================================================================

/// Client for the store-admin endpoints.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<String, CacheValue>,
}

impl AdminClient {
    /// Create a new admin client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &AdminConfig) -> Result<Self, AdminApiError> {
        let jar = Arc::new(Jar::default());
        jar.add_cookie_str(config.session_cookie.expose_secret(), &config.base_url);

        let client = reqwest::Client::builder()
            .cookie_provider(jar)
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AdminApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// GET an endpoint and return the body of a success response.
    async fn get_text(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, AdminApiError> {
        let response = self
            .inner
            .client
            .get(self.endpoint(path)?)
            .query(query)
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AdminApiError::Unauthorized(status.as_u16()));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AdminApiError::NotFound(path.to_string()));
        }

        let body = response.text().await?;
        if !status.is_success() {
            warn!(
                status = %status,
                body = %body.chars().take(ERROR_BODY_PREVIEW).collect::<String>(),
                "Admin API returned non-success status"
            );
            return Err(AdminApiError::Api {
                status: status.as_u16(),
                message: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AdminApiError> {
        let body = self.get_text(path, query).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(ERROR_BODY_PREVIEW).collect::<String>(),
                "Failed to parse admin API response"
            );
            AdminApiError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the product catalog as raw JSON.
    ///
    /// The endpoint answers with either a bare array or a `{data}` envelope;
    /// see [`crate::dashboard::product_items`] for the interpretation.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is not JSON.
    #[instrument(skip(self))]
    pub async fn products_raw(&self) -> Result<serde_json::Value, AdminApiError> {
        self.get_json(PRODUCTS_PATH, &[]).await
    }

    // =========================================================================
    // Profile Methods
    // =========================================================================

    /// Get the signed-in user's profile (cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<Profile, AdminApiError> {
        let cache_key = "profile".to_string();

        if let Some(CacheValue::Profile(profile)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for profile");
            return Ok(profile);
        }

        let response: ProfileResponse = self.get_json(PROFILE_PATH, &[]).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Profile(response.user.clone()))
            .await;

        Ok(response.user)
    }

    // =========================================================================
    // Inventory Methods
    // =========================================================================

    /// Get the inventory entries of a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn inventory(
        &self,
        store_id: &StoreId,
    ) -> Result<Vec<InventoryJournal>, AdminApiError> {
        let envelope: DataEnvelope<Option<Vec<InventoryJournal>>> = self
            .get_json(INVENTORY_PATH, &[("storeId", store_id.to_string())])
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Get inventory history matching the given query pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn inventory_history(
        &self,
        query: &[(&str, String)],
    ) -> Result<HistoryResponse, AdminApiError> {
        self.get_json(HISTORY_PATH, query).await
    }

    // =========================================================================
    // Store Methods
    // =========================================================================

    /// Get a store with its stocked products (cached).
    ///
    /// # Errors
    ///
    /// Returns [`AdminApiError::NotFound`] if the store does not exist, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(store_id = %id))]
    pub async fn store(&self, id: &StoreId) -> Result<StoreDetail, AdminApiError> {
        let cache_key = format!("store:{id}");

        if let Some(CacheValue::Store(store)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for store");
            return Ok(*store);
        }

        let envelope: DataEnvelope<Option<StoreDetail>> =
            self.get_json(&format!("{STORES_PATH}/{id}"), &[]).await?;
        let store = envelope
            .data
            .ok_or_else(|| AdminApiError::NotFound(format!("Store not found: {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Store(Box::new(store.clone())))
            .await;

        Ok(store)
    }
}
