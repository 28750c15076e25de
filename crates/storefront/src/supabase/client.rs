//! Shared HTTP plumbing for the Supabase client.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use chrono::Utc;
use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tote_core::{Email, NewOrder, NewOrderItem, NewProduct, Order, Product, User};
use tracing::debug;

use super::api_error;
use super::types::Session;
use crate::config::StorefrontConfig;
use crate::remote::{AuthProvider, RemoteDataService, RemoteError};

/// Cache key for the full product list.
pub(super) const PRODUCTS_CACHE_KEY: &str = "products:by-name";

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for one Supabase project.
///
/// Cheap to clone; clones share the HTTP connection pool, the product cache
/// and the signed-in session.
#[derive(Clone)]
pub struct SupabaseClient {
    pub(super) inner: Arc<SupabaseClientInner>,
}

pub(super) struct SupabaseClientInner {
    pub(super) http: reqwest::Client,
    pub(super) base_url: String,
    pub(super) anon_key: SecretString,
    pub(super) bucket: String,
    pub(super) session: RwLock<Option<Session>>,
    pub(super) products: Cache<&'static str, Vec<Product>>,
    /// Bumped on every invalidation; a fetch that started under an older
    /// value must not repopulate the cache.
    pub(super) products_generation: AtomicU64,
}

impl SupabaseClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidInput` if the API key cannot be used as a
    /// header value and `RemoteError::Http` if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(config.supabase.anon_key.expose_secret())
                .map_err(|e| RemoteError::InvalidInput(format!("invalid API key format: {e}")))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.http_timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                http,
                base_url: config.supabase.url.clone(),
                anon_key: config.supabase.anon_key.clone(),
                bucket: config.supabase.storage_bucket.clone(),
                session: RwLock::new(None),
                products,
                products_generation: AtomicU64::new(0),
            }),
        })
    }

    /// Absolute URL for a path below the project root.
    pub(super) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// A copy of the current session, if signed in.
    pub async fn session(&self) -> Option<Session> {
        self.inner.session.read().await.clone()
    }

    /// Bearer token for row and storage requests: the session's access token
    /// when signed in, the anon key otherwise.
    pub(super) async fn bearer(&self) -> Result<SecretString, RemoteError> {
        {
            let guard = self.inner.session.read().await;
            match guard.as_ref() {
                None => return Ok(self.inner.anon_key.clone()),
                Some(session) if !session.needs_refresh(Utc::now()) => {
                    return Ok(session.access_token.clone());
                }
                Some(_) => {}
            }
        }

        let mut guard = self.inner.session.write().await;
        let Some(session) = guard.as_ref() else {
            return Ok(self.inner.anon_key.clone());
        };
        // Another request may have refreshed while we waited for the lock
        if !session.needs_refresh(Utc::now()) {
            return Ok(session.access_token.clone());
        }

        debug!(expires_at = %session.expires_at, "Refreshing access token");
        match self.refresh(&session.refresh_token).await {
            Ok(fresh) => {
                let token = fresh.access_token.clone();
                *guard = Some(fresh);
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session refresh failed, signing out locally");
                *guard = None;
                Err(e)
            }
        }
    }

    /// Send an authorized request and fail on non-success statuses.
    pub(super) async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let token = self.bearer().await?;
        self.send_with_token(request, &token).await
    }

    /// Send a request with an explicit bearer token.
    pub(super) async fn send_with_token(
        &self,
        request: RequestBuilder,
        token: &SecretString,
    ) -> Result<Response, RemoteError> {
        let response = request.bearer_auth(token.expose_secret()).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(RemoteError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Supabase returned non-success status"
            );
            return Err(api_error(status, &body));
        }

        Ok(response)
    }

    /// Decode a successful response body as JSON.
    pub(super) async fn json<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse Supabase response"
            );
            RemoteError::Parse(e)
        })
    }
}

// =============================================================================
// Trait implementations
// =============================================================================

impl RemoteDataService for SupabaseClient {
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, RemoteError> {
        Self::insert_order(self, order).await
    }

    async fn insert_order_items(&self, items: &[NewOrderItem]) -> Result<(), RemoteError> {
        Self::insert_order_items(self, items).await
    }

    async fn current_user(&self) -> Option<User> {
        self.inner
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.user.clone())
    }

    async fn list_products(&self) -> Result<Vec<Product>, RemoteError> {
        Self::list_products(self).await
    }

    async fn insert_product(&self, product: &NewProduct) -> Result<Product, RemoteError> {
        Self::insert_product(self, product).await
    }

    async fn upload_image(&self, bytes: Vec<u8>, content_type: &str) -> Result<String, RemoteError> {
        Self::upload_image(self, bytes, content_type).await
    }
}

impl AuthProvider for SupabaseClient {
    async fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Option<User>, RemoteError> {
        Self::sign_up(self, email, password).await
    }

    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<User, RemoteError> {
        Self::sign_in(self, email, password).await
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        Self::sign_out(self).await
    }

    async fn session_user(&self) -> Result<Option<User>, RemoteError> {
        if self.inner.session.read().await.is_none() {
            return Ok(None);
        }
        // Refreshes the session when it is about to expire
        self.bearer().await?;
        Ok(self.session().await.map(|s| s.user))
    }
}
