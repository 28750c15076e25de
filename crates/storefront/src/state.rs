//! Application state shared across commands.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::remote::RemoteError;
use crate::services::{AuthStore, CatalogService, CheckoutWorkflow};
use crate::supabase::SupabaseClient;

/// Configuration plus the backend client.
///
/// This struct is cheaply cloneable via `Arc`; every service built from it
/// shares the client's connection pool, product cache and session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    client: SupabaseClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, RemoteError> {
        let client = SupabaseClient::new(&config)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, client }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn client(&self) -> &SupabaseClient {
        &self.inner.client
    }

    /// Auth store over the shared session.
    #[must_use]
    pub fn auth(&self) -> AuthStore<SupabaseClient> {
        AuthStore::new(self.inner.client.clone())
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogService<SupabaseClient> {
        CatalogService::new(self.inner.client.clone())
    }

    /// A fresh checkout workflow in `Editing`.
    #[must_use]
    pub fn checkout(&self) -> CheckoutWorkflow<SupabaseClient> {
        CheckoutWorkflow::new(self.inner.client.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use tote_core::Cart;

    use super::*;
    use crate::config::SupabaseConfig;
    use crate::services::CheckoutState;

    fn state() -> AppState {
        let supabase = SupabaseConfig::new(
            "https://abcdefgh.supabase.co",
            SecretString::from("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test-anon".to_string()),
        )
        .unwrap();
        AppState::new(StorefrontConfig::with_supabase(supabase)).unwrap()
    }

    #[test]
    fn test_services_share_client() {
        let state = state();
        assert_eq!(state.config().supabase.url, "https://abcdefgh.supabase.co");
        assert_eq!(state.checkout().state(), &CheckoutState::Editing);
        assert!(state.auth().state().is_loading);
    }

    #[tokio::test]
    async fn test_signed_out_checkout_requires_auth() {
        let state = state();
        let mut workflow = state.checkout();
        workflow.set_address("1 Main St");
        workflow.set_city("Springfield");
        workflow.set_postal_code("12345");

        let err = workflow
            .place_order_as_current_user(&mut Cart::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::services::CheckoutError::AuthenticationRequired
        ));
    }
}
