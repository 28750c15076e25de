//! Read-only checks against a real Supabase project.
//!
//! These tests require `SUPABASE_URL` and `SUPABASE_ANON_KEY` (a `.env` file
//! works) and a `products` table readable by the anon role.
//!
//! Run with: cargo test -p tote-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use tote_storefront::config::StorefrontConfig;
use tote_storefront::remote::AuthProvider;
use tote_storefront::state::AppState;

fn live_state() -> AppState {
    let config = StorefrontConfig::from_env().expect("Supabase configuration missing");
    AppState::new(config).expect("Failed to build client")
}

#[tokio::test]
#[ignore = "Requires a Supabase project"]
async fn test_live_products_decode() {
    let state = live_state();
    let products = state.catalog().list_products().await.unwrap();

    for product in &products {
        assert!(!product.name.is_empty());
    }
    // Second read is served from the cache
    assert_eq!(state.catalog().list_products().await.unwrap(), products);
}

#[tokio::test]
#[ignore = "Requires a Supabase project"]
async fn test_live_anonymous_session_is_empty() {
    let state = live_state();
    assert!(state.client().session_user().await.unwrap().is_none());
}
