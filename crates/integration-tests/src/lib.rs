//! Integration tests for Tote.
//!
//! # Running Tests
//!
//! ```bash
//! # Mocked backend (no network needed)
//! cargo test -p tote-integration-tests
//!
//! # Against a real project (reads SUPABASE_URL / SUPABASE_ANON_KEY)
//! cargo test -p tote-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `supabase_client` - REST, auth and storage calls over HTTP
//! - `checkout_flow` - The checkout workflow end to end
//! - `live_backend` - Read-only checks against a real project

use secrecy::SecretString;
use serde_json::{Value, json};
use tote_storefront::config::{StorefrontConfig, SupabaseConfig};
use tote_storefront::state::AppState;
use wiremock::MockServer;

/// Anon key the mocked backend expects in the `apikey` header.
pub const ANON_KEY: &str = "eyJhbGciOiJIUzI1NiJ9.mock-anon-key.Q9s2kT7w";

/// Fixed user for auth responses.
pub const USER_ID: &str = "7d0b5b5e-2f52-4c43-8d8e-2b3c3d9a1e01";

pub const USER_EMAIL: &str = "buyer@example.com";

/// Start a mock backend and application state pointed at it.
///
/// # Panics
///
/// Panics if the mock server URI is rejected or the client cannot be built.
pub async fn mock_backend() -> (MockServer, AppState) {
    let server = MockServer::start().await;
    let supabase = SupabaseConfig::new(&server.uri(), SecretString::from(ANON_KEY.to_string()))
        .unwrap_or_else(|e| panic!("mock server URI rejected: {e}"));
    let state = AppState::new(StorefrontConfig::with_supabase(supabase))
        .unwrap_or_else(|e| panic!("client failed to build: {e}"));
    (server, state)
}

/// A `products` row.
#[must_use]
pub fn product_json(id: &str, name: &str, price: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "image_url": format!("https://cdn.example.com/{id}.jpg"),
        "description": format!("About {name}"),
        "created_at": "2026-01-05T10:00:00.000000+00:00",
    })
}

/// A token grant for [`USER_ID`].
#[must_use]
pub fn token_json(access_token: &str, refresh_token: &str, expires_in: i64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": expires_in,
        "refresh_token": refresh_token,
        "user": {
            "id": USER_ID,
            "aud": "authenticated",
            "email": USER_EMAIL,
        },
    })
}

/// An `orders` row as returned after insert.
#[must_use]
pub fn order_json(id: &str, total: &str, shipping_address: &str) -> Value {
    json!({
        "id": id,
        "user_id": USER_ID,
        "total": total,
        "shipping_address": shipping_address,
        "created_at": "2026-01-05T10:00:00.000000+00:00",
    })
}
