//! Supabase backend client.
//!
//! # Architecture
//!
//! - Plain `reqwest` calls against the project's REST, auth and storage APIs
//! - The backend is the source of truth - no local persistence
//! - In-memory caching via `moka` for the product list (TTL from config)
//! - The auth session lives in memory and is refreshed shortly before expiry
//!
//! # APIs
//!
//! ## REST (`/rest/v1`)
//! - `products`, `orders`, `order_items` tables
//!
//! ## Auth (`/auth/v1`)
//! - Email/password sign up and sign in, refresh tokens, sign out
//!
//! ## Storage (`/storage/v1`)
//! - Product image uploads into a public bucket
//!
//! # Example
//!
//! ```rust,ignore
//! use tote_storefront::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(&config)?;
//! client.sign_in(&email, &password).await?;
//!
//! let products = client.list_products().await?;
//! ```

mod auth;
mod client;
mod rest;
mod storage;
pub mod types;

pub use client::SupabaseClient;
pub use types::Session;

use reqwest::StatusCode;

use crate::remote::RemoteError;
use types::ErrorBody;

/// Build a [`RemoteError`] from a non-success response body.
///
/// Uses the backend's own message when the body carries one, otherwise the
/// status line and the start of the body.
pub(crate) fn api_error(status: StatusCode, body: &str) -> RemoteError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            let snippet: String = body.chars().take(200).collect();
            if snippet.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {snippet}")
            }
        });

    RemoteError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_uses_backend_message() {
        let err = api_error(
            StatusCode::BAD_REQUEST,
            r#"{"code":"23502","message":"null value in column \"user_id\" violates not-null constraint"}"#,
        );
        assert_eq!(
            err.to_string(),
            "null value in column \"user_id\" violates not-null constraint"
        );
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_api_error_falls_back_to_body_snippet() {
        let err = api_error(StatusCode::BAD_GATEWAY, "<html>upstream down</html>");
        assert_eq!(
            err.to_string(),
            "HTTP 502 Bad Gateway: <html>upstream down</html>"
        );
    }

    #[test]
    fn test_api_error_empty_body() {
        let err = api_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");
    }
}
