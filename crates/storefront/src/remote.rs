//! The backend seam.
//!
//! Everything the storefront persists, authenticates or uploads goes through
//! the two traits in this module. [`crate::supabase::SupabaseClient`] is the
//! production implementation; tests substitute in-memory fakes.

use std::future::Future;
use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;
use tote_core::{Email, NewOrder, NewOrderItem, NewProduct, Order, Product, User};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend rejected the request. `message` is the backend's own text.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A row the caller expected was not returned.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation needs a signed-in user.
    #[error("Not signed in")]
    Unauthenticated,

    /// The request could not be built from the given input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RemoteError {
    /// HTTP status reported by the backend, if the request got that far.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(429),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Rows, files and the current user, as provided by the backend.
pub trait RemoteDataService: Send + Sync {
    /// Insert an order and return the stored row (with its generated ID).
    fn insert_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<Order, RemoteError>> + Send;

    /// Insert order items as a single batch.
    fn insert_order_items(
        &self,
        items: &[NewOrderItem],
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// The user of the current session, if signed in.
    fn current_user(&self) -> impl Future<Output = Option<User>> + Send;

    /// All products, ordered by name.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, RemoteError>> + Send;

    /// Insert a product and return the stored row.
    fn insert_product(
        &self,
        product: &NewProduct,
    ) -> impl Future<Output = Result<Product, RemoteError>> + Send;

    /// Upload an image and return its public URL.
    fn upload_image(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send;
}

/// Email/password authentication against the backend.
pub trait AuthProvider: Send + Sync {
    /// Create an account. Returns the user when the backend opened a session
    /// right away, `None` when the address must be confirmed first.
    fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<Option<User>, RemoteError>> + Send;

    /// Open a session with email and password.
    fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<User, RemoteError>> + Send;

    /// End the current session. A no-op when signed out.
    fn sign_out(&self) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// The current session's user, refreshing an expiring session first.
    fn session_user(&self) -> impl Future<Output = Result<Option<User>, RemoteError>> + Send;
}

impl<T: RemoteDataService> RemoteDataService for Arc<T> {
    fn insert_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<Order, RemoteError>> + Send {
        (**self).insert_order(order)
    }

    fn insert_order_items(
        &self,
        items: &[NewOrderItem],
    ) -> impl Future<Output = Result<(), RemoteError>> + Send {
        (**self).insert_order_items(items)
    }

    fn current_user(&self) -> impl Future<Output = Option<User>> + Send {
        (**self).current_user()
    }

    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, RemoteError>> + Send {
        (**self).list_products()
    }

    fn insert_product(
        &self,
        product: &NewProduct,
    ) -> impl Future<Output = Result<Product, RemoteError>> + Send {
        (**self).insert_product(product)
    }

    fn upload_image(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send {
        (**self).upload_image(bytes, content_type)
    }
}

impl<T: AuthProvider> AuthProvider for Arc<T> {
    fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<Option<User>, RemoteError>> + Send {
        (**self).sign_up(email, password)
    }

    fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<User, RemoteError>> + Send {
        (**self).sign_in(email, password)
    }

    fn sign_out(&self) -> impl Future<Output = Result<(), RemoteError>> + Send {
        (**self).sign_out()
    }

    fn session_user(&self) -> impl Future<Output = Result<Option<User>, RemoteError>> + Send {
        (**self).session_user()
    }
}
