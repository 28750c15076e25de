//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `checkout` - Turns a cart and a shipping form into a persisted order
//! - `auth` - Sign-up, sign-in and session state for the presentation layer
//! - `catalog` - Product listing, product creation and image uploads
//!
//! Each service is generic over the backend traits in [`crate::remote`] so it
//! can run against the Supabase client or an in-memory fake.

pub mod auth;
pub mod catalog;
pub mod checkout;

pub use auth::{AuthError, AuthState, AuthStore};
pub use catalog::{CatalogError, CatalogService};
pub use checkout::{CheckoutError, CheckoutState, CheckoutView, CheckoutWorkflow};

#[cfg(test)]
pub(crate) mod testing;
