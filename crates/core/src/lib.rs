//! Tote Core - Domain types, cart store and form validation.
//!
//! This crate provides the pieces shared by every Tote component:
//! - `storefront` - Backend client, checkout workflow and auth/catalog services
//! - `cli` - The `tote` command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure state - no I/O, no HTTP
//! clients, no async. The cart and the form validators are plain values that
//! callers own and pass around explicitly.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, prices and the product/order/user records
//! - [`cart`] - The in-memory cart store
//! - [`form`] - Per-field validation error maps
//! - [`shipping`] - Shipping form validation for checkout
//! - [`product_form`] - New product form validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod form;
pub mod product_form;
pub mod shipping;
pub mod types;

pub use cart::{Cart, CartItem, CartSnapshot};
pub use form::FieldErrors;
pub use types::*;
