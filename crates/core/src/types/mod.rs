//! Core types for Tote.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! records exchanged with the backend.

pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use price::{Price, PriceError};
pub use product::{NewProduct, Product};
pub use user::User;
