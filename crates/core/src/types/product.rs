//! Catalog products.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product row from the `products` table.
///
/// Owned by the backend; the cart only ever holds copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Public URL of the product image.
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

/// Insert payload for a new product. The backend assigns the ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub description: String,
}
