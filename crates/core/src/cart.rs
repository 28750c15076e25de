//! In-memory shopping cart.
//!
//! The cart is an insertion-ordered list of lines, one per distinct product.
//! Every line has a quantity of at least one: any operation that would bring a
//! line to zero or below removes it instead. All operations are infallible.
//!
//! The cart is a plain value. The caller owns it and hands it (by `&mut`) to
//! whichever workflow needs to read or clear it.

use serde::{Deserialize, Serialize};

use crate::types::{NewOrderItem, OrderId, Price, Product, ProductId};

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    /// Always `>= 1`.
    pub quantity: u32,
}

impl CartItem {
    /// `product.price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Read model handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub total: Price,
    pub total_items: u64,
}

/// The cart store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `quantity` units of `product`.
    ///
    /// Increments the existing line for `product.id`, or appends a new line.
    /// The amount is applied as given; a line whose quantity ends up `<= 0` is
    /// dropped, and a non-positive amount for a product not yet in the cart
    /// does nothing.
    pub fn add_to_cart(&mut self, product: Product, quantity: i64) {
        if let Some(index) = self.position(product.id) {
            let current = self.items.get(index).map_or(0, |item| item.quantity);
            let next = i64::from(current).saturating_add(quantity);
            self.set_or_remove(index, next);
        } else if quantity > 0 {
            self.items.push(CartItem {
                product,
                quantity: clamp_quantity(quantity),
            });
        }
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: Product) {
        self.add_to_cart(product, 1);
    }

    /// Remove the line for `product_id`, if any.
    pub fn remove_from_cart(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.product.id != product_id);
    }

    /// Set the quantity of an existing line to exactly `quantity`.
    ///
    /// `quantity <= 0` removes the line. Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if let Some(index) = self.position(product_id) {
            self.set_or_remove(index, quantity);
        }
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.items.clear();
    }

    /// Sum of `price × quantity` over all lines. Zero for an empty cart.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all lines. Zero for an empty cart.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Snapshot of the lines and derived totals.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total: self.total(),
            total_items: self.total_items(),
        }
    }

    /// One order item per line, pricing each at the product's current price.
    #[must_use]
    pub fn to_order_items(&self, order_id: OrderId) -> Vec<NewOrderItem> {
        self.items
            .iter()
            .map(|item| NewOrderItem {
                order_id,
                product_id: item.product.id,
                quantity: item.quantity,
                price: item.product.price,
            })
            .collect()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product.id == product_id)
    }

    fn set_or_remove(&mut self, index: usize, quantity: i64) {
        if quantity <= 0 {
            self.items.remove(index);
        } else if let Some(item) = self.items.get_mut(index) {
            item.quantity = clamp_quantity(quantity);
        }
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity).unwrap_or(u32::MAX)
}
