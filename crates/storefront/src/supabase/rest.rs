//! Table access through the REST API.

use std::sync::atomic::Ordering;

use tote_core::{NewOrder, NewOrderItem, NewProduct, Order, Product};
use tracing::{debug, instrument};

use super::client::{PRODUCTS_CACHE_KEY, SupabaseClient};
use crate::remote::RemoteError;

/// Ask the REST API to echo inserted rows back.
const RETURN_REPRESENTATION: &str = "return=representation";

/// Ask the REST API to skip the response body.
const RETURN_MINIMAL: &str = "return=minimal";

/// Makes the REST API answer with a single JSON object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

impl SupabaseClient {
    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get all products ordered by name.
    ///
    /// Served from the in-memory cache when a fresh copy is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, RemoteError> {
        if let Some(products) = self.inner.products.get(PRODUCTS_CACHE_KEY).await {
            debug!(count = products.len(), "Cache hit for products");
            return Ok(products);
        }

        let generation = self.inner.products_generation.load(Ordering::SeqCst);
        let request = self
            .inner
            .http
            .get(self.endpoint("rest/v1/products?select=*&order=name.asc"));
        let response = self.send(request).await?;
        let products: Vec<Product> = Self::json(response).await?;

        if self.inner.products_generation.load(Ordering::SeqCst) == generation {
            self.inner
                .products
                .insert(PRODUCTS_CACHE_KEY, products.clone())
                .await;
            // An invalidation may have landed between the check and the insert
            if self.inner.products_generation.load(Ordering::SeqCst) != generation {
                self.inner.products.invalidate(PRODUCTS_CACHE_KEY).await;
            }
        } else {
            debug!("Product list changed during fetch, not caching");
        }

        Ok(products)
    }

    /// Insert a product and drop the cached product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or no row comes back.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn insert_product(&self, product: &NewProduct) -> Result<Product, RemoteError> {
        let request = self
            .inner
            .http
            .post(self.endpoint("rest/v1/products"))
            .header("Prefer", RETURN_REPRESENTATION)
            .header("Accept", SINGLE_OBJECT)
            .json(product);

        let response = self.send(request).await?;
        let created: Product = Self::json(response).await?;

        self.invalidate_products().await;
        debug!(product_id = %created.id, "Product created");

        Ok(created)
    }

    /// Drop the cached product list so the next read goes to the backend.
    pub async fn invalidate_products(&self) {
        self.inner.products_generation.fetch_add(1, Ordering::SeqCst);
        self.inner.products.invalidate(PRODUCTS_CACHE_KEY).await;
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Insert an order and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, order), fields(user_id = %order.user_id, total = %order.total))]
    pub async fn insert_order(&self, order: &NewOrder) -> Result<Order, RemoteError> {
        let request = self
            .inner
            .http
            .post(self.endpoint("rest/v1/orders"))
            .header("Prefer", RETURN_REPRESENTATION)
            .header("Accept", SINGLE_OBJECT)
            .json(order);

        let response = self.send(request).await?;
        let created: Order = Self::json(response).await?;
        debug!(order_id = %created.id, "Order created");

        Ok(created)
    }

    /// Insert order items in one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn insert_order_items(&self, items: &[NewOrderItem]) -> Result<(), RemoteError> {
        if items.is_empty() {
            return Ok(());
        }

        let request = self
            .inner
            .http
            .post(self.endpoint("rest/v1/order_items"))
            .header("Prefer", RETURN_MINIMAL)
            .json(items);

        self.send(request).await?;
        Ok(())
    }
}
