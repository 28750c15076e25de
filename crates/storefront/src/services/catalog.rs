//! Product catalog.

use thiserror::Error;
use tote_core::product_form::{ProductErrors, ProductForm};
use tote_core::{Product, ProductId};
use tracing::{info, instrument};

use crate::remote::{RemoteDataService, RemoteError};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product form has invalid fields.
    #[error("invalid product: {0}")]
    Validation(ProductErrors),

    /// Upload with no bytes.
    #[error("image is empty")]
    EmptyImage,

    /// Upload that is not an image.
    #[error("unsupported image type: {0}")]
    UnsupportedImageType(String),

    /// No product with this ID in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Backend failure.
    #[error("{0}")]
    Remote(#[from] RemoteError),
}

/// Listing, creation and image uploads for products.
pub struct CatalogService<S> {
    remote: S,
}

impl<S: RemoteDataService> CatalogService<S> {
    pub const fn new(remote: S) -> Self {
        Self { remote }
    }

    /// All products, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.remote.list_products().await?)
    }

    /// Look up one product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if no product has this ID.
    #[instrument(skip(self))]
    pub async fn find_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.list_products()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Validate the form and insert the product.
    ///
    /// # Errors
    ///
    /// Returns `Validation` with every failing field, or a backend error.
    #[instrument(skip_all, fields(name = %form.name))]
    pub async fn add_product(&self, form: &ProductForm) -> Result<Product, CatalogError> {
        let new_product = form.validate().map_err(CatalogError::Validation)?;
        let product = self.remote.insert_product(&new_product).await?;
        info!(product_id = %product.id, "Product added");
        Ok(product)
    }

    /// Upload a product image and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns `EmptyImage` or `UnsupportedImageType` before any upload, or a
    /// backend error.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, CatalogError> {
        if bytes.is_empty() {
            return Err(CatalogError::EmptyImage);
        }
        if !content_type.trim().to_ascii_lowercase().starts_with("image/") {
            return Err(CatalogError::UnsupportedImageType(content_type.to_string()));
        }

        Ok(self.remote.upload_image(bytes, content_type).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tote_core::Price;
    use tote_core::product_form::ProductField;

    use super::*;
    use crate::services::testing::{FakeRemote, product};

    fn form() -> ProductForm {
        ProductForm {
            name: "Canvas Tote".to_string(),
            price: "24.50".to_string(),
            image_url: "https://cdn.example.com/tote.jpg".to_string(),
            description: "Heavy cotton bag".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_products_sorted_by_name() {
        let remote = FakeRemote::new();
        remote.with(|s| s.products = vec![product("Zebra mug", 9), product("Apron", 15)]);
        let catalog = CatalogService::new(remote);

        let names: Vec<_> = catalog
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Apron", "Zebra mug"]);
    }

    #[tokio::test]
    async fn test_add_product() {
        let remote = FakeRemote::new();
        let catalog = CatalogService::new(remote.clone());

        let created = catalog.add_product(&form()).await.unwrap();

        assert_eq!(created.price, Price::parse("24.50").unwrap());
        assert_eq!(catalog.find_product(created.id).await.unwrap(), created);
        assert_eq!(remote.with(|s| s.products.len()), 1);
    }

    #[tokio::test]
    async fn test_add_product_validation() {
        let remote = FakeRemote::new();
        let catalog = CatalogService::new(remote.clone());
        let mut bad = form();
        bad.price = "0".to_string();
        bad.description = "  ".to_string();

        let err = catalog.add_product(&bad).await.unwrap_err();

        let CatalogError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(ProductField::Price));
        assert!(errors.contains(ProductField::Description));
        assert!(remote.with(|s| s.products.is_empty()));
    }

    #[tokio::test]
    async fn test_find_missing_product() {
        let catalog = CatalogService::new(FakeRemote::new());
        let id = ProductId::generate();
        let err = catalog.find_product(id).await.unwrap_err();
        assert!(matches!(err, CatalogError::ProductNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_upload_image_checks() {
        let remote = FakeRemote::new();
        let catalog = CatalogService::new(remote.clone());

        assert!(matches!(
            catalog.upload_image(Vec::new(), "image/png").await,
            Err(CatalogError::EmptyImage)
        ));
        assert!(matches!(
            catalog.upload_image(vec![1, 2, 3], "application/pdf").await,
            Err(CatalogError::UnsupportedImageType(_))
        ));
        assert!(remote.with(|s| s.uploads.is_empty()));

        let url = catalog.upload_image(vec![0xff, 0xd8], "image/jpeg").await.unwrap();
        assert!(url.starts_with("https://"));
        assert_eq!(remote.with(|s| s.uploads.clone()), [(2, "image/jpeg".to_string())]);
    }
}
