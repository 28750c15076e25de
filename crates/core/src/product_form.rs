//! The "add product" form.

use serde::{Deserialize, Serialize};

use crate::form::{FieldErrors, FormField};
use crate::types::{NewProduct, Price};

/// Fields of the product form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductField {
    Name,
    Price,
    ImageUrl,
    Description,
}

impl FormField for ProductField {
    fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::ImageUrl => "imageUrl",
            Self::Description => "description",
        }
    }
}

/// Product form errors, keyed by field.
pub type ProductErrors = FieldErrors<ProductField>;

/// Raw product input. `price` is kept as text until validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub description: String,
}

impl ProductForm {
    /// Validate every field and build the insert payload.
    ///
    /// Text fields are trimmed. The price must parse as a decimal greater
    /// than zero.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message.
    pub fn validate(&self) -> Result<NewProduct, ProductErrors> {
        let mut errors = ProductErrors::new();

        let name = self.name.trim();
        errors.check(name.is_empty(), ProductField::Name, "Product name is required");

        let price = if self.price.trim().is_empty() {
            errors.insert(ProductField::Price, "Price is required");
            None
        } else {
            match Price::parse(&self.price) {
                Ok(price) if !price.is_zero() => Some(price),
                _ => {
                    errors.insert(ProductField::Price, "Price must be a positive number");
                    None
                }
            }
        };

        let image_url = self.image_url.trim();
        errors.check(image_url.is_empty(), ProductField::ImageUrl, "Image URL is required");

        let description = self.description.trim();
        errors.check(
            description.is_empty(),
            ProductField::Description,
            "Description is required",
        );

        match price {
            Some(price) if errors.is_empty() => Ok(NewProduct {
                name: name.to_owned(),
                price,
                image_url: image_url.to_owned(),
                description: description.to_owned(),
            }),
            _ => Err(errors),
        }
    }

    /// Blank every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> ProductForm {
        ProductForm {
            name: " Ankara Tote ".to_string(),
            price: "4500".to_string(),
            image_url: "https://cdn.example.com/tote.png".to_string(),
            description: "Hand-sewn wax print bag".to_string(),
        }
    }

    #[test]
    fn test_valid_form_builds_trimmed_payload() {
        let product = filled().validate().unwrap();
        assert_eq!(product.name, "Ankara Tote");
        assert_eq!(product.price, Price::from_units(4500));
    }

    #[test]
    fn test_blank_form_reports_every_field() {
        let errors = ProductForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(ProductField::Price), Some("Price is required"));
        assert_eq!(errors.get(ProductField::ImageUrl), Some("Image URL is required"));
    }

    #[test]
    fn test_price_must_be_positive_number() {
        for bad in ["abc", "0", "-3", "0.00"] {
            let form = ProductForm {
                price: bad.to_string(),
                ..filled()
            };
            let errors = form.validate().unwrap_err();
            assert_eq!(
                errors.get(ProductField::Price),
                Some("Price must be a positive number"),
                "{bad}"
            );
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_clear() {
        let mut form = filled();
        form.clear();
        assert_eq!(form, ProductForm::default());
    }
}
