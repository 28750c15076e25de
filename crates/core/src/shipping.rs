//! Shipping details collected at checkout.

use serde::{Deserialize, Serialize};

use crate::form::{FieldErrors, FormField};

/// Fields of the shipping form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShippingField {
    Address,
    City,
    PostalCode,
}

impl FormField for ShippingField {
    fn key(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postalCode",
        }
    }
}

/// Shipping errors, keyed by field.
pub type ShippingErrors = FieldErrors<ShippingField>;

/// Raw shipping input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingForm {
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

impl ShippingForm {
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }

    /// See [`validate`].
    #[must_use]
    pub fn validate(&self) -> ShippingErrors {
        validate(self)
    }

    /// Single-line address stored on the order: `"{address}, {city}, {postal_code}"`.
    #[must_use]
    pub fn address_line(&self) -> String {
        format!("{}, {}, {}", self.address, self.city, self.postal_code)
    }

    /// Blank every field.
    pub fn clear(&mut self) {
        self.address.clear();
        self.city.clear();
        self.postal_code.clear();
    }
}

/// Check that address, city and postal code are non-blank.
///
/// Returns one message per failing field; an empty map means the form is
/// ready to submit.
#[must_use]
pub fn validate(form: &ShippingForm) -> ShippingErrors {
    let mut errors = ShippingErrors::new();
    errors.check(
        form.address.trim().is_empty(),
        ShippingField::Address,
        "Address is required",
    );
    errors.check(
        form.city.trim().is_empty(),
        ShippingField::City,
        "City is required",
    );
    errors.check(
        form.postal_code.trim().is_empty(),
        ShippingField::PostalCode,
        "Postal code is required",
    );
    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_form_passes() {
        let form = ShippingForm::new("12 Marina Rd", "Lagos", "101001");
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_missing_address_only() {
        let form = ShippingForm::new("", "Lagos", "101001");
        let errors = validate(&form);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(ShippingField::Address), Some("Address is required"));
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let form = ShippingForm::new("  ", "\t", "\n");
        let errors = validate(&form);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(ShippingField::City), Some("City is required"));
        assert_eq!(
            errors.get(ShippingField::PostalCode),
            Some("Postal code is required")
        );
    }

    #[test]
    fn test_errors_serialize_with_field_keys() {
        let errors = validate(&ShippingForm::default());
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["address"], "Address is required");
        assert_eq!(json["postalCode"], "Postal code is required");
    }

    #[test]
    fn test_errors_display() {
        let errors = validate(&ShippingForm::new("x", "", "y"));
        assert_eq!(errors.to_string(), "city: City is required");
    }

    #[test]
    fn test_address_line_and_clear() {
        let mut form = ShippingForm::new("12 Marina Rd", "Lagos", "101001");
        assert_eq!(form.address_line(), "12 Marina Rd, Lagos, 101001");
        form.clear();
        assert_eq!(form, ShippingForm::default());
    }
}
