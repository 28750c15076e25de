//! Per-field validation errors.
//!
//! Forms validate into a [`FieldErrors`] map keyed by a small field enum. An
//! empty map means the form may be submitted. The map serializes as a JSON
//! object (`{"address": "Address is required"}`) so front ends can show each
//! message next to its input.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A form field with a stable wire name.
pub trait FormField: Copy + Ord {
    /// Key used when rendering or serializing errors (e.g. `postalCode`).
    fn key(self) -> &'static str;
}

/// Field name → error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors<F: Ord> {
    errors: BTreeMap<F, String>,
}

impl<F: Ord> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: FormField> FieldErrors<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field`, replacing any earlier message.
    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Record `message` for `field` when `failed` is true.
    pub fn check(&mut self, failed: bool, field: F, message: &str) {
        if failed {
            self.insert(field, message);
        }
    }

    /// The message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: F) -> bool {
        self.errors.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Failed fields and their messages, in field order.
    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// `Ok(value)` when no field failed, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the error map itself when it is non-empty.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl<F: FormField> fmt::Display for FieldErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {message}", field.key())?;
            first = false;
        }
        Ok(())
    }
}

impl<F: FormField + fmt::Debug> std::error::Error for FieldErrors<F> {}
