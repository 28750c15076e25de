//! Authenticated users.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// The signed-in user as reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Absent for phone-only or anonymous accounts.
    pub email: Option<Email>,
}

impl User {
    /// Email for display, or an empty string when the account has none.
    #[must_use]
    pub fn email_or_empty(&self) -> &str {
        self.email.as_ref().map_or("", Email::as_str)
    }
}
