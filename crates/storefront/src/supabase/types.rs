//! Wire types for the auth and error payloads.
//!
//! Table rows decode straight into the `tote-core` records; only the auth
//! service and error bodies need types of their own.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use secrecy::SecretString;
use serde::Deserialize;
use serde::de::Error as _;
use tote_core::{Email, User, UserId};

use crate::remote::RemoteError;

/// Refresh this long before the access token actually expires.
const REFRESH_MARGIN_SECS: i64 = 60;

/// A signed-in session held in memory by the client.
#[derive(Clone)]
pub struct Session {
    pub(crate) access_token: SecretString,
    pub(crate) refresh_token: SecretString,
    pub(crate) expires_at: DateTime<Utc>,
    pub(crate) user: User,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// The session's user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// When the access token stops being accepted.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the access token should be refreshed before use at `now`.
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .checked_sub_signed(TimeDelta::seconds(REFRESH_MARGIN_SECS))
            .is_none_or(|refresh_at| refresh_at <= now)
    }
}

/// `POST /auth/v1/token` response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    /// Unix seconds. Older servers omit it.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl TokenResponse {
    /// Turn the grant into a session, anchoring a relative expiry at `now`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Parse` if the expiry does not fit in a timestamp.
    pub(crate) fn into_session(self, now: DateTime<Utc>) -> Result<Session, RemoteError> {
        let expires_at = match self
            .expires_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        {
            Some(at) => at,
            None => TimeDelta::try_seconds(self.expires_in)
                .and_then(|ttl| now.checked_add_signed(ttl))
                .ok_or_else(|| {
                    RemoteError::Parse(serde_json::Error::custom(format!(
                        "expires_in out of range: {}",
                        self.expires_in
                    )))
                })?,
        };

        Ok(Session {
            access_token: SecretString::from(self.access_token),
            refresh_token: SecretString::from(self.refresh_token),
            expires_at,
            user: self.user.into(),
        })
    }
}

/// User object embedded in auth responses.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<AuthUser> for User {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email.as_deref().and_then(|e| Email::parse(e).ok()),
        }
    }
}

/// `POST /auth/v1/signup` response: a full session when the project
/// auto-confirms, otherwise the bare (unconfirmed) user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpResponse {
    Session(TokenResponse),
    Pending(AuthUser),
}

/// Error body shapes returned by the REST, auth and storage services.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The most specific human-readable message present.
    pub(crate) fn into_message(self) -> Option<String> {
        [self.message, self.msg, self.error_description, self.error]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOKEN_JSON: &str = r#"{
        "access_token": "at",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1900000000,
        "refresh_token": "rt",
        "user": {"id": "7d0b5b5e-2f52-4c43-8d8e-2b3c3d9a1e01", "email": "buyer@example.com"}
    }"#;

    #[test]
    fn test_token_response_uses_absolute_expiry() {
        let token: TokenResponse = serde_json::from_str(TOKEN_JSON).unwrap();
        let session = token.into_session(Utc::now()).unwrap();
        assert_eq!(session.expires_at().timestamp(), 1_900_000_000);
        assert_eq!(session.user().email_or_empty(), "buyer@example.com");
    }

    #[test]
    fn test_token_response_falls_back_to_relative_expiry() {
        let json = TOKEN_JSON.replace("\"expires_at\": 1900000000,", "");
        let token: TokenResponse = serde_json::from_str(&json).unwrap();
        let now = Utc::now();
        let session = token.into_session(now).unwrap();
        assert_eq!(session.expires_at(), now + TimeDelta::seconds(3600));
    }

    #[test]
    fn test_out_of_range_expiry_is_a_parse_error() {
        let json = TOKEN_JSON
            .replace("\"expires_at\": 1900000000,", "")
            .replace("3600", &i64::MAX.to_string());
        let token: TokenResponse = serde_json::from_str(&json).unwrap();

        let err = token.into_session(Utc::now()).unwrap_err();
        assert!(matches!(err, RemoteError::Parse(_)));
        assert!(err.to_string().contains("expires_in out of range"));
    }

    #[test]
    fn test_unrepresentable_absolute_expiry_falls_back() {
        let json = TOKEN_JSON.replace("1900000000", &i64::MAX.to_string());
        let token: TokenResponse = serde_json::from_str(&json).unwrap();
        let now = Utc::now();

        let session = token.into_session(now).unwrap();
        assert_eq!(session.expires_at(), now + TimeDelta::seconds(3600));
    }

    #[test]
    fn test_needs_refresh_inside_margin() {
        let token: TokenResponse = serde_json::from_str(TOKEN_JSON).unwrap();
        let session = token.into_session(Utc::now()).unwrap();
        let expiry = session.expires_at();
        assert!(!session.needs_refresh(expiry - TimeDelta::seconds(120)));
        assert!(session.needs_refresh(expiry - TimeDelta::seconds(30)));
    }

    #[test]
    fn test_signup_response_variants() {
        let with_session: SignUpResponse = serde_json::from_str(TOKEN_JSON).unwrap();
        assert!(matches!(with_session, SignUpResponse::Session(_)));

        let pending: SignUpResponse = serde_json::from_str(
            r#"{"id": "7d0b5b5e-2f52-4c43-8d8e-2b3c3d9a1e01", "email": "new@example.com", "confirmation_sent_at": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(matches!(pending, SignUpResponse::Pending(_)));
    }

    #[test]
    fn test_error_body_prefers_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"code": "23505", "message": "duplicate key", "details": null}"#)
                .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("duplicate key"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "invalid_grant", "error_description": "Invalid login credentials"}"#)
                .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid login credentials"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"code": 400, "msg": "Password should be at least 6 characters"}"#).unwrap();
        assert_eq!(
            body.into_message().as_deref(),
            Some("Password should be at least 6 characters")
        );
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let token: TokenResponse = serde_json::from_str(TOKEN_JSON).unwrap();
        let debug = format!("{:?}", token.into_session(Utc::now()).unwrap());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("\"rt\""));
    }
}
