//! Email/password sessions through the auth API.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tote_core::{Email, User};
use tracing::{debug, instrument};

use super::client::SupabaseClient;
use super::types::{Session, SignUpResponse, TokenResponse};
use crate::remote::RemoteError;

impl SupabaseClient {
    /// Create an account.
    ///
    /// Stores the session when the project auto-confirms new users.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the sign-up.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Option<User>, RemoteError> {
        let request = self
            .inner
            .http
            .post(self.endpoint("auth/v1/signup"))
            .json(&credentials(email, password));

        let response = self.send_with_token(request, &self.inner.anon_key).await?;
        match Self::json::<SignUpResponse>(response).await? {
            SignUpResponse::Session(token) => {
                let user = self.store_session(token).await?;
                Ok(Some(user))
            }
            SignUpResponse::Pending(user) => {
                debug!(user_id = %user.id, "Sign-up awaiting email confirmation");
                Ok(None)
            }
        }
    }

    /// Sign in with email and password and keep the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<User, RemoteError> {
        let request = self
            .inner
            .http
            .post(self.endpoint("auth/v1/token?grant_type=password"))
            .json(&credentials(email, password));

        let response = self.send_with_token(request, &self.inner.anon_key).await?;
        let token: TokenResponse = Self::json(response).await?;
        self.store_session(token).await
    }

    /// Revoke the current session and forget it locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the sign-out; the local
    /// session is kept in that case.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), RemoteError> {
        let Some(session) = self.session().await else {
            return Ok(());
        };

        let request = self.inner.http.post(self.endpoint("auth/v1/logout"));
        self.send_with_token(request, &session.access_token).await?;

        *self.inner.session.write().await = None;
        debug!(user_id = %session.user.id, "Signed out");
        Ok(())
    }

    /// Exchange a refresh token for a new session.
    pub(super) async fn refresh(&self, refresh_token: &SecretString) -> Result<Session, RemoteError> {
        let request = self
            .inner
            .http
            .post(self.endpoint("auth/v1/token?grant_type=refresh_token"))
            .json(&serde_json::json!({ "refresh_token": refresh_token.expose_secret() }));

        let response = self.send_with_token(request, &self.inner.anon_key).await?;
        let token: TokenResponse = Self::json(response).await?;
        token.into_session(Utc::now())
    }

    async fn store_session(&self, token: TokenResponse) -> Result<User, RemoteError> {
        let session = token.into_session(Utc::now())?;
        let user = session.user.clone();
        debug!(user_id = %user.id, expires_at = %session.expires_at, "Session stored");
        *self.inner.session.write().await = Some(session);
        Ok(user)
    }
}

fn credentials(email: &Email, password: &SecretString) -> serde_json::Value {
    serde_json::json!({
        "email": email.as_str(),
        "password": password.expose_secret(),
    })
}
