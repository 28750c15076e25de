//! Authentication state for the presentation layer.
//!
//! [`AuthStore`] wraps an [`AuthProvider`] and keeps a small observable state:
//! who is signed in, whether a call is in flight and the last error message.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tote_core::{Email, EmailError, User};
use tracing::{info, instrument, warn};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::remote::{AuthProvider, RemoteError};

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No password given.
    #[error("password is required")]
    MissingPassword,

    /// The auth backend rejected the call.
    #[error("{0}")]
    Remote(#[from] RemoteError),
}

/// Observable auth state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    /// Loading until the first [`AuthStore::load_user`] completes.
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
            error: None,
        }
    }
}

/// Auth operations plus the state they leave behind.
pub struct AuthStore<A> {
    provider: A,
    state: AuthState,
}

impl<A: AuthProvider> AuthStore<A> {
    pub fn new(provider: A) -> Self {
        Self {
            provider,
            state: AuthState::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    /// Create an account.
    ///
    /// Signs the user in when the backend opens a session right away. When the
    /// address must be confirmed first, returns `Ok(None)` and stays signed out.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed email, a blank password, or a backend
    /// rejection. The message is also kept in [`AuthState::error`].
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &SecretString,
    ) -> Result<Option<User>, AuthError> {
        self.begin();
        let result: Result<Option<User>, AuthError> = async {
            let email = parse_credentials(email, password)?;
            Ok(self.provider.sign_up(&email, password).await?)
        }
        .await;

        match result {
            Ok(Some(user)) => {
                self.signed_in(user.clone());
                Ok(Some(user))
            }
            Ok(None) => {
                info!("Account created, awaiting email confirmation");
                self.state.is_loading = false;
                Ok(None)
            }
            Err(err) => Err(self.failed(err)),
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed email, a blank password, or rejected
    /// credentials. The message is also kept in [`AuthState::error`].
    #[instrument(skip(self, password))]
    pub async fn sign_in(&mut self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        self.begin();
        let result: Result<User, AuthError> = async {
            let email = parse_credentials(email, password)?;
            Ok(self.provider.sign_in(&email, password).await?)
        }
        .await;

        match result {
            Ok(user) => {
                self.signed_in(user.clone());
                Ok(user)
            }
            Err(err) => Err(self.failed(err)),
        }
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses; the user stays signed in.
    #[instrument(skip(self))]
    pub async fn sign_out(&mut self) -> Result<(), AuthError> {
        self.begin();
        match self.provider.sign_out().await {
            Ok(()) => {
                clear_sentry_user();
                self.state.user = None;
                self.state.is_authenticated = false;
                self.state.is_loading = false;
                Ok(())
            }
            Err(err) => Err(self.failed(err.into())),
        }
    }

    /// Restore state from the provider's current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session could not be refreshed; the store is
    /// signed out in that case.
    #[instrument(skip(self))]
    pub async fn load_user(&mut self) -> Result<Option<User>, AuthError> {
        self.begin();
        match self.provider.session_user().await {
            Ok(Some(user)) => {
                self.signed_in(user.clone());
                Ok(Some(user))
            }
            Ok(None) => {
                self.state.user = None;
                self.state.is_authenticated = false;
                self.state.is_loading = false;
                Ok(None)
            }
            Err(err) => {
                self.state.user = None;
                self.state.is_authenticated = false;
                Err(self.failed(err.into()))
            }
        }
    }

    fn begin(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
    }

    fn signed_in(&mut self, user: User) {
        set_sentry_user(&user.id, user.email.as_ref().map(Email::as_str));
        self.state.user = Some(user);
        self.state.is_authenticated = true;
        self.state.is_loading = false;
    }

    fn failed(&mut self, err: AuthError) -> AuthError {
        warn!(error = %err, "Auth operation failed");
        self.state.error = Some(err.to_string());
        self.state.is_loading = false;
        err
    }
}

fn parse_credentials(email: &str, password: &SecretString) -> Result<Email, AuthError> {
    let email = Email::parse(email)?;
    if password.expose_secret().is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(email)
}
