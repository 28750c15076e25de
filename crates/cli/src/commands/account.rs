//! Account commands.

use secrecy::SecretString;
use tote_storefront::error::{self, AppError};
use tote_storefront::services::AuthStore;
use tote_storefront::state::AppState;
use tote_storefront::supabase::SupabaseClient;

use crate::{Credentials, output};

/// Sign in when both email and password were given.
///
/// Returns `false` without touching the backend when either is missing.
pub async fn sign_in_if_given(
    auth: &mut AuthStore<SupabaseClient>,
    credentials: &Credentials,
) -> error::Result<bool> {
    let (Some(email), Some(password)) = (&credentials.email, &credentials.password) else {
        return Ok(false);
    };
    let password = SecretString::from(password.clone());
    auth.sign_in(email, &password).await?;
    Ok(true)
}

fn require(credentials: &Credentials) -> error::Result<(&str, SecretString)> {
    match (&credentials.email, &credentials.password) {
        (Some(email), Some(password)) => Ok((email.as_str(), SecretString::from(password.clone()))),
        _ => Err(AppError::BadRequest(
            "--email and --password (or TOTE_EMAIL / TOTE_PASSWORD) are required".to_string(),
        )),
    }
}

/// `tote account sign-up`
pub async fn sign_up(state: &AppState, credentials: &Credentials, json: bool) -> error::Result<()> {
    let (email, password) = require(credentials)?;
    let mut auth = state.auth();

    let user = auth.sign_up(email, &password).await?;
    if user.is_none() {
        output::notice(&format!(
            "Check {email} for a confirmation link before signing in"
        ));
    }
    output::auth_state(auth.state(), json);
    Ok(())
}

/// `tote account check`
pub async fn check(state: &AppState, credentials: &Credentials, json: bool) -> error::Result<()> {
    let (email, password) = require(credentials)?;
    let mut auth = state.auth();

    auth.sign_in(email, &password).await?;
    auth.load_user().await?;
    output::auth_state(auth.state(), json);
    auth.sign_out().await?;
    Ok(())
}
