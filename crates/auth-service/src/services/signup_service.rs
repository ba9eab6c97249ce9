//! Account registration.

use crate::config::Config;
use crate::crypto;
use crate::errors::AuthError;
use crate::models::{NewAccount, SignupRequest, SignupResponse};
use crate::observability::{self, metrics::record_signup};
use crate::repositories::accounts::AccountStore;
use secrecy::ExposeSecret;
use tracing::instrument;

/// Minimum accepted password length for new accounts.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Register a new account.
///
/// # Steps
///
/// 1. Validate email shape, password length, display name
/// 2. Reject an already-registered email
/// 3. Encrypt the password under the stored-password scheme, so the new
///    record is verifiable by the unchanged login path
/// 4. Insert
#[instrument(skip_all)]
pub async fn register(
    store: &dyn AccountStore,
    config: &Config,
    request: SignupRequest,
) -> Result<SignupResponse, AuthError> {
    if !is_valid_email(&request.email) {
        record_signup("invalid");
        return Err(AuthError::InvalidRequest(
            "invalid email address".to_string(),
        ));
    }

    if request.password.expose_secret().len() < MIN_PASSWORD_LENGTH {
        record_signup("invalid");
        return Err(AuthError::InvalidRequest(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let name = request.name.trim();
    if name.is_empty() {
        record_signup("invalid");
        return Err(AuthError::InvalidRequest("name must not be empty".to_string()));
    }

    let existing =
        match tokio::time::timeout(config.lookup_timeout, store.find_by_email(&request.email))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                record_signup("timeout");
                return Err(AuthError::LookupTimeout);
            }
        };

    if existing.is_some() {
        tracing::debug!(
            email_hash = %observability::hash_for_correlation(&request.email),
            "Signup rejected: email already registered"
        );
        record_signup("duplicate");
        return Err(AuthError::EmailTaken);
    }

    let ciphertext = crypto::encrypt_password(
        request.password.expose_secret(),
        config.password_key.expose_secret(),
    )?;

    // The unique index still backstops a concurrent signup race.
    store
        .insert(NewAccount {
            email: request.email.clone(),
            name: name.to_string(),
            password: ciphertext,
        })
        .await?;

    tracing::info!(
        email_hash = %observability::hash_for_correlation(&request.email),
        "Account registered"
    );
    record_signup("success");

    Ok(SignupResponse { success: true })
}

/// Basic email shape check: non-empty local part, domain with at least one
/// dot and no empty labels.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
