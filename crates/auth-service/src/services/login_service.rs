//! Credential verification and session issuance.

use crate::config::Config;
use crate::crypto;
use crate::errors::AuthError;
use crate::models::LoginResponse;
use crate::observability::{self, metrics::record_login};
use crate::repositories::accounts::AccountStore;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use std::time::Instant;
use tracing::instrument;

/// Verify an email/password pair and issue a session token.
///
/// Performs exactly one read against the account store, bounded by the
/// configured lookup timeout. A token is issued if and only if an account
/// with the submitted email exists and its decrypted stored password equals
/// the submitted plaintext.
///
/// Stored ciphertext that fails to decrypt (corrupt record, wrong key) is an
/// internal error, not a credential failure.
#[instrument(skip_all)]
pub async fn authenticate(
    store: &dyn AccountStore,
    config: &Config,
    email: &str,
    password: &SecretString,
) -> Result<LoginResponse, AuthError> {
    let started = Instant::now();

    let lookup = tokio::time::timeout(config.lookup_timeout, store.find_by_email(email)).await;

    let account = match lookup {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(
                email_hash = %observability::hash_for_correlation(email),
                timeout_ms = config.lookup_timeout.as_millis() as u64,
                "Account lookup timed out"
            );
            record_login("timeout", started.elapsed());
            return Err(AuthError::LookupTimeout);
        }
    };

    let Some(account) = account else {
        tracing::debug!(
            email_hash = %observability::hash_for_correlation(email),
            "Login rejected: no matching account"
        );
        record_login("not_found", started.elapsed());
        return Err(AuthError::NotFound);
    };

    let stored_password =
        match crypto::decrypt_password(&account.password, config.password_key.expose_secret()) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                tracing::error!(
                    email_hash = %observability::hash_for_correlation(email),
                    "Stored password failed to decrypt: {}",
                    e
                );
                record_login("error", started.elapsed());
                return Err(e);
            }
        };

    if stored_password != password.expose_secret() {
        tracing::debug!(
            email_hash = %observability::hash_for_correlation(email),
            "Login rejected: credential mismatch"
        );
        record_login("mismatch", started.elapsed());
        return Err(AuthError::CredentialMismatch);
    }

    let claims = crypto::session_claims(&account.email, &account.name, Utc::now().timestamp());
    let token = match crypto::sign_session_token(&claims, config.token_secret.expose_secret()) {
        Ok(token) => token,
        Err(e) => {
            record_login("error", started.elapsed());
            return Err(e);
        }
    };

    record_login("success", started.elapsed());

    Ok(LoginResponse {
        success: true,
        token,
    })
}
