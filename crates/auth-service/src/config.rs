use base64::{engine::general_purpose, Engine as _};
use secrecy::{SecretSlice, SecretString};
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default listen address when `BIND_ADDRESS` is not set.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default bound on a single account-store lookup, in milliseconds.
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;

/// Required length of the decoded password encryption key (AES-256).
pub const PASSWORD_KEY_LEN: usize = 32;

/// Service configuration, loaded once at process start.
///
/// Both key materials are injected here rather than held as ambient
/// constants; `Debug` output redacts them.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// 32-byte key for the reversible stored-password encryption scheme.
    pub password_key: SecretSlice<u8>,
    /// Shared secret for session-token signing.
    pub token_secret: SecretString,
    /// Upper bound on a single account-store lookup.
    pub lookup_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid password key: {0}")]
    InvalidPasswordKey(String),

    #[error("Invalid token secret: {0}")]
    InvalidTokenSecret(String),

    #[error("Invalid lookup timeout: {0}")]
    InvalidLookupTimeout(String),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let password_key_base64 = vars
            .get("AUTH_PASSWORD_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_PASSWORD_KEY".to_string()))?;

        let password_key = general_purpose::STANDARD
            .decode(password_key_base64)
            .map_err(ConfigError::Base64Error)?;

        if password_key.len() != PASSWORD_KEY_LEN {
            return Err(ConfigError::InvalidPasswordKey(format!(
                "Expected {} bytes, got {}",
                PASSWORD_KEY_LEN,
                password_key.len()
            )));
        }

        let token_secret = vars
            .get("AUTH_TOKEN_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_TOKEN_SECRET".to_string()))?;

        if token_secret.is_empty() {
            return Err(ConfigError::InvalidTokenSecret(
                "must not be empty".to_string(),
            ));
        }

        let lookup_timeout_ms = match vars.get("AUTH_LOOKUP_TIMEOUT_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidLookupTimeout(format!("{}: {}", raw, e))
            })?,
            None => DEFAULT_LOOKUP_TIMEOUT_MS,
        };

        Ok(Config {
            database_url,
            bind_address,
            password_key: SecretSlice::from(password_key),
            token_secret: SecretString::from(token_secret.clone()),
            lookup_timeout: Duration::from_millis(lookup_timeout_ms),
        })
    }
}
