//! Deterministic fixtures: keys, configuration, and an in-memory account store.
//!
//! All key material here is fixed so tests are reproducible; nothing in this
//! module is suitable for production use.

use auth_service::config::{Config, DEFAULT_LOOKUP_TIMEOUT_MS};
use auth_service::crypto;
use auth_service::errors::AuthError;
use auth_service::models::{Account, NewAccount};
use auth_service::repositories::accounts::AccountStore;
use async_trait::async_trait;
use chrono::Utc;
use secrecy::{SecretSlice, SecretString};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// Deterministic 32-byte password encryption key for tests.
pub fn test_password_key() -> Vec<u8> {
    (0u8..32).collect()
}

/// Deterministic token signing secret for tests.
pub fn test_token_secret() -> String {
    "test-token-secret-0123456789abcdef".to_string()
}

/// Service configuration wired to the deterministic test keys.
///
/// `database_url` is unused when running over the in-memory store.
pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        bind_address: "127.0.0.1:0".to_string(),
        password_key: SecretSlice::from(test_password_key()),
        token_secret: SecretString::from(test_token_secret()),
        lookup_timeout: Duration::from_millis(DEFAULT_LOOKUP_TIMEOUT_MS),
    }
}

/// Same as [`test_config`] with an explicit account-lookup bound.
pub fn test_config_with_lookup_timeout(timeout: Duration) -> Config {
    let mut config = test_config();
    config.lookup_timeout = timeout;
    config
}

/// In-memory [`AccountStore`] keyed by email.
///
/// An optional artificial delay before each operation makes lookup-timeout
/// behavior testable without a real backing store.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<String, Account>>,
    delay: Option<Duration>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that sleeps for `delay` before serving each operation.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            delay: Some(delay),
        }
    }

    async fn simulate_latency(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        self.simulate_latency().await;

        let accounts = self.accounts.lock().expect("account store poisoned");
        Ok(accounts.get(email).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, AuthError> {
        self.simulate_latency().await;

        let mut accounts = self.accounts.lock().expect("account store poisoned");
        if accounts.contains_key(&account.email) {
            return Err(AuthError::EmailTaken);
        }

        let stored = Account {
            account_id: Uuid::new_v4(),
            email: account.email.clone(),
            name: account.name,
            password: account.password,
            created_at: Utc::now(),
        };
        accounts.insert(account.email, stored.clone());

        Ok(stored)
    }
}

/// Seed an account whose password is encrypted under the test key.
pub async fn seed_account(
    store: &MemoryAccountStore,
    email: &str,
    name: &str,
    password: &str,
) -> Account {
    let ciphertext =
        crypto::encrypt_password(password, &test_password_key()).expect("fixture encryption failed");

    store
        .insert(NewAccount {
            email: email.to_string(),
            name: name.to_string(),
            password: ciphertext,
        })
        .await
        .expect("fixture insert failed")
}

/// Seed an account with raw (possibly invalid) ciphertext.
pub async fn seed_account_ciphertext(
    store: &MemoryAccountStore,
    email: &str,
    name: &str,
    ciphertext: &str,
) -> Account {
    store
        .insert(NewAccount {
            email: email.to_string(),
            name: name.to_string(),
            password: ciphertext.to_string(),
        })
        .await
        .expect("fixture insert failed")
}
