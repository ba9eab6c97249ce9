//! Account repository module.
//!
//! The account store is an external collaborator: the login path performs a
//! single exact-match lookup by email, and signup adds a single insert. The
//! trait keeps the transport-free core testable against an in-memory store.

use crate::errors::AuthError;
use crate::models::{Account, NewAccount};
use async_trait::async_trait;
use sqlx::PgPool;

/// Exact-match account lookup and insertion.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch the account whose email exactly matches `email`, if any.
    ///
    /// Matching is case-sensitive equality on the stored value.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;

    /// Insert a new account.
    ///
    /// Fails with [`AuthError::EmailTaken`] when the email is already
    /// registered.
    async fn insert(&self, account: NewAccount) -> Result<Account, AuthError>;
}

/// PostgreSQL-backed account store.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, email, name, password, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(format!("Failed to fetch account by email: {}", e)))?;

        Ok(account)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, AuthError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, name, password)
            VALUES ($1, $2, $3)
            RETURNING account_id, email, name, password, created_at
            "#,
        )
        .bind(&account.email)
        .bind(&account.name)
        .bind(&account.password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Unique constraint violation means the email is already registered
            if e.to_string().contains("accounts_email_unique") {
                AuthError::EmailTaken
            } else {
                AuthError::Database(format!("Failed to create account: {}", e))
            }
        })?;

        Ok(account)
    }
}
