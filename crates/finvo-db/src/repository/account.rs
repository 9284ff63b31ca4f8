//! # Account Repository
//!
//! Database operations for billing accounts.
//!
//! Accounts exist for two reasons: they own an isolated invoice series,
//! and their password hash backs the credential verifier in the server.
//! The reserved anonymous account is seeded by the initial migration and
//! never created through this repository.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use finvo_core::Account;

/// Repository for account database operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Inserts a new account.
    ///
    /// Fails with `DbError::UniqueViolation` when the email is already
    /// registered.
    pub async fn create(&self, account: &Account) -> DbResult<()> {
        debug!(id = %account.id, email = %account.email, "Creating account");

        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, display_name, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&account.id)
        .bind(&account.email)
        .bind(&account.display_name)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks up an account by login email.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, display_name, password_hash, created_at
            FROM accounts
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Account::from))
    }

    /// Looks up an account by ID.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, display_name, password_hash, created_at
            FROM accounts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Account::from))
    }
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, FromRow)]
struct AccountRow {
    id: String,
    email: String,
    display_name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
