//! Shared application state and request extractors.

use std::collections::HashMap;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tokio::sync::{Mutex, OwnedMutexGuard};

use finvo_core::ANONYMOUS_ACCOUNT_ID;
use finvo_db::Database;

use crate::auth::{extract_bearer_token, CredentialVerifier, JwtManager, PasswordVerifier};
use crate::config::ServerConfig;
use crate::error::ApiError;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// Cheap to clone: everything inside is an Arc or an Arc-backed pool.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (connection pool + repositories)
    pub db: Database,

    /// Server configuration loaded at startup
    pub config: ServerConfig,

    /// Token issuing and validation
    pub jwt: Arc<JwtManager>,

    /// Credential check used by login
    pub verifier: Arc<dyn CredentialVerifier>,

    /// Per-account invoice creation locks
    pub locks: AccountLocks,
}

impl AppState {
    /// Builds the production state with the password verifier.
    pub fn new(db: Database, config: ServerConfig) -> Self {
        let jwt = Arc::new(JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_access_lifetime_secs,
            config.jwt_refresh_lifetime_secs,
        ));
        let verifier: Arc<dyn CredentialVerifier> = Arc::new(PasswordVerifier::new(db.accounts()));

        AppState {
            db,
            config,
            jwt,
            verifier,
            locks: AccountLocks::default(),
        }
    }
}

// =============================================================================
// Per-Account Creation Locks
// =============================================================================

/// Per-account creation locks.
///
/// Invoice creation reads the account's existing numbers, derives the
/// next one and appends, in separate steps; the lock serializes that
/// window per account so two concurrent creates cannot derive the same
/// number. The `UNIQUE(account_id, invoice_number)` constraint backs
/// this up at the storage layer.
#[derive(Clone, Default)]
pub struct AccountLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl AccountLocks {
    /// Locks the given account for invoice creation.
    ///
    /// Entries are created on first use and never evicted; the footprint
    /// is one mutex per account that ever created an invoice.
    pub async fn lock(&self, account_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(account_id.to_string()).or_default().clone()
        };

        lock.lock_owned().await
    }
}

// =============================================================================
// Current Account Extractor
// =============================================================================

/// The account a request acts for.
///
/// Requests without an Authorization header fall back to the shared
/// anonymous account, so invoicing works before signup. A header that is
/// present but invalid is a hard 401, never a silent fallback.
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub account_id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let raw = match header {
            None => {
                return Ok(CurrentAccount {
                    account_id: ANONYMOUS_ACCOUNT_ID.to_string(),
                })
            }
            Some(raw) => raw,
        };

        let token = extract_bearer_token(raw)
            .ok_or_else(|| ApiError::unauthorized("Malformed Authorization header"))?;

        let claims = state.jwt.validate_access_token(token)?;

        Ok(CurrentAccount {
            account_id: claims.sub,
        })
    }
}
