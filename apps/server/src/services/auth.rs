//! Account signup, login, and token refresh.
//!
//! All three workflows end the same way: a fresh access/refresh token
//! pair for the account. Failures never reveal whether the email or the
//! password was wrong.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use finvo_core::{Account, ValidationError};
use finvo_db::AccountRepository;

use crate::auth::{hash_password, CredentialVerifier, JwtManager};
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Request body for `POST /api/v1/auth/signup`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    /// Defaults to the email's local part when omitted.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Request body for `POST /api/v1/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /api/v1/auth/refresh`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair issued on signup, login, and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// =============================================================================
// Service
// =============================================================================

/// Account signup/login/refresh workflows.
pub struct AuthService {
    accounts: AccountRepository,
    verifier: Arc<dyn CredentialVerifier>,
    jwt: Arc<JwtManager>,
    access_lifetime_secs: i64,
}

impl AuthService {
    /// Create an auth service over the shared state.
    pub fn new(state: &AppState) -> Self {
        AuthService {
            accounts: state.db.accounts(),
            verifier: state.verifier.clone(),
            jwt: state.jwt.clone(),
            access_lifetime_secs: state.config.jwt_access_lifetime_secs,
        }
    }

    /// Registers a new account and signs it in.
    pub async fn signup(&self, req: SignupRequest) -> Result<TokenResponse, ApiError> {
        let email = req.email.trim().to_lowercase();
        validate_signup(&email, &req.password)?;

        let display_name = req
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| match email.split_once('@') {
                Some((local, _)) => local.to_string(),
                None => email.clone(),
            });

        let password_hash = hash_password(&req.password)?;

        let account = Account {
            id: Uuid::new_v4().to_string(),
            email,
            display_name,
            password_hash,
            created_at: Utc::now(),
        };

        // A taken email surfaces as a UniqueViolation, serialized as 409
        self.accounts.create(&account).await?;

        info!(account_id = %account.id, email = %account.email, "Account created");

        self.issue_tokens(&account.id, &account.email)
    }

    /// Exchanges credentials for a token pair.
    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse, ApiError> {
        let email = req.email.trim().to_lowercase();

        let account = match self.verifier.verify(&email, &req.password).await {
            Ok(account) => account,
            Err(e) => {
                warn!(email = %email, error = %e, "Login rejected");
                return Err(ApiError::from(e));
            }
        };

        info!(account_id = %account.id, "Login succeeded");

        self.issue_tokens(&account.id, &account.email)
    }

    /// Exchanges a refresh token for a fresh pair.
    pub async fn refresh(&self, req: RefreshRequest) -> Result<TokenResponse, ApiError> {
        let claims = self.jwt.validate_refresh_token(&req.refresh_token)?;

        info!(account_id = %claims.sub, "Token refreshed");

        self.issue_tokens(&claims.sub, &claims.email)
    }

    fn issue_tokens(&self, account_id: &str, email: &str) -> Result<TokenResponse, ApiError> {
        let access_token = self.jwt.generate_access_token(account_id, email)?;
        let refresh_token = self.jwt.generate_refresh_token(account_id, email)?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_lifetime_secs,
        })
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Signup input rules: well-formed email, password of at least 6 chars.
fn validate_signup(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    if password.len() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_signup_accepts_good_input() {
        assert!(validate_signup("bruce@wayne.com", "darkknight").is_ok());
    }

    #[test]
    fn test_validate_signup_rejects_bad_email() {
        assert!(validate_signup("", "darkknight").is_err());
        assert!(validate_signup("no-at-sign", "darkknight").is_err());
        assert!(validate_signup("@wayne.com", "darkknight").is_err());
        assert!(validate_signup("bruce@", "darkknight").is_err());
        assert!(validate_signup("bruce wayne@wayne.com", "darkknight").is_err());
    }

    #[test]
    fn test_validate_signup_rejects_short_password() {
        assert!(validate_signup("bruce@wayne.com", "12345").is_err());
        assert!(validate_signup("bruce@wayne.com", "123456").is_ok());
    }
}
