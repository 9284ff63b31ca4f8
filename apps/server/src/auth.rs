//! JWT authentication and credential verification.
//!
//! Handles token generation and validation, password hashing, and the
//! pluggable credential check backed by the accounts table.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use finvo_core::Account;
use finvo_db::{AccountRepository, DbError};

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or password. Deliberately does not say which.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Token failed validation (bad signature, expired, wrong type).
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Token could not be generated.
    #[error("token generation failed: {0}")]
    TokenCreation(String),

    /// Password could not be hashed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Account lookup failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

// =============================================================================
// JWT
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,

    /// Account email at issue time
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,

    /// Token type ("access" or "refresh")
    pub token_type: String,
}

/// JWT token manager.
///
/// Issues an access/refresh pair per login; access tokens authorize API
/// calls, refresh tokens only mint new pairs.
pub struct JwtManager {
    secret: String,
    access_lifetime_secs: i64,
    refresh_lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, access_lifetime_secs: i64, refresh_lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            access_lifetime_secs,
            refresh_lifetime_secs,
        }
    }

    /// Generate an access token for an account.
    pub fn generate_access_token(&self, account_id: &str, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_lifetime_secs);

        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Generate a refresh token for an account.
    pub fn generate_refresh_token(
        &self,
        account_id: &str,
        email: &str,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.refresh_lifetime_secs);

        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: "refresh".to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }

    /// Validate that a token is an access token.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.validate_token(token)?;

        if claims.token_type != "access" {
            return Err(AuthError::InvalidToken("expected access token".to_string()));
        }

        Ok(claims)
    }

    /// Validate that a token is a refresh token.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.validate_token(token)?;

        if claims.token_type != "refresh" {
            return Err(AuthError::InvalidToken(
                "expected refresh token".to_string(),
            ));
        }

        Ok(claims)
    }
}

/// Extract bearer token from an Authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

// =============================================================================
// Passwords
// =============================================================================

/// Hashes a password with Argon2id, producing a PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Pluggable credential check.
///
/// The server has exactly one production implementation,
/// [`PasswordVerifier`]; the seam exists so tests can stub authentication
/// without a database.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Checks the credentials and returns the verified account.
    async fn verify(&self, email: &str, password: &str) -> Result<Account, AuthError>;
}

/// Verifies credentials against the accounts table with Argon2id.
pub struct PasswordVerifier {
    accounts: AccountRepository,
}

impl PasswordVerifier {
    /// Create a verifier over the given account repository.
    pub fn new(accounts: AccountRepository) -> Self {
        PasswordVerifier { accounts }
    }
}

#[async_trait]
impl CredentialVerifier for PasswordVerifier {
    async fn verify(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let account = match self.accounts.find_by_email(email).await? {
            Some(account) => account,
            None => return Err(AuthError::InvalidCredentials),
        };

        // The locked hash "!" never parses as a PHC string, so locked
        // accounts (the anonymous row) fail here like any wrong password.
        let parsed =
            PasswordHash::new(&account.password_hash).map_err(|_| AuthError::InvalidCredentials)?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600, 86400);

        let access_token = manager
            .generate_access_token("acct-001", "bruce@wayne.com")
            .unwrap();

        let claims = manager.validate_access_token(&access_token).unwrap();

        assert_eq!(claims.sub, "acct-001");
        assert_eq!(claims.email, "bruce@wayne.com");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_refresh_token() {
        let manager = JwtManager::new("test-secret".to_string(), 3600, 86400);

        let refresh_token = manager
            .generate_refresh_token("acct-001", "bruce@wayne.com")
            .unwrap();

        let claims = manager.validate_refresh_token(&refresh_token).unwrap();
        assert_eq!(claims.token_type, "refresh");
    }

    #[test]
    fn test_wrong_token_type() {
        let manager = JwtManager::new("test-secret".to_string(), 3600, 86400);

        let access_token = manager
            .generate_access_token("acct-001", "bruce@wayne.com")
            .unwrap();

        // An access token must not pass as a refresh token
        let result = manager.validate_refresh_token(&access_token);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = JwtManager::new("test-secret".to_string(), 3600, 86400);
        let other = JwtManager::new("other-secret".to_string(), 3600, 86400);

        let token = manager
            .generate_access_token("acct-001", "bruce@wayne.com")
            .unwrap();

        assert!(other.validate_access_token(&token).is_err());
        assert!(manager.validate_access_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default()
            .verify_password(b"correct horse battery staple", &parsed)
            .is_ok());
        assert!(Argon2::default()
            .verify_password(b"wrong password", &parsed)
            .is_err());
    }

    #[test]
    fn test_locked_hash_never_parses() {
        // The anonymous account is seeded with this sentinel
        assert!(PasswordHash::new("!").is_err());
    }
}
