//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error Flow in Finvo                                │
//! │                                                                         │
//! │  Client                        Rust Backend                             │
//! │  ──────                        ────────────                             │
//! │                                                                         │
//! │  POST /api/v1/invoices                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                          │  │
//! │  │  Result<Json<T>, ApiError>                                        │  │
//! │  │         │                                                         │  │
//! │  │         ▼                                                         │  │
//! │  │  Validation Error? ── ValidationError::Required ──┐               │  │
//! │  │         │                                         │               │  │
//! │  │         ▼                                         ▼               │  │
//! │  │  Database Error? ──── DbError::UniqueViolation ─ ApiError ───────►│  │
//! │  │         │                                         ▲               │  │
//! │  │         ▼                                         │               │  │
//! │  │  Auth Error? ──────── AuthError::InvalidToken ────┘               │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──────────────────────────────────────────────────────────────────────│
//! │                                                                         │
//! │  HTTP 409                                                               │
//! │  { "code": "CONFLICT",                                                  │
//! │    "message": "invoices.invoice_number 'INV-003' already exists" }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Database internals (connection strings, SQL) never reach the client:
//! the `From<DbError>` conversion logs the real error and substitutes a
//! generic message before anything is serialized.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use finvo_core::ValidationError;
use finvo_db::DbError;

use crate::auth::AuthError;

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// This is the response body a client receives when a request fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Invoice not found: 7c9e6679-7425-40de-944b-e07fc1f90ae7"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
///
/// Each code maps to exactly one HTTP status; clients switch on the code,
/// not on the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Missing or invalid credentials (401)
    Unauthorized,

    /// Uniqueness conflict, e.g. duplicate email (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Conflict, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// HTTP status for this error's code.
    pub fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts database errors to API errors.
///
/// Variants that may carry internals are logged here and replaced with a
/// generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::conflict(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts auth errors to API errors.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::unauthorized("Invalid email or password")
            }
            AuthError::InvalidToken(reason) => {
                ApiError::unauthorized(format!("Invalid token: {}", reason))
            }
            AuthError::TokenCreation(e) => {
                tracing::error!("Token generation failed: {}", e);
                ApiError::internal("Authentication failed")
            }
            AuthError::Hash(e) => {
                tracing::error!("Password hashing failed: {}", e);
                ApiError::internal("Authentication failed")
            }
            AuthError::Db(e) => ApiError::from(e),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_400() {
        let err = ApiError::from(ValidationError::Required {
            field: "items".to_string(),
        });
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "items is required");
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = ApiError::from(DbError::UniqueViolation {
            field: "accounts.email".to_string(),
            value: "tony@stark.com".to_string(),
        });
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(err.message.contains("tony@stark.com"));
    }

    #[test]
    fn test_query_failure_hides_internals() {
        let err = ApiError::from(DbError::QueryFailed(
            "near \"SELCT\": syntax error".to_string(),
        ));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_invalid_credentials_maps_to_401() {
        let err = ApiError::from(AuthError::InvalidCredentials);
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_serializes_code_and_message() {
        let err = ApiError::not_found("Invoice", "abc-123");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":\"NOT_FOUND\""));
        assert!(json.contains("Invoice not found: abc-123"));
    }
}
