//! Signup, login, and token refresh endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use crate::error::ApiError;
use crate::services::auth::{
    AuthService, LoginRequest, RefreshRequest, SignupRequest, TokenResponse,
};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// `POST /api/v1/auth/signup` - register an account and sign it in.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let tokens = AuthService::new(&state).signup(req).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// `POST /api/v1/auth/login` - exchange credentials for a token pair.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let tokens = AuthService::new(&state).login(req).await?;
    Ok(Json(tokens))
}

/// `POST /api/v1/auth/refresh` - exchange a refresh token for a new pair.
async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let tokens = AuthService::new(&state).refresh(req).await?;
    Ok(Json(tokens))
}
