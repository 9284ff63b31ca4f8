//! # finvo-server: HTTP API for Finvo
//!
//! Thin axum glue over `finvo_core` and `finvo_db`: parse the request,
//! resolve the calling account, run a workflow, serialize the result.
//!
//! ## API Surface
//!
//! | Method | Path                      | Handler                        |
//! |--------|---------------------------|--------------------------------|
//! | GET    | `/health`                 | liveness + database check      |
//! | POST   | `/api/v1/auth/signup`     | register, returns token pair   |
//! | POST   | `/api/v1/auth/login`      | credentials to token pair      |
//! | POST   | `/api/v1/auth/refresh`    | refresh token to new pair      |
//! | GET    | `/api/v1/invoices`        | list account invoices          |
//! | POST   | `/api/v1/invoices`        | create invoice from draft      |
//! | GET    | `/api/v1/invoices/:id`    | fetch one invoice              |
//! | GET    | `/api/v1/dashboard`       | totals + monthly sales         |
//! | GET    | `/api/v1/insights`        | heuristic analysis             |
//! | GET    | `/api/v1/insights/prompt` | digest + prompt for a model    |
//!
//! Requests without an Authorization header act as the shared anonymous
//! account; `Bearer` access tokens scope requests to their own account.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// The health probe stays outside `/api/v1` so load balancers can reach
/// it without versioned paths.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::auth::router())
        .merge(routes::invoices::router())
        .merge(routes::dashboard::router())
        .merge(routes::insights::router());

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
