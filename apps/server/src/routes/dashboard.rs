//! Dashboard summary endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use finvo_core::dashboard::DashboardSummary;

use crate::error::ApiError;
use crate::services::billing::BillingService;
use crate::state::{AppState, CurrentAccount};

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// `GET /api/v1/dashboard` - total sales, outstanding, and monthly buckets.
async fn dashboard(
    State(state): State<AppState>,
    account: CurrentAccount,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = BillingService::new(&state)
        .dashboard(&account.account_id)
        .await?;
    Ok(Json(summary))
}
