//! Invoice analysis endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use finvo_core::insights::InvoiceInsights;

use crate::error::ApiError;
use crate::services::billing::{BillingService, InsightsPrompt};
use crate::state::{AppState, CurrentAccount};

/// Build the insights router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/insights", get(insights))
        .route("/insights/prompt", get(insights_prompt))
}

/// `GET /api/v1/insights` - built-in heuristic analysis.
async fn insights(
    State(state): State<AppState>,
    account: CurrentAccount,
) -> Result<Json<InvoiceInsights>, ApiError> {
    let report = BillingService::new(&state)
        .insights(&account.account_id)
        .await?;
    Ok(Json(report))
}

/// `GET /api/v1/insights/prompt` - digest and prompt for external models.
async fn insights_prompt(
    State(state): State<AppState>,
    account: CurrentAccount,
) -> Result<Json<InsightsPrompt>, ApiError> {
    let pair = BillingService::new(&state)
        .insights_prompt(&account.account_id)
        .await?;
    Ok(Json(pair))
}
