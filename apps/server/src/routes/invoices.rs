//! Invoice collection endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use finvo_core::{Invoice, InvoiceDraft};

use crate::error::ApiError;
use crate::services::billing::BillingService;
use crate::state::{AppState, CurrentAccount};

/// Build the invoices router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/:id", get(get_invoice))
}

/// `GET /api/v1/invoices` - list the account's invoices.
async fn list_invoices(
    State(state): State<AppState>,
    account: CurrentAccount,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    let invoices = BillingService::new(&state)
        .list_invoices(&account.account_id)
        .await?;
    Ok(Json(invoices))
}

/// `POST /api/v1/invoices` - create an invoice from a draft.
async fn create_invoice(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(draft): Json<InvoiceDraft>,
) -> Result<(StatusCode, Json<Invoice>), ApiError> {
    let invoice = BillingService::new(&state)
        .create_invoice(&account.account_id, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// `GET /api/v1/invoices/:id` - fetch one invoice by storage id.
async fn get_invoice(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = BillingService::new(&state)
        .get_invoice(&account.account_id, &id)
        .await?;
    Ok(Json(invoice))
}
