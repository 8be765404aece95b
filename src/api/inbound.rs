//! Inbound scanning, approval queue and bulk import endpoints

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::db::inbound::{self, Delivery, ImportOutcome};
use crate::error::ApiResult;
use crate::intake;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub qr_data: String,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub success: bool,
    pub pallet: Delivery,
}

/// Submit one scanned pallet record.
pub async fn scan(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> ApiResult<ScanResponse> {
    let record = intake::parse_scan(&req.qr_data)?;
    let pallet = inbound::insert_pending(&state.pool, &record).await?;
    tracing::info!(batch_id = %pallet.batch_id, quantity = pallet.quantity, "pallet scanned");
    Ok(Json(ScanResponse {
        success: true,
        pallet,
    }))
}

pub async fn list_pending(State(state): State<AppState>) -> ApiResult<Vec<Delivery>> {
    let pending = inbound::list_pending(&state.pool).await?;
    Ok(Json(pending))
}

pub async fn approve(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> ApiResult<Value> {
    inbound::approve(&state.pool, &batch_id).await?;
    tracing::info!(batch_id = %batch_id, "delivery approved");
    Ok(Json(json!({ "success": true })))
}

pub async fn reject(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> ApiResult<Value> {
    inbound::reject(&state.pool, &batch_id).await?;
    tracing::info!(batch_id = %batch_id, "delivery rejected");
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Newline-delimited scan records, optionally preceded by a header line
    pub data: String,
}

/// Bulk import. Partial success is intentional here: valid lines commit as
/// a group, the rest come back as ordered per-line errors.
pub async fn import(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> ApiResult<ImportOutcome> {
    let outcome = inbound::import(&state.pool, &req.data).await?;
    tracing::info!(
        imported = outcome.imported,
        failed = outcome.errors.len(),
        "bulk import finished"
    );
    Ok(Json(outcome))
}

/// Suggest a pallet id for the operator form.
pub async fn suggest_pallet_id() -> Json<Value> {
    Json(json!({ "pallet_id": intake::generate_pallet_id() }))
}
