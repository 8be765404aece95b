//! Manual stock adjustment endpoint
//!
//! Manual changes bypass the approval queue: they hit the registry and the
//! ledger directly, in one database transaction.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::plates::{self, Plate};
use crate::db::transactions::Direction;
use crate::error::{ApiResult, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ManualAdjustmentRequest {
    pub plate_size: String,
    pub quantity: i32,
    /// `in` or `out`; kept as a raw string so a bad value gets the same
    /// `error`-body 400 as every other rejected field instead of dying in
    /// the extractor
    #[serde(rename = "type")]
    pub direction: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ManualAdjustmentResponse {
    pub success: bool,
    pub plate: Plate,
}

fn validate(req: &ManualAdjustmentRequest) -> Result<Direction, AppError> {
    if req.quantity <= 0 {
        return Err(AppError::validation("Quantity must be greater than zero"));
    }
    Direction::parse(&req.direction).ok_or_else(|| {
        AppError::validation(format!("Type must be 'in' or 'out', got '{}'", req.direction))
    })
}

pub async fn manual_adjustment(
    State(state): State<AppState>,
    Json(req): Json<ManualAdjustmentRequest>,
) -> ApiResult<ManualAdjustmentResponse> {
    let direction = validate(&req)?;
    let plate = plates::adjust_stock(
        &state.pool,
        &req.plate_size,
        req.quantity,
        direction,
        req.notes.as_deref(),
    )
    .await?;
    tracing::info!(
        plate_size = %req.plate_size,
        quantity = req.quantity,
        direction = direction.as_str(),
        "manual adjustment"
    );
    Ok(Json(ManualAdjustmentResponse {
        success: true,
        plate,
    }))
}
