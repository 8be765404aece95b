//! Plate registry endpoints

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use crate::db::plates::{self, Plate};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_plates(State(state): State<AppState>) -> ApiResult<Vec<Plate>> {
    let plates = plates::list_plates(&state.pool).await?;
    Ok(Json(plates))
}

#[derive(Debug, Deserialize)]
pub struct CreatePlateRequest {
    pub size: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default = "default_threshold")]
    pub threshold: i32,
}

fn default_threshold() -> i32 {
    50
}

pub async fn create_plate(
    State(state): State<AppState>,
    Json(req): Json<CreatePlateRequest>,
) -> ApiResult<Plate> {
    let plate =
        plates::create_plate(&state.pool, req.size.trim(), req.quantity, req.threshold).await?;
    Ok(Json(plate))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlateRequest {
    pub quantity: i32,
    pub threshold: i32,
}

pub async fn update_plate(
    State(state): State<AppState>,
    Path(size): Path<String>,
    Json(req): Json<UpdatePlateRequest>,
) -> ApiResult<Plate> {
    let plate = plates::update_plate(&state.pool, &size, req.quantity, req.threshold).await?;
    Ok(Json(plate))
}
