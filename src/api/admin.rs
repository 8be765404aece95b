//! Destructive maintenance endpoints

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::db;
use crate::error::ApiResult;
use crate::state::AppState;

/// Clear all three tables: registry, queue and ledger.
pub async fn reset(State(state): State<AppState>) -> ApiResult<Value> {
    db::reset_all(&state.pool).await?;
    tracing::warn!("all inventory tables cleared");
    Ok(Json(json!({ "success": true })))
}
