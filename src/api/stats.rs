//! Aggregate counters for the dashboard header

use axum::Json;
use axum::extract::State;

use crate::db::transactions::{self, Stats};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn aggregate_counts(State(state): State<AppState>) -> ApiResult<Stats> {
    let stats = transactions::aggregate_counts(&state.pool).await?;
    Ok(Json(stats))
}
