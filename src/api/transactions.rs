//! Transaction ledger endpoints

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::db::transactions::{self, TransactionRecord};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

pub async fn recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Vec<TransactionRecord>> {
    let rows = transactions::recent(&state.pool, transactions::clamp_limit(query.limit)).await?;
    Ok(Json(rows))
}
