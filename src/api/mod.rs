//! API routes

pub mod admin;
pub mod health;
pub mod inbound;
pub mod plates;
pub mod stats;
pub mod stock;
pub mod transactions;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/plates",
            get(plates::list_plates).post(plates::create_plate),
        )
        .route("/api/plates/{size}", put(plates::update_plate))
        .route("/api/inbound", post(inbound::scan))
        .route("/api/import", post(inbound::import))
        .route("/api/pending", get(inbound::list_pending))
        .route("/api/approve/{batch_id}", post(inbound::approve))
        .route("/api/reject/{batch_id}", post(inbound::reject))
        .route("/api/generate-pallet-id", get(inbound::suggest_pallet_id))
        .route("/api/manual", post(stock::manual_adjustment))
        .route("/api/transactions", get(transactions::recent))
        .route("/api/stats", get(stats::aggregate_counts))
        .route("/api/reset", post(admin::reset))
        .layer(TraceLayer::new_for_http())
        // Dashboard origin varies per deployment
        .layer(CorsLayer::permissive())
        .with_state(state)
}
