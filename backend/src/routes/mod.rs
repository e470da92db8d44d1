//! Route definitions for the Harvest crop planner API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Reference data
        .nest("/parcels", parcel_routes())
        .route("/crops", get(handlers::list_crops))
        // Engine
        .route("/predictions/monthly", post(handlers::predict_monthly))
        .route("/plans/annual", post(handlers::plan_annual))
}

/// Parcel routes
fn parcel_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_parcels))
        .route("/:parcel_id", get(handlers::get_parcel))
}
