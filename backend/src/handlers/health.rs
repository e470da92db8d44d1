//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use shared::CatalogRepository;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub crops: usize,
    pub parcels: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        crops: state.catalog.list_crops().len(),
        parcels: state.catalog.list_parcels().len(),
    })
}
