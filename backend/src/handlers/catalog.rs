//! Catalog HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::models::CropQuery;
use crate::services::CatalogService;
use crate::AppState;

/// List all parcels
pub async fn list_parcels(State(state): State<AppState>) -> impl IntoResponse {
    let service = CatalogService::new(state.catalog.clone());

    let parcels = service.list_parcels();
    (StatusCode::OK, Json(serde_json::json!({ "parcels": parcels }))).into_response()
}

/// Get a specific parcel
pub async fn get_parcel(
    State(state): State<AppState>,
    Path(parcel_id): Path<String>,
) -> impl IntoResponse {
    let service = CatalogService::new(state.catalog.clone());

    match service.get_parcel(&parcel_id) {
        Ok(parcel) => (StatusCode::OK, Json(parcel)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List crops, optionally only those plantable in a month
pub async fn list_crops(
    State(state): State<AppState>,
    Query(query): Query<CropQuery>,
) -> impl IntoResponse {
    let service = CatalogService::new(state.catalog.clone());

    match service.list_crops(&query) {
        Ok(crops) => (StatusCode::OK, Json(serde_json::json!({ "crops": crops }))).into_response(),
        Err(e) => e.into_response(),
    }
}
