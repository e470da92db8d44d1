//! Monthly prediction and annual plan HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::models::{AnnualPlanInput, MonthlyPredictionInput};
use crate::services::RecommendationService;
use crate::AppState;

fn service(state: &AppState) -> RecommendationService {
    RecommendationService::new(
        state.catalog.clone(),
        state.config.engine.clone(),
        state.image_client.clone(),
    )
}

/// Rank crops for a parcel in one month
pub async fn predict_monthly(
    State(state): State<AppState>,
    Json(input): Json<MonthlyPredictionInput>,
) -> impl IntoResponse {
    match service(&state).predict_month(input).await {
        Ok(prediction) => (StatusCode::OK, Json(prediction)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Build a 12-month rotation plan for a parcel
pub async fn plan_annual(
    State(state): State<AppState>,
    Json(input): Json<AnnualPlanInput>,
) -> impl IntoResponse {
    match service(&state).plan_annual(input).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => e.into_response(),
    }
}
