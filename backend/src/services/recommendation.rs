//! Recommendation service: runs the engine for HTTP requests
//!
//! Engine calls are CPU-bound and synchronous, so they run on the blocking pool with a
//! shared catalog snapshot. The image order is forwarded in the background when enabled.

use std::sync::Arc;

use chrono::Utc;
use shared::engine::formatter::{format_monthly_prediction, format_rotation_plan};
use shared::{AnnualPlanRequest, Engine, InMemoryCatalog, MonthlyRequest, RankingMethod};
use uuid::Uuid;
use validator::Validate;

use crate::config::EngineConfig;
use crate::error::{AppError, AppResult};
use crate::external::{ImageContext, ImageSendClient};
use crate::models::{AnnualPlanInput, MonthlyPredictionInput, PlanResponse, PredictionResponse};

/// Service wrapping engine calls with defaults, logging and image forwarding
#[derive(Clone)]
pub struct RecommendationService {
    catalog: Arc<InMemoryCatalog>,
    engine_config: EngineConfig,
    image_client: Option<ImageSendClient>,
}

impl RecommendationService {
    pub fn new(
        catalog: Arc<InMemoryCatalog>,
        engine_config: EngineConfig,
        image_client: Option<ImageSendClient>,
    ) -> Self {
        Self {
            catalog,
            engine_config,
            image_client,
        }
    }

    /// Fill request defaults from configuration
    pub fn monthly_request(&self, input: &MonthlyPredictionInput) -> AppResult<MonthlyRequest> {
        input.validate()?;

        let ranking_method = match input.ranking_method.as_deref() {
            Some(method) => method
                .parse::<RankingMethod>()
                .map_err(|msg| AppError::Validation {
                    field: "ranking_method".to_string(),
                    message: msg.to_string(),
                })?,
            None => self.engine_config.default_ranking_method,
        };

        Ok(MonthlyRequest {
            parcel_id: input.parcel_id.clone(),
            month: input.month,
            top_n: input.top_n.unwrap_or(self.engine_config.default_top_n),
            ranking_method,
            min_confidence: input
                .min_confidence
                .unwrap_or(self.engine_config.default_min_confidence),
        })
    }

    /// Fill plan defaults from configuration
    pub fn annual_request(&self, input: &AnnualPlanInput) -> AppResult<AnnualPlanRequest> {
        input.validate()?;

        Ok(AnnualPlanRequest {
            parcel_id: input.parcel_id.clone(),
            start_month: input.start_month.unwrap_or(1),
            diversification_bonus: input
                .diversification_bonus
                .unwrap_or(self.engine_config.default_diversification_bonus),
            min_profit_threshold: input
                .min_profit_threshold
                .unwrap_or(self.engine_config.default_min_profit_threshold),
        })
    }

    /// Rank crops for one parcel and month
    pub async fn predict_month(&self, input: MonthlyPredictionInput) -> AppResult<PredictionResponse> {
        let request = self.monthly_request(&input)?;
        let catalog = self.catalog.clone();
        let settings = self.engine_config.settings();

        let prediction = tokio::task::spawn_blocking(move || {
            Engine::new(catalog.as_ref(), settings).predict_month(&request)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Prediction task failed: {}", e)))??;

        tracing::info!(
            parcel_id = %prediction.parcel_id,
            month = prediction.month.number(),
            method = %prediction.ranking_method,
            evaluated = prediction.candidates_evaluated,
            excluded = prediction.exclusions.len(),
            returned = prediction.recommendations.len(),
            "Monthly prediction complete"
        );

        let formatted = format_monthly_prediction(&prediction);
        self.forward_images(ImageContext::ShortTerm, formatted.image_order.clone());

        Ok(PredictionResponse {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            prediction: formatted,
        })
    }

    /// Build a 12-month rotation plan
    pub async fn plan_annual(&self, input: AnnualPlanInput) -> AppResult<PlanResponse> {
        let request = self.annual_request(&input)?;
        let catalog = self.catalog.clone();
        let settings = self.engine_config.settings();

        let plan = tokio::task::spawn_blocking(move || {
            Engine::new(catalog.as_ref(), settings).plan_annual(&request)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Planning task failed: {}", e)))??;

        tracing::info!(
            parcel_id = %plan.parcel_id,
            start_month = plan.start_month.number(),
            bonus = plan.diversification_bonus,
            planned = plan.summary.planned_months,
            fallow = plan.summary.fallow_months,
            distinct_crops = plan.summary.distinct_crops,
            "Annual plan complete"
        );

        let formatted = format_rotation_plan(&plan);
        self.forward_images(ImageContext::LongTerm, formatted.image_order.clone());

        Ok(PlanResponse {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            plan: formatted,
        })
    }

    /// Send the image order without holding up the response
    fn forward_images(&self, context: ImageContext, crop_names: Vec<String>) {
        let Some(client) = self.image_client.clone() else {
            return;
        };
        if crop_names.is_empty() {
            return;
        }

        tokio::spawn(async move {
            match client.send(context, &crop_names).await {
                Ok(response) => tracing::debug!(
                    success = response.success,
                    message = ?response.message,
                    "Image order forwarded"
                ),
                Err(e) => tracing::warn!("Image forwarding failed: {}", e),
            }
        });
    }
}
