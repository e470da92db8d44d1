//! API request and response models
//!
//! Re-exports the engine's formatted shapes and adds the HTTP envelopes around them

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use shared::engine::formatter::{FormattedMonthlyPrediction, FormattedRotationPlan};
use shared::{Crop, Parcel};

/// Body of `POST /api/v1/predictions/monthly`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MonthlyPredictionInput {
    #[validate(length(min = 1, message = "parcel_id is required"))]
    pub parcel_id: String,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: u8,
    #[validate(range(min = 1, max = 100, message = "top_n must be between 1 and 100"))]
    pub top_n: Option<usize>,
    /// profit, yield, confidence, roi or suitability
    pub ranking_method: Option<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "min_confidence must be between 0 and 100"))]
    pub min_confidence: Option<f64>,
}

/// Body of `POST /api/v1/plans/annual`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnnualPlanInput {
    #[validate(length(min = 1, message = "parcel_id is required"))]
    pub parcel_id: String,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub start_month: Option<u8>,
    #[validate(range(min = 0.0, message = "Diversification bonus cannot be negative"))]
    pub diversification_bonus: Option<f64>,
    pub min_profit_threshold: Option<Decimal>,
}

/// Query string of `GET /api/v1/crops`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CropQuery {
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub prediction: FormattedMonthlyPrediction,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub plan: FormattedRotationPlan,
}

#[derive(Debug, Serialize)]
pub struct ParcelSummary {
    pub id: String,
    pub name: String,
    pub region: String,
    pub soil_type: shared::SoilType,
    pub ground_type: shared::GroundType,
    pub soil_ph: Option<f64>,
    pub area_sqft: f64,
    pub acres: f64,
}

impl From<&Parcel> for ParcelSummary {
    fn from(p: &Parcel) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            region: p.region.clone(),
            soil_type: p.soil_type,
            ground_type: p.ground_type,
            soil_ph: p.soil_ph,
            area_sqft: p.area_sqft(),
            acres: (p.acres() * 10_000.0).round() / 10_000.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CropSummary {
    pub id: String,
    pub name: String,
    pub category: shared::CropCategory,
    pub planting_start: String,
    pub planting_end: String,
    pub base_yield_per_acre: f64,
    pub base_price_per_lb: Decimal,
}

impl From<&Crop> for CropSummary {
    fn from(c: &Crop) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            category: c.category,
            planting_start: c.planting_window.start.name().to_string(),
            planting_end: c.planting_window.end.name().to_string(),
            base_yield_per_acre: c.base_yield_per_acre,
            base_price_per_lb: c.base_price_per_lb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_input_validation() {
        let valid = MonthlyPredictionInput {
            parcel_id: "P1".to_string(),
            month: 9,
            top_n: Some(5),
            ranking_method: None,
            min_confidence: Some(60.0),
        };
        assert!(valid.validate().is_ok());

        let bad_month = MonthlyPredictionInput { month: 13, ..valid.clone() };
        assert!(bad_month.validate().is_err());

        let bad_top_n = MonthlyPredictionInput { top_n: Some(0), ..valid.clone() };
        assert!(bad_top_n.validate().is_err());

        let bad_confidence = MonthlyPredictionInput { min_confidence: Some(101.0), ..valid };
        assert!(bad_confidence.validate().is_err());
    }

    #[test]
    fn test_annual_input_validation() {
        let input = AnnualPlanInput {
            parcel_id: String::new(),
            start_month: Some(1),
            diversification_bonus: Some(0.1),
            min_profit_threshold: None,
        };
        assert!(input.validate().is_err());

        let input = AnnualPlanInput {
            parcel_id: "P1".to_string(),
            diversification_bonus: Some(-0.5),
            ..input
        };
        assert!(input.validate().is_err());
    }
}
