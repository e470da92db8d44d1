//! Crop recommendation and rotation-planning engine
//!
//! The engine is synchronous and holds no state between calls. Every operation borrows
//! a read-only catalog, so one catalog can serve concurrent requests.

pub mod economics;
pub mod eligibility;
pub mod fertilizer;
pub mod formatter;
pub mod ranker;
pub mod rotation;
pub mod yield_model;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogRepository;
use crate::error::{EngineError, EngineResult};
use crate::models::{MonthlyPrediction, Parcel, RotationPlan};
use crate::types::{FertilizerPreference, Month, RankingMethod};
use crate::validation::validate_parcel_area;

pub use eligibility::{eligible_crops, evaluate_eligibility, WeatherBasis};
pub use yield_model::PenaltySettings;

/// Tunables shared by every engine operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct EngineSettings {
    pub penalties: PenaltySettings,
    pub fertilizer_preference: FertilizerPreference,
}

/// Input to a single-month prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyRequest {
    pub parcel_id: String,
    /// 1-12
    pub month: u8,
    pub top_n: usize,
    pub ranking_method: RankingMethod,
    /// 0-100
    pub min_confidence: f64,
}

/// Input to an annual rotation plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnualPlanRequest {
    pub parcel_id: String,
    /// 1-12
    pub start_month: u8,
    pub diversification_bonus: f64,
    pub min_profit_threshold: Decimal,
}

/// Engine bound to a catalog
pub struct Engine<'a, C: CatalogRepository + ?Sized> {
    catalog: &'a C,
    settings: EngineSettings,
}

impl<'a, C: CatalogRepository + ?Sized> Engine<'a, C> {
    pub fn new(catalog: &'a C, settings: EngineSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Rank the crops worth planting on a parcel in one month
    pub fn predict_month(&self, request: &MonthlyRequest) -> EngineResult<MonthlyPrediction> {
        ranker::predict_month(self.catalog, &self.settings, request)
    }

    /// Build a 12-month rotation plan for a parcel
    pub fn plan_annual(&self, request: &AnnualPlanRequest) -> EngineResult<RotationPlan> {
        rotation::plan_annual(self.catalog, &self.settings, request)
    }
}

pub(crate) fn parse_month(field: &str, value: u8) -> EngineResult<Month> {
    Month::try_from(value).map_err(|msg| EngineError::validation(field, msg))
}

/// Resolve a parcel and check that it has a usable area
pub(crate) fn resolve_parcel<'a, C: CatalogRepository + ?Sized>(
    catalog: &'a C,
    parcel_id: &str,
) -> EngineResult<&'a Parcel> {
    let parcel = catalog
        .get_parcel(parcel_id)
        .ok_or_else(|| EngineError::parcel_not_found(parcel_id))?;
    validate_parcel_area(parcel.area_sqft()).map_err(|msg| EngineError::validation("area", msg))?;
    Ok(parcel)
}
