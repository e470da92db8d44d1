//! Monthly recommendation models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::crop::CropCategory;
use crate::models::fertilizer::FertilizerChoice;
use crate::models::weather::WeatherSource;
use crate::types::{Month, RankingMethod};

/// Ranked recommendations for one parcel and month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyPrediction {
    pub parcel_id: String,
    pub month: Month,
    pub ranking_method: RankingMethod,
    /// Eligible crops that were scored
    pub candidates_evaluated: usize,
    /// Scored crops dropped for falling below the confidence threshold
    pub below_confidence: usize,
    pub recommendations: Vec<RecommendationRecord>,
    pub exclusions: Vec<Exclusion>,
}

impl MonthlyPrediction {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

/// One scored crop for a parcel and month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRecord {
    /// 1-based position after ranking; 0 until ranked
    pub rank: usize,
    pub crop_id: String,
    pub crop_name: String,
    pub category: CropCategory,
    pub base_yield_per_acre: f64,
    pub effective_yield_per_acre: f64,
    pub penalties: PenaltyBreakdown,
    pub price_per_lb: Decimal,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    pub profit_per_acre: Option<Decimal>,
    pub roi_percent: Option<Decimal>,
    pub break_even_yield_per_acre: Option<f64>,
    pub sensitivity: ProfitSensitivity,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub fertilizer: Option<FertilizerChoice>,
    pub weather_source: WeatherSource,
    /// Set only when ranked by the composite method, in [0, 1]
    pub composite_score: Option<f64>,
}

/// Profit when the market price moves by `price_variation` either way
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfitSensitivity {
    /// Fraction of the price, e.g. 0.1 for ±10%
    pub price_variation: Decimal,
    pub profit_at_low_price: Decimal,
    pub profit_at_high_price: Decimal,
    /// Profit change per $1/lb of price, i.e. pounds harvested on the parcel
    pub profit_per_price_unit: Decimal,
    /// Price at which revenue covers cost; absent when nothing is harvested
    pub break_even_price_per_lb: Option<Decimal>,
}

/// Per-factor yield penalties, each in [0, 1]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PenaltyBreakdown {
    pub temperature: f64,
    pub rainfall: f64,
    pub soil_ph: f64,
    /// Compound penalty `1 - (1 - t)(1 - r)(1 - p)`
    pub aggregate: f64,
    /// Factors that had no data and were not scored
    pub missing_factors: u8,
}

/// Qualitative band of a confidence score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            ConfidenceLevel::VeryHigh
        } else if score >= 75.0 {
            ConfidenceLevel::High
        } else if score >= 65.0 {
            ConfidenceLevel::Moderate
        } else if score >= 55.0 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryHigh => "Very High",
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Moderate => "Moderate",
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::VeryLow => "Very Low",
        }
    }
}

/// A crop left out of the candidate set, with the rule that removed it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exclusion {
    pub crop_id: String,
    pub crop_name: String,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    OutOfWindow,
    IncompatibleGround,
    IncompatibleSoil,
    MissingWeather,
    MissingPrice,
}

impl ExclusionReason {
    /// Whether the exclusion is caused by absent reference data
    pub fn is_data_gap(&self) -> bool {
        matches!(
            self,
            ExclusionReason::MissingWeather | ExclusionReason::MissingPrice
        )
    }
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::OutOfWindow => write!(f, "outside planting window"),
            ExclusionReason::IncompatibleGround => write!(f, "incompatible ground type"),
            ExclusionReason::IncompatibleSoil => write!(f, "incompatible soil type"),
            ExclusionReason::MissingWeather => write!(f, "no weather data"),
            ExclusionReason::MissingPrice => write!(f, "no price data"),
        }
    }
}
