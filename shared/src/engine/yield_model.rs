//! Yield penalty model
//!
//! Each growing factor (temperature, rainfall, soil pH) is penalized by how far the
//! observed value lies outside the crop's ideal range. The penalty ramps linearly from
//! 0 at the range boundary to 1 at the configured maximum deviation. Factor penalties
//! compound as independent survival rates, so the aggregate never exceeds 1.

use serde::{Deserialize, Serialize};

use crate::models::{Crop, PenaltyBreakdown, WeatherSample};
use crate::types::IdealRange;

/// Confidence lost for every factor without data
pub const MISSING_FACTOR_CONFIDENCE_LOSS: f64 = 0.15;

/// Deviation at which a factor's penalty reaches 1.0
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PenaltySettings {
    pub temperature_max_deviation_f: f64,
    pub rainfall_max_deviation_in: f64,
    pub soil_ph_max_deviation: f64,
}

impl Default for PenaltySettings {
    fn default() -> Self {
        Self {
            temperature_max_deviation_f: 40.0,
            rainfall_max_deviation_in: 12.0,
            soil_ph_max_deviation: 3.0,
        }
    }
}

/// Outcome of applying the penalty model to one crop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldAssessment {
    pub effective_yield_per_acre: f64,
    pub penalties: PenaltyBreakdown,
    /// 0-100
    pub confidence: f64,
}

/// Penalty for a single factor, `None` when the observation is missing
pub fn factor_penalty(value: Option<f64>, range: &IdealRange, max_deviation: f64) -> Option<f64> {
    let value = value.filter(|v| v.is_finite())?;
    let deviation = range.deviation(value);
    if deviation <= 0.0 {
        return Some(0.0);
    }
    if max_deviation <= 0.0 {
        return Some(1.0);
    }
    Some((deviation / max_deviation).clamp(0.0, 1.0))
}

/// Compound penalty `1 - Π(1 - pᵢ)`
pub fn aggregate_penalty(penalties: &[f64]) -> f64 {
    let survival: f64 = penalties
        .iter()
        .map(|p| 1.0 - p.clamp(0.0, 1.0))
        .product();
    (1.0 - survival).clamp(0.0, 1.0)
}

/// Confidence score (0-100) from the aggregate penalty and the number of unscored factors
pub fn confidence_score(aggregate: f64, missing_factors: u8) -> f64 {
    let coverage = 1.0 - MISSING_FACTOR_CONFIDENCE_LOSS * f64::from(missing_factors);
    (100.0 * (1.0 - aggregate) * coverage).clamp(0.0, 100.0)
}

/// Apply the penalty model to a crop under the given weather and soil pH
pub fn effective_yield(
    crop: &Crop,
    weather: &WeatherSample,
    soil_ph: Option<f64>,
    settings: &PenaltySettings,
) -> YieldAssessment {
    let temperature = factor_penalty(
        weather.temperature_f,
        &crop.ideal_temperature_f,
        settings.temperature_max_deviation_f,
    );
    let rainfall = factor_penalty(
        weather.rainfall_in,
        &crop.ideal_rainfall_in,
        settings.rainfall_max_deviation_in,
    );
    let soil_ph = factor_penalty(soil_ph, &crop.ideal_soil_ph, settings.soil_ph_max_deviation);

    let factors = [temperature, rainfall, soil_ph];
    let missing_factors = factors.iter().filter(|f| f.is_none()).count() as u8;
    let scored: Vec<f64> = factors.iter().flatten().copied().collect();
    let aggregate = aggregate_penalty(&scored);

    let base = crop.base_yield_per_acre.max(0.0);
    let effective_yield_per_acre = (base * (1.0 - aggregate)).clamp(0.0, base);

    YieldAssessment {
        effective_yield_per_acre,
        penalties: PenaltyBreakdown {
            temperature: temperature.unwrap_or(0.0),
            rainfall: rainfall.unwrap_or(0.0),
            soil_ph: soil_ph.unwrap_or(0.0),
            aggregate,
            missing_factors,
        },
        confidence: confidence_score(aggregate, missing_factors),
    }
}
