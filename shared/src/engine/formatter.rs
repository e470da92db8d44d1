//! Serialization shapes for engine results
//!
//! Money is rounded to cents, yields and confidence to two decimals, and months carry
//! their names. The image order lists crop names for the image-ordering service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    AnnualSummary, MonthlyPrediction, PenaltyBreakdown, ProfitSensitivity, RecommendationRecord,
    RotationAlternative, RotationEntry, RotationPlan, SkipReason, SuccessionNote, WeatherSource,
};
use crate::types::{Month, RankingMethod, Season};

/// Crops shown to the image service for a monthly prediction
pub const SHORT_TERM_IMAGE_COUNT: usize = 5;

/// Label used for a month without a crop
pub const FALLOW_LABEL: &str = "Fallow";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn cents(value: Decimal) -> Decimal {
    value.round_dp(2)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedPenalties {
    pub temperature: f64,
    pub rainfall: f64,
    pub soil_ph: f64,
    pub aggregate: f64,
    pub missing_factors: u8,
}

impl From<&PenaltyBreakdown> for FormattedPenalties {
    fn from(p: &PenaltyBreakdown) -> Self {
        Self {
            temperature: round4(p.temperature),
            rainfall: round4(p.rainfall),
            soil_ph: round4(p.soil_ph),
            aggregate: round4(p.aggregate),
            missing_factors: p.missing_factors,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedRecommendation {
    pub rank: usize,
    pub crop_id: String,
    pub crop_name: String,
    pub category: String,
    pub effective_yield_per_acre: f64,
    pub yield_reduction_percent: f64,
    pub price_per_lb: Decimal,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    pub profit_per_acre: Option<Decimal>,
    pub roi_percent: Option<Decimal>,
    pub break_even_yield_per_acre: Option<f64>,
    pub sensitivity: ProfitSensitivity,
    pub confidence: f64,
    pub confidence_level: String,
    pub fertilizer: Option<String>,
    pub weather_source: String,
    pub penalties: FormattedPenalties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_score: Option<f64>,
}

fn format_sensitivity(s: &ProfitSensitivity) -> ProfitSensitivity {
    ProfitSensitivity {
        price_variation: s.price_variation,
        profit_at_low_price: cents(s.profit_at_low_price),
        profit_at_high_price: cents(s.profit_at_high_price),
        profit_per_price_unit: cents(s.profit_per_price_unit),
        break_even_price_per_lb: s.break_even_price_per_lb.map(|p| p.round_dp(4)),
    }
}

pub fn format_recommendation(record: &RecommendationRecord) -> FormattedRecommendation {
    FormattedRecommendation {
        rank: record.rank,
        crop_id: record.crop_id.clone(),
        crop_name: record.crop_name.clone(),
        category: record.category.to_string(),
        effective_yield_per_acre: round2(record.effective_yield_per_acre),
        yield_reduction_percent: round2(record.penalties.aggregate * 100.0),
        price_per_lb: record.price_per_lb,
        revenue: cents(record.revenue),
        cost: cents(record.cost),
        profit: cents(record.profit),
        profit_per_acre: record.profit_per_acre.map(cents),
        roi_percent: record.roi_percent.map(cents),
        break_even_yield_per_acre: record.break_even_yield_per_acre.map(round2),
        sensitivity: format_sensitivity(&record.sensitivity),
        confidence: round2(record.confidence),
        confidence_level: record.confidence_level.label().to_string(),
        fertilizer: record.fertilizer.as_ref().map(|f| format!("{} ({})", f.name, f.npk)),
        weather_source: match record.weather_source {
            WeatherSource::Forecast => "forecast".to_string(),
            WeatherSource::Normal => "normal".to_string(),
        },
        penalties: FormattedPenalties::from(&record.penalties),
        composite_score: record.composite_score.map(round4),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedExclusion {
    pub crop_id: String,
    pub crop_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedMonthlyPrediction {
    pub parcel_id: String,
    pub month: Month,
    pub month_name: String,
    pub season: Season,
    pub ranking_method: RankingMethod,
    pub candidates_evaluated: usize,
    pub below_confidence: usize,
    pub recommendations: Vec<FormattedRecommendation>,
    pub exclusions: Vec<FormattedExclusion>,
    pub image_order: Vec<String>,
}

pub fn format_monthly_prediction(prediction: &MonthlyPrediction) -> FormattedMonthlyPrediction {
    FormattedMonthlyPrediction {
        parcel_id: prediction.parcel_id.clone(),
        month: prediction.month,
        month_name: prediction.month.name().to_string(),
        season: prediction.month.season(),
        ranking_method: prediction.ranking_method,
        candidates_evaluated: prediction.candidates_evaluated,
        below_confidence: prediction.below_confidence,
        recommendations: prediction
            .recommendations
            .iter()
            .map(format_recommendation)
            .collect(),
        exclusions: prediction
            .exclusions
            .iter()
            .map(|e| FormattedExclusion {
                crop_id: e.crop_id.clone(),
                crop_name: e.crop_name.clone(),
                reason: e.reason.to_string(),
            })
            .collect(),
        image_order: short_term_image_order(prediction),
    }
}

/// Crop names in rank order, at most five
pub fn short_term_image_order(prediction: &MonthlyPrediction) -> Vec<String> {
    prediction
        .recommendations
        .iter()
        .take(SHORT_TERM_IMAGE_COUNT)
        .map(|r| r.crop_name.clone())
        .collect()
}

/// One name per plan month in calendar order, fallow months labelled
pub fn long_term_image_order(plan: &RotationPlan) -> Vec<String> {
    plan.entries
        .iter()
        .map(|e| match &e.choice {
            Some(choice) => choice.crop_name.clone(),
            None => FALLOW_LABEL.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedRotationEntry {
    pub month: Month,
    pub month_name: String,
    pub crop_id: Option<String>,
    pub crop_name: Option<String>,
    pub profit: Option<Decimal>,
    pub adjusted_score: Option<Decimal>,
    pub effective_yield_per_acre: Option<f64>,
    pub confidence: Option<f64>,
    pub fertilizer: Option<String>,
    pub skip_reason: Option<SkipReason>,
    pub succession: Option<SuccessionNote>,
    pub candidates_considered: usize,
    pub alternatives: Vec<RotationAlternative>,
}

pub fn format_rotation_entry(entry: &RotationEntry) -> FormattedRotationEntry {
    let choice = entry.choice.as_ref();
    FormattedRotationEntry {
        month: entry.month,
        month_name: entry.month.name().to_string(),
        crop_id: choice.map(|c| c.crop_id.clone()),
        crop_name: choice.map(|c| c.crop_name.clone()),
        profit: choice.map(|c| cents(c.profit)),
        adjusted_score: choice.map(|c| cents(c.adjusted_score)),
        effective_yield_per_acre: choice.map(|c| round2(c.effective_yield_per_acre)),
        confidence: choice.map(|c| round2(c.confidence)),
        fertilizer: choice
            .and_then(|c| c.fertilizer.as_ref())
            .map(|f| format!("{} ({})", f.name, f.npk)),
        skip_reason: entry.skip_reason,
        succession: entry.succession.clone(),
        candidates_considered: entry.candidates_considered,
        alternatives: entry
            .alternatives
            .iter()
            .map(|alt| RotationAlternative {
                crop_id: alt.crop_id.clone(),
                crop_name: alt.crop_name.clone(),
                profit: cents(alt.profit),
                adjusted_score: cents(alt.adjusted_score),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedSummary {
    pub total_profit: Decimal,
    pub average_monthly_profit: Option<Decimal>,
    pub planned_months: usize,
    pub fallow_months: usize,
    pub distinct_crops: usize,
    pub best_month: Option<String>,
    pub worst_month: Option<String>,
}

impl From<&AnnualSummary> for FormattedSummary {
    fn from(s: &AnnualSummary) -> Self {
        Self {
            total_profit: cents(s.total_profit),
            average_monthly_profit: s.average_monthly_profit.map(cents),
            planned_months: s.planned_months,
            fallow_months: s.fallow_months,
            distinct_crops: s.distinct_crops,
            best_month: s.best_month.map(|m| m.name().to_string()),
            worst_month: s.worst_month.map(|m| m.name().to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedRotationPlan {
    pub parcel_id: String,
    pub start_month: Month,
    pub start_month_name: String,
    pub diversification_bonus: f64,
    pub min_profit_threshold: Decimal,
    pub entries: Vec<FormattedRotationEntry>,
    pub summary: FormattedSummary,
    pub image_order: Vec<String>,
}

pub fn format_rotation_plan(plan: &RotationPlan) -> FormattedRotationPlan {
    FormattedRotationPlan {
        parcel_id: plan.parcel_id.clone(),
        start_month: plan.start_month,
        start_month_name: plan.start_month.name().to_string(),
        diversification_bonus: plan.diversification_bonus,
        min_profit_threshold: plan.min_profit_threshold,
        entries: plan.entries.iter().map(format_rotation_entry).collect(),
        summary: FormattedSummary::from(&plan.summary),
        image_order: long_term_image_order(plan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round2(1234.5678), 1234.57);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(cents(Decimal::new(123456, 3)), Decimal::new(12346, 2));
    }
}
