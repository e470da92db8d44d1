//! Annual rotation plan models

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::crop::CropCategory;
use crate::models::fertilizer::FertilizerChoice;
use crate::types::Month;

/// Twelve monthly entries, in calendar order from `start_month`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RotationPlan {
    pub parcel_id: String,
    pub start_month: Month,
    pub diversification_bonus: f64,
    pub min_profit_threshold: Decimal,
    pub entries: Vec<RotationEntry>,
    pub summary: AnnualSummary,
}

/// Outcome of one month of the plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RotationEntry {
    pub month: Month,
    pub choice: Option<RotationChoice>,
    /// Set exactly when `choice` is absent
    pub skip_reason: Option<SkipReason>,
    pub succession: Option<SuccessionNote>,
    /// Eligible crops scored for this month
    pub candidates_considered: usize,
    /// Runners-up that also met the profit threshold, best first
    pub alternatives: Vec<RotationAlternative>,
}

impl RotationEntry {
    pub fn fallow(month: Month, reason: SkipReason, candidates_considered: usize) -> Self {
        Self {
            month,
            choice: None,
            skip_reason: Some(reason),
            succession: None,
            candidates_considered,
            alternatives: Vec::new(),
        }
    }

    pub fn is_fallow(&self) -> bool {
        self.choice.is_none()
    }

    pub fn profit(&self) -> Option<Decimal> {
        self.choice.as_ref().map(|c| c.profit)
    }
}

/// Crop selected for a month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RotationChoice {
    pub crop_id: String,
    pub crop_name: String,
    pub category: CropCategory,
    pub effective_yield_per_acre: f64,
    pub confidence: f64,
    pub profit: Decimal,
    /// Profit after the diversification adjustment; used only for selection
    pub adjusted_score: Decimal,
    /// 1.0 for a crop new to the plan, 0.0 for one chosen the month before
    pub freshness: f64,
    pub fertilizer: Option<FertilizerChoice>,
}

/// A crop that lost the month's pick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RotationAlternative {
    pub crop_id: String,
    pub crop_name: String,
    pub profit: Decimal,
    pub adjusted_score: Decimal,
}

impl From<&RotationChoice> for RotationAlternative {
    fn from(choice: &RotationChoice) -> Self {
        Self {
            crop_id: choice.crop_id.clone(),
            crop_name: choice.crop_name.clone(),
            profit: choice.profit,
            adjusted_score: choice.adjusted_score,
        }
    }
}

/// Why a month was left without a crop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Every crop failed the window or compatibility rules
    NoEligibleCrops,
    /// Crops would be eligible but weather or price data is missing
    DataUnavailable,
    /// Candidates existed but none reached the profit threshold
    BelowProfitThreshold,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoEligibleCrops => "no_eligible_crops",
            SkipReason::DataUnavailable => "data_unavailable",
            SkipReason::BelowProfitThreshold => "below_profit_threshold",
        }
    }
}

/// Agronomic remark comparing a choice with the previous crop in the plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessionNote {
    pub kind: SuccessionKind,
    pub previous_crop: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuccessionKind {
    Beneficial,
    Concern,
    Neutral,
}

/// Totals over the planned (non-fallow) months of a rotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnualSummary {
    pub total_profit: Decimal,
    pub average_monthly_profit: Option<Decimal>,
    pub planned_months: usize,
    pub fallow_months: usize,
    pub distinct_crops: usize,
    pub best_month: Option<Month>,
    pub worst_month: Option<Month>,
}

impl AnnualSummary {
    pub fn from_entries(entries: &[RotationEntry]) -> Self {
        let mut total_profit = Decimal::ZERO;
        let mut planned_months = 0usize;
        let mut crops = BTreeSet::new();
        let mut best: Option<(Month, Decimal)> = None;
        let mut worst: Option<(Month, Decimal)> = None;

        for entry in entries {
            let Some(choice) = &entry.choice else {
                continue;
            };
            planned_months += 1;
            total_profit += choice.profit;
            crops.insert(choice.crop_id.as_str());

            if best.map_or(true, |(_, p)| choice.profit > p) {
                best = Some((entry.month, choice.profit));
            }
            if worst.map_or(true, |(_, p)| choice.profit < p) {
                worst = Some((entry.month, choice.profit));
            }
        }

        let average_monthly_profit = (planned_months > 0)
            .then(|| (total_profit / Decimal::from(planned_months)).round_dp(2));

        Self {
            total_profit,
            average_monthly_profit,
            planned_months,
            fallow_months: entries.len() - planned_months,
            distinct_crops: crops.len(),
            best_month: best.map(|(m, _)| m),
            worst_month: worst.map(|(m, _)| m),
        }
    }
}
