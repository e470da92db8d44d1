//! Fertilizer models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Month;

/// A fertilizer product from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fertilizer {
    pub id: String,
    pub name: String,
    pub npk: NpkRatio,
    pub cost_per_lb: Decimal,
    /// Months in which the product may be applied
    pub valid_months: Vec<Month>,
    /// Crops the product applies to; empty means every crop
    #[serde(default)]
    pub crop_ids: Vec<String>,
}

impl Fertilizer {
    pub fn applies_to(&self, crop_id: &str) -> bool {
        self.crop_ids.is_empty() || self.crop_ids.iter().any(|id| id == crop_id)
    }

    pub fn is_valid_in(&self, month: Month) -> bool {
        self.valid_months.contains(&month)
    }
}

/// Nitrogen, phosphorus and potassium percentages by weight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NpkRatio {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl NpkRatio {
    pub fn new(nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
        }
    }

    /// Population variance of the three nutrients; 0 for a perfectly even blend
    pub fn variance(&self) -> f64 {
        let values = [self.nitrogen, self.phosphorus, self.potassium];
        let mean = values.iter().sum::<f64>() / 3.0;
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 3.0
    }
}

impl std::fmt::Display for NpkRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.nitrogen, self.phosphorus, self.potassium)
    }
}

/// Fertilizer selected for a recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FertilizerChoice {
    pub fertilizer_id: String,
    pub name: String,
    pub npk: NpkRatio,
    pub cost_per_lb: Decimal,
}

impl From<&Fertilizer> for FertilizerChoice {
    fn from(fertilizer: &Fertilizer) -> Self {
        Self {
            fertilizer_id: fertilizer.id.clone(),
            name: fertilizer.name.clone(),
            npk: fertilizer.npk,
            cost_per_lb: fertilizer.cost_per_lb,
        }
    }
}
