//! Common types used across the planner

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Square feet in one acre; every per-acre figure is anchored on this
pub const SQUARE_FEET_PER_ACRE: f64 = 43_560.0;

/// Length of a rotation plan in months
pub const MONTHS_PER_YEAR: usize = 12;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar month, 1 = January through 12 = December
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    pub const JANUARY: Month = Month(1);
    pub const DECEMBER: Month = Month(12);

    /// Build a month from its 1-based number
    pub fn new(number: u8) -> Option<Self> {
        (1..=12).contains(&number).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based position in the calendar year
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// The month `months` after this one, wrapping after December
    pub fn offset(self, months: usize) -> Self {
        Self(((self.index() + months) % MONTHS_PER_YEAR) as u8 + 1)
    }

    pub fn next(self) -> Self {
        self.offset(1)
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[self.index()]
    }

    pub fn season(self) -> Season {
        match self.0 {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }

    /// Twelve consecutive months starting at `start`
    pub fn cycle_from(start: Month) -> impl Iterator<Item = Month> {
        (0..MONTHS_PER_YEAR).map(move |i| start.offset(i))
    }

    pub fn all() -> impl Iterator<Item = Month> {
        Self::cycle_from(Self::JANUARY)
    }
}

impl TryFrom<u8> for Month {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Month::new(value).ok_or("Month must be between 1 and 12")
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Meteorological season of a month (northern hemisphere)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

/// Closed interval of ideal growing values
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IdealRange {
    pub min: f64,
    pub max: f64,
}

impl IdealRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance from `value` to the nearest boundary, 0 inside the range
    pub fn deviation(&self, value: f64) -> f64 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

/// Unit a parcel area is recorded in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    #[default]
    #[serde(alias = "sqft", alias = "square_foot")]
    SquareFeet,
    #[serde(alias = "acre", alias = "ac")]
    Acres,
}

impl AreaUnit {
    /// Convert a value in this unit to square feet
    pub fn to_square_feet(self, value: f64) -> f64 {
        match self {
            AreaUnit::SquareFeet => value,
            AreaUnit::Acres => value * SQUARE_FEET_PER_ACRE,
        }
    }
}

impl FromStr for AreaUnit {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqft" | "square_feet" | "square_foot" | "sq_ft" => Ok(AreaUnit::SquareFeet),
            "acres" | "acre" | "ac" => Ok(AreaUnit::Acres),
            _ => Err("Area unit must be sqft or acres"),
        }
    }
}

/// Ordering applied to monthly recommendations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RankingMethod {
    /// Highest parcel profit first
    #[default]
    Profit,
    /// Highest effective yield per acre first
    Yield,
    /// Highest confidence first
    Confidence,
    /// Highest return on cost first
    Roi,
    /// Lowest aggregate yield penalty first
    Suitability,
    /// Weighted blend of normalized profit, ROI and suitability
    Composite,
}

impl RankingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMethod::Profit => "profit",
            RankingMethod::Yield => "yield",
            RankingMethod::Confidence => "confidence",
            RankingMethod::Roi => "roi",
            RankingMethod::Suitability => "suitability",
            RankingMethod::Composite => "composite",
        }
    }
}

impl fmt::Display for RankingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingMethod {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "profit" => Ok(RankingMethod::Profit),
            "yield" => Ok(RankingMethod::Yield),
            "confidence" => Ok(RankingMethod::Confidence),
            "roi" => Ok(RankingMethod::Roi),
            "suitability" => Ok(RankingMethod::Suitability),
            "composite" => Ok(RankingMethod::Composite),
            _ => Err(
                "Ranking method must be one of: profit, yield, confidence, roi, suitability, composite",
            ),
        }
    }
}

/// Criterion used to pick a fertilizer among the valid options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FertilizerPreference {
    /// Most even N-P-K analysis
    #[default]
    Balanced,
    Nitrogen,
    Phosphorus,
    Potassium,
    /// Cheapest per pound
    Cost,
}

impl FromStr for FertilizerPreference {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" => Ok(FertilizerPreference::Balanced),
            "nitrogen" => Ok(FertilizerPreference::Nitrogen),
            "phosphorus" => Ok(FertilizerPreference::Phosphorus),
            "potassium" => Ok(FertilizerPreference::Potassium),
            "cost" => Ok(FertilizerPreference::Cost),
            _ => Err("Fertilizer preference must be one of: balanced, nitrogen, phosphorus, potassium, cost"),
        }
    }
}
