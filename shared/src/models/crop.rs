//! Crop specification models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{IdealRange, Month};

/// Soil pH range assumed for crops whose record carries none
pub const DEFAULT_IDEAL_SOIL_PH: IdealRange = IdealRange { min: 6.0, max: 7.0 };

/// A crop as described by the reference catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Crop {
    pub id: String,
    pub name: String,
    pub category: CropCategory,
    pub planting_window: PlantingWindow,
    /// Ideal mean air temperature (°F)
    pub ideal_temperature_f: IdealRange,
    /// Ideal monthly rainfall (inches)
    pub ideal_rainfall_in: IdealRange,
    pub ideal_soil_ph: IdealRange,
    /// Yield per acre under ideal conditions (lb)
    pub base_yield_per_acre: f64,
    /// Reference market price ($/lb)
    pub base_price_per_lb: Decimal,
    /// Fertilizer required per acre (lb)
    pub fertilizer_lbs_per_acre: f64,
    /// Fixed overhead per acre ($); category default when absent
    pub overhead_per_acre: Option<Decimal>,
}

impl Crop {
    pub fn is_plantable_in(&self, month: Month) -> bool {
        self.planting_window.contains(month)
    }

    pub fn effective_overhead_per_acre(&self) -> Decimal {
        self.overhead_per_acre
            .unwrap_or_else(|| self.category.default_overhead_per_acre())
    }
}

/// Agronomic family of a crop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CropCategory {
    Grain,
    Legume,
    Vegetable,
    Root,
    Fiber,
    Oilseed,
    Forage,
}

impl CropCategory {
    /// Per-acre overhead ($) for crops that do not carry their own figure
    pub fn default_overhead_per_acre(&self) -> Decimal {
        match self {
            CropCategory::Grain => Decimal::from(500),
            CropCategory::Legume => Decimal::from(400),
            CropCategory::Vegetable => Decimal::from(800),
            CropCategory::Root => Decimal::from(700),
            CropCategory::Fiber => Decimal::from(600),
            CropCategory::Oilseed => Decimal::from(450),
            CropCategory::Forage => Decimal::from(350),
        }
    }

    /// Nitrogen-hungry families that follow a legume well
    pub fn benefits_from_legume(&self) -> bool {
        matches!(
            self,
            CropCategory::Grain | CropCategory::Oilseed | CropCategory::Fiber
        )
    }
}

impl std::fmt::Display for CropCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropCategory::Grain => write!(f, "Grain"),
            CropCategory::Legume => write!(f, "Legume"),
            CropCategory::Vegetable => write!(f, "Vegetable"),
            CropCategory::Root => write!(f, "Root"),
            CropCategory::Fiber => write!(f, "Fiber"),
            CropCategory::Oilseed => write!(f, "Oilseed"),
            CropCategory::Forage => write!(f, "Forage"),
        }
    }
}

impl std::str::FromStr for CropCategory {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grain" | "cereal" => Ok(CropCategory::Grain),
            "legume" => Ok(CropCategory::Legume),
            "vegetable" => Ok(CropCategory::Vegetable),
            "root" | "tuber" => Ok(CropCategory::Root),
            "fiber" => Ok(CropCategory::Fiber),
            "oilseed" => Ok(CropCategory::Oilseed),
            "forage" => Ok(CropCategory::Forage),
            _ => Err("Unknown crop category"),
        }
    }
}

/// Planting window; wraps the year boundary when `end` precedes `start`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlantingWindow {
    pub start: Month,
    pub end: Month,
}

impl PlantingWindow {
    pub fn new(start: Month, end: Month) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, month: Month) -> bool {
        if self.start <= self.end {
            month >= self.start && month <= self.end
        } else {
            month >= self.start || month <= self.end
        }
    }

    pub fn wraps_year(&self) -> bool {
        self.start > self.end
    }

    /// Number of months in the window, endpoints included
    pub fn month_count(&self) -> usize {
        (usize::from(self.end.number()) + 12 - usize::from(self.start.number())) % 12 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(n: u8) -> Month {
        Month::new(n).unwrap()
    }

    #[test]
    fn test_window_straight() {
        let window = PlantingWindow::new(m(3), m(6));
        assert!(window.contains(m(3)));
        assert!(window.contains(m(6)));
        assert!(!window.contains(m(7)));
        assert!(!window.contains(m(2)));
        assert_eq!(window.month_count(), 4);
        assert!(!window.wraps_year());
    }

    #[test]
    fn test_window_wraps_year_boundary() {
        let window = PlantingWindow::new(m(11), m(2));
        assert!(window.contains(m(12)));
        assert!(window.contains(m(1)));
        assert!(window.contains(m(11)));
        assert!(window.contains(m(2)));
        assert!(!window.contains(m(3)));
        assert!(!window.contains(m(10)));
        assert_eq!(window.month_count(), 4);
    }

    #[test]
    fn test_single_month_window() {
        let window = PlantingWindow::new(m(5), m(5));
        assert!(window.contains(m(5)));
        assert!(!window.contains(m(4)));
        assert_eq!(window.month_count(), 1);
    }

    #[test]
    fn test_category_overhead_defaults() {
        assert_eq!(CropCategory::Grain.default_overhead_per_acre(), Decimal::from(500));
        assert_eq!(CropCategory::Forage.default_overhead_per_acre(), Decimal::from(350));
        assert_eq!("Cereal".parse::<CropCategory>(), Ok(CropCategory::Grain));
        assert!("shrub".parse::<CropCategory>().is_err());
    }
}
