//! Eligibility rules narrowing the crop catalog for a parcel and month
//!
//! Rules are applied in order and a crop is excluded by the first rule it fails:
//! planting window, ground compatibility, soil compatibility, weather data, price data.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::catalog::CatalogRepository;
use crate::models::{Crop, Exclusion, ExclusionReason, Parcel, WeatherSample};
use crate::types::Month;

/// Which weather records feed the yield model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherBasis {
    /// Forecast for the month, falling back to the normal when no forecast exists
    ForecastThenNormal,
    /// Long-run normals only
    Normal,
}

/// A crop that passed every rule, with the data it will be scored on
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub crop: &'a Crop,
    pub weather: WeatherSample,
    pub price_per_lb: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct EligibilityOutcome<'a> {
    /// In catalog order
    pub candidates: Vec<Candidate<'a>>,
    pub exclusions: Vec<Exclusion>,
}

impl EligibilityOutcome<'_> {
    pub fn crop_ids(&self) -> BTreeSet<String> {
        self.candidates.iter().map(|c| c.crop.id.clone()).collect()
    }

    /// True when some crop would have been eligible but lacked weather or price data
    pub fn has_data_gaps(&self) -> bool {
        self.exclusions.iter().any(|e| e.reason.is_data_gap())
    }
}

/// The first window or compatibility rule the crop fails, if any
pub fn compatibility_check(crop: &Crop, parcel: &Parcel, month: Month) -> Option<ExclusionReason> {
    if !crop.is_plantable_in(month) {
        return Some(ExclusionReason::OutOfWindow);
    }
    if !parcel.ground_type.supports(crop.category) {
        return Some(ExclusionReason::IncompatibleGround);
    }
    if !parcel.soil_type.supports(crop.category) {
        return Some(ExclusionReason::IncompatibleSoil);
    }
    None
}

/// Resolve the weather sample used for a parcel and month
pub fn resolve_weather<C: CatalogRepository + ?Sized>(
    catalog: &C,
    parcel_id: &str,
    month: Month,
    basis: WeatherBasis,
) -> Option<WeatherSample> {
    let sample = match basis {
        WeatherBasis::ForecastThenNormal => catalog
            .get_weather_forecast(parcel_id, month)
            .filter(|s| !s.is_empty())
            .or_else(|| catalog.get_weather_normal(parcel_id, month)),
        WeatherBasis::Normal => catalog.get_weather_normal(parcel_id, month),
    };
    sample.filter(|s| !s.is_empty())
}

/// Split the catalog into scored candidates and exclusions
pub fn evaluate_eligibility<'a, C: CatalogRepository + ?Sized>(
    catalog: &'a C,
    parcel: &Parcel,
    month: Month,
    basis: WeatherBasis,
) -> EligibilityOutcome<'a> {
    let weather = resolve_weather(catalog, &parcel.id, month, basis);
    let mut outcome = EligibilityOutcome::default();

    for crop in catalog.list_crops() {
        let price = catalog.get_price(&crop.id, month);
        let reason = compatibility_check(crop, parcel, month).or_else(|| {
            if weather.is_none() {
                Some(ExclusionReason::MissingWeather)
            } else if price.is_none() {
                Some(ExclusionReason::MissingPrice)
            } else {
                None
            }
        });

        match (reason, weather, price) {
            (None, Some(weather), Some(price_per_lb)) => outcome.candidates.push(Candidate {
                crop,
                weather,
                price_per_lb,
            }),
            (reason, _, _) => outcome.exclusions.push(Exclusion {
                crop_id: crop.id.clone(),
                crop_name: crop.name.clone(),
                reason: reason.unwrap_or(ExclusionReason::MissingWeather),
            }),
        }
    }

    outcome
}

/// Ids of the crops plantable on `parcel` in `month`
pub fn eligible_crops<C: CatalogRepository + ?Sized>(
    catalog: &C,
    parcel: &Parcel,
    month: Month,
    basis: WeatherBasis,
) -> BTreeSet<String> {
    evaluate_eligibility(catalog, parcel, month, basis).crop_ids()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::models::{
        CropCategory, GroundType, PlantingWindow, PricePoint, SoilType, DEFAULT_IDEAL_SOIL_PH,
    };
    use crate::types::{AreaUnit, IdealRange};

    fn m(n: u8) -> Month {
        Month::new(n).unwrap()
    }

    fn crop(id: &str, category: CropCategory, start: u8, end: u8) -> Crop {
        Crop {
            id: id.to_string(),
            name: id.to_string(),
            category,
            planting_window: PlantingWindow::new(m(start), m(end)),
            ideal_temperature_f: IdealRange::new(50.0, 80.0),
            ideal_rainfall_in: IdealRange::new(2.0, 5.0),
            ideal_soil_ph: DEFAULT_IDEAL_SOIL_PH,
            base_yield_per_acre: 5_000.0,
            base_price_per_lb: Decimal::new(20, 2),
            fertilizer_lbs_per_acre: 100.0,
            overhead_per_acre: None,
        }
    }

    fn parcel(soil: SoilType, ground: GroundType) -> Parcel {
        Parcel {
            id: "P1".to_string(),
            name: "Test".to_string(),
            region: "valley".to_string(),
            soil_type: soil,
            ground_type: ground,
            soil_ph: Some(6.5),
            area: 2_000.0,
            area_unit: AreaUnit::SquareFeet,
        }
    }

    fn price(crop_id: &str, month: u8) -> PricePoint {
        PricePoint {
            crop_id: crop_id.to_string(),
            year: 2024,
            month: m(month),
            price_per_lb: Decimal::new(25, 2),
        }
    }

    fn reason_for(outcome: &EligibilityOutcome<'_>, crop_id: &str) -> Option<ExclusionReason> {
        outcome
            .exclusions
            .iter()
            .find(|e| e.crop_id == crop_id)
            .map(|e| e.reason)
    }

    #[test]
    fn test_rules_in_order() {
        let catalog = InMemoryCatalog::new()
            .with_parcel(parcel(SoilType::Clay, GroundType::Sloped))
            .with_crop(crop("wheat", CropCategory::Grain, 11, 2))
            .with_crop(crop("corn", CropCategory::Grain, 4, 6))
            .with_crop(crop("cotton", CropCategory::Fiber, 12, 1))
            .with_crop(crop("beet", CropCategory::Root, 1, 12))
            .with_crop(crop("pea", CropCategory::Legume, 1, 12))
            .with_crop(crop("oats", CropCategory::Grain, 1, 3))
            .with_weather_normal("valley", WeatherSample::normal(m(1), Some(40.0), Some(3.0)))
            .with_price(price("wheat", 1));

        let p = catalog.get_parcel("P1").unwrap().clone();
        let outcome = evaluate_eligibility(&catalog, &p, m(1), WeatherBasis::Normal);

        assert_eq!(outcome.crop_ids(), BTreeSet::from(["wheat".to_string()]));
        assert_eq!(reason_for(&outcome, "corn"), Some(ExclusionReason::OutOfWindow));
        assert_eq!(reason_for(&outcome, "cotton"), Some(ExclusionReason::IncompatibleGround));
        assert_eq!(reason_for(&outcome, "beet"), Some(ExclusionReason::IncompatibleGround));
        assert_eq!(reason_for(&outcome, "pea"), Some(ExclusionReason::MissingPrice));
        assert_eq!(reason_for(&outcome, "oats"), Some(ExclusionReason::MissingPrice));
        assert!(outcome.has_data_gaps());
    }

    #[test]
    fn test_soil_incompatibility() {
        let catalog = InMemoryCatalog::new()
            .with_parcel(parcel(SoilType::Clay, GroundType::Flat))
            .with_crop(crop("potato", CropCategory::Root, 1, 12))
            .with_weather_normal("valley", WeatherSample::normal(m(3), Some(55.0), Some(3.0)))
            .with_price(price("potato", 3));

        let p = catalog.get_parcel("P1").unwrap().clone();
        let outcome = evaluate_eligibility(&catalog, &p, m(3), WeatherBasis::Normal);
        assert!(outcome.candidates.is_empty());
        assert_eq!(reason_for(&outcome, "potato"), Some(ExclusionReason::IncompatibleSoil));
        assert!(!outcome.has_data_gaps());
    }

    #[test]
    fn test_missing_weather_excludes() {
        let catalog = InMemoryCatalog::new()
            .with_parcel(parcel(SoilType::Loamy, GroundType::Flat))
            .with_crop(crop("corn", CropCategory::Grain, 1, 12))
            .with_price(price("corn", 5));

        let p = catalog.get_parcel("P1").unwrap().clone();
        let outcome = evaluate_eligibility(&catalog, &p, m(5), WeatherBasis::ForecastThenNormal);
        assert!(outcome.candidates.is_empty());
        assert_eq!(reason_for(&outcome, "corn"), Some(ExclusionReason::MissingWeather));
    }

    #[test]
    fn test_forecast_preferred_over_normal() {
        let catalog = InMemoryCatalog::new()
            .with_parcel(parcel(SoilType::Loamy, GroundType::Flat))
            .with_weather_normal("valley", WeatherSample::normal(m(5), Some(60.0), Some(3.0)))
            .with_weather_forecast("valley", WeatherSample::forecast(m(5), Some(72.0), Some(1.0)));

        let forecast = resolve_weather(&catalog, "P1", m(5), WeatherBasis::ForecastThenNormal).unwrap();
        assert_eq!(forecast.temperature_f, Some(72.0));

        let normal = resolve_weather(&catalog, "P1", m(5), WeatherBasis::Normal).unwrap();
        assert_eq!(normal.temperature_f, Some(60.0));

        let catalog = catalog.with_weather_normal("valley", WeatherSample::normal(m(6), Some(68.0), None));
        let fallback = resolve_weather(&catalog, "P1", m(6), WeatherBasis::ForecastThenNormal).unwrap();
        assert_eq!(fallback.temperature_f, Some(68.0));
    }
}
