//! Reference data access for the engine
//!
//! The engine only reads reference data through [`CatalogRepository`]. The in-memory
//! implementation is built once at startup (or per test) and never mutated afterwards.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Crop, Fertilizer, Parcel, PricePoint, WeatherSample};
use crate::types::Month;
use crate::validation::{validate_ideal_range, validate_soil_ph};

/// Read-only provider of crop, parcel, weather, price and fertilizer records
pub trait CatalogRepository: Send + Sync {
    fn get_parcel(&self, parcel_id: &str) -> Option<&Parcel>;

    fn list_parcels(&self) -> Vec<&Parcel>;

    fn list_crops(&self) -> &[Crop];

    /// Forecast for the parcel (or its region) in `month`
    fn get_weather_forecast(&self, parcel_id: &str, month: Month) -> Option<WeatherSample>;

    /// Long-run normal for the parcel (or its region) in `month`
    fn get_weather_normal(&self, parcel_id: &str, month: Month) -> Option<WeatherSample>;

    /// Most recent recorded price per pound for the crop in `month`
    fn get_price(&self, crop_id: &str, month: Month) -> Option<Decimal>;

    /// Fertilizers applicable to the crop, regardless of month
    fn get_fertilizer_options(&self, crop_id: &str) -> Vec<&Fertilizer>;
}

/// Catalog held entirely in memory
///
/// Weather is keyed by parcel id or region; a parcel-specific record wins over the
/// record for the parcel's region.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    parcels: BTreeMap<String, Parcel>,
    crops: Vec<Crop>,
    fertilizers: Vec<Fertilizer>,
    /// (crop_id, month) -> year -> price
    prices: HashMap<(String, Month), BTreeMap<i32, Decimal>>,
    normals: HashMap<(String, Month), WeatherSample>,
    forecasts: HashMap<(String, Month), WeatherSample>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_parcel(&mut self, parcel: Parcel) {
        self.parcels.insert(parcel.id.clone(), parcel);
    }

    /// Add a crop, replacing any earlier crop with the same id
    pub fn add_crop(&mut self, crop: Crop) {
        match self.crops.iter_mut().find(|c| c.id == crop.id) {
            Some(existing) => *existing = crop,
            None => self.crops.push(crop),
        }
    }

    pub fn add_fertilizer(&mut self, fertilizer: Fertilizer) {
        self.fertilizers.push(fertilizer);
    }

    pub fn add_price(&mut self, point: PricePoint) {
        self.prices
            .entry((point.crop_id, point.month))
            .or_default()
            .insert(point.year, point.price_per_lb);
    }

    /// Add a weather normal keyed by parcel id or region
    pub fn add_weather_normal(&mut self, key: impl Into<String>, sample: WeatherSample) {
        self.normals.insert((key.into(), sample.month), sample);
    }

    /// Add a weather forecast keyed by parcel id or region
    pub fn add_weather_forecast(&mut self, key: impl Into<String>, sample: WeatherSample) {
        self.forecasts.insert((key.into(), sample.month), sample);
    }

    pub fn with_parcel(mut self, parcel: Parcel) -> Self {
        self.add_parcel(parcel);
        self
    }

    pub fn with_crop(mut self, crop: Crop) -> Self {
        self.add_crop(crop);
        self
    }

    pub fn with_fertilizer(mut self, fertilizer: Fertilizer) -> Self {
        self.add_fertilizer(fertilizer);
        self
    }

    pub fn with_price(mut self, point: PricePoint) -> Self {
        self.add_price(point);
        self
    }

    pub fn with_weather_normal(mut self, key: impl Into<String>, sample: WeatherSample) -> Self {
        self.add_weather_normal(key, sample);
        self
    }

    pub fn with_weather_forecast(mut self, key: impl Into<String>, sample: WeatherSample) -> Self {
        self.add_weather_forecast(key, sample);
        self
    }

    pub fn crop_count(&self) -> usize {
        self.crops.len()
    }

    pub fn parcel_count(&self) -> usize {
        self.parcels.len()
    }

    pub fn fertilizer_count(&self) -> usize {
        self.fertilizers.len()
    }

    /// Check reference records for values the engine cannot work with
    pub fn validate(&self) -> EngineResult<()> {
        for crop in &self.crops {
            let ranges = [
                ("temperature", &crop.ideal_temperature_f),
                ("rainfall", &crop.ideal_rainfall_in),
                ("soil pH", &crop.ideal_soil_ph),
            ];
            for (factor, range) in ranges {
                validate_ideal_range(range).map_err(|msg| {
                    EngineError::InvalidCatalog(format!("crop {} {}: {}", crop.id, factor, msg))
                })?;
            }
            if !crop.base_yield_per_acre.is_finite() || crop.base_yield_per_acre < 0.0 {
                return Err(EngineError::InvalidCatalog(format!(
                    "crop {}: base yield must be a non-negative number",
                    crop.id
                )));
            }
            if !crop.fertilizer_lbs_per_acre.is_finite() || crop.fertilizer_lbs_per_acre < 0.0 {
                return Err(EngineError::InvalidCatalog(format!(
                    "crop {}: fertilizer requirement must be a non-negative number",
                    crop.id
                )));
            }
        }

        for parcel in self.parcels.values() {
            if let Some(ph) = parcel.soil_ph {
                validate_soil_ph(ph).map_err(|msg| {
                    EngineError::InvalidCatalog(format!("parcel {}: {}", parcel.id, msg))
                })?;
            }
        }

        for fertilizer in &self.fertilizers {
            if fertilizer.cost_per_lb < Decimal::ZERO {
                return Err(EngineError::InvalidCatalog(format!(
                    "fertilizer {}: cost cannot be negative",
                    fertilizer.id
                )));
            }
        }

        Ok(())
    }

    fn lookup_weather(
        &self,
        table: &HashMap<(String, Month), WeatherSample>,
        parcel_id: &str,
        month: Month,
    ) -> Option<WeatherSample> {
        if let Some(sample) = table.get(&(parcel_id.to_string(), month)) {
            return Some(*sample);
        }
        let region = &self.parcels.get(parcel_id)?.region;
        table.get(&(region.clone(), month)).copied()
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn get_parcel(&self, parcel_id: &str) -> Option<&Parcel> {
        self.parcels.get(parcel_id)
    }

    fn list_parcels(&self) -> Vec<&Parcel> {
        self.parcels.values().collect()
    }

    fn list_crops(&self) -> &[Crop] {
        &self.crops
    }

    fn get_weather_forecast(&self, parcel_id: &str, month: Month) -> Option<WeatherSample> {
        self.lookup_weather(&self.forecasts, parcel_id, month)
    }

    fn get_weather_normal(&self, parcel_id: &str, month: Month) -> Option<WeatherSample> {
        self.lookup_weather(&self.normals, parcel_id, month)
    }

    fn get_price(&self, crop_id: &str, month: Month) -> Option<Decimal> {
        self.prices
            .get(&(crop_id.to_string(), month))
            .and_then(|by_year| by_year.values().next_back())
            .copied()
    }

    fn get_fertilizer_options(&self, crop_id: &str) -> Vec<&Fertilizer> {
        self.fertilizers
            .iter()
            .filter(|f| f.applies_to(crop_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroundType, NpkRatio, SoilType};
    use crate::types::AreaUnit;

    fn m(n: u8) -> Month {
        Month::new(n).unwrap()
    }

    fn parcel() -> Parcel {
        Parcel {
            id: "P1".to_string(),
            name: "North Field".to_string(),
            region: "valley".to_string(),
            soil_type: SoilType::Loamy,
            ground_type: GroundType::Flat,
            soil_ph: Some(6.5),
            area: 2000.0,
            area_unit: AreaUnit::SquareFeet,
        }
    }

    #[test]
    fn test_parcel_weather_overrides_region() {
        let catalog = InMemoryCatalog::new()
            .with_parcel(parcel())
            .with_weather_normal("valley", WeatherSample::normal(m(5), Some(60.0), Some(3.0)))
            .with_weather_normal("P1", WeatherSample::normal(m(6), Some(70.0), Some(2.0)))
            .with_weather_normal("valley", WeatherSample::normal(m(6), Some(65.0), Some(4.0)));

        let may = catalog.get_weather_normal("P1", m(5)).unwrap();
        assert_eq!(may.temperature_f, Some(60.0));

        let june = catalog.get_weather_normal("P1", m(6)).unwrap();
        assert_eq!(june.temperature_f, Some(70.0));

        assert!(catalog.get_weather_normal("P1", m(7)).is_none());
        assert!(catalog.get_weather_forecast("P1", m(5)).is_none());
        assert!(catalog.get_weather_normal("P9", m(5)).is_none());
    }

    #[test]
    fn test_price_uses_most_recent_year() {
        let point = |year, cents| PricePoint {
            crop_id: "corn".to_string(),
            year,
            month: m(9),
            price_per_lb: Decimal::new(cents, 2),
        };
        let catalog = InMemoryCatalog::new()
            .with_price(point(2022, 20))
            .with_price(point(2024, 25))
            .with_price(point(2023, 30));

        assert_eq!(catalog.get_price("corn", m(9)), Some(Decimal::new(25, 2)));
        assert_eq!(catalog.get_price("corn", m(10)), None);
        assert_eq!(catalog.get_price("rice", m(9)), None);
    }

    #[test]
    fn test_fertilizer_options_filter_by_crop() {
        let fert = |id: &str, crops: Vec<&str>| Fertilizer {
            id: id.to_string(),
            name: id.to_string(),
            npk: NpkRatio::new(10.0, 10.0, 10.0),
            cost_per_lb: Decimal::new(50, 2),
            valid_months: vec![m(4)],
            crop_ids: crops.into_iter().map(String::from).collect(),
        };
        let catalog = InMemoryCatalog::new()
            .with_fertilizer(fert("general", vec![]))
            .with_fertilizer(fert("wheat-only", vec!["wheat"]));

        assert_eq!(catalog.get_fertilizer_options("corn").len(), 1);
        assert_eq!(catalog.get_fertilizer_options("wheat").len(), 2);
    }

    #[test]
    fn test_validate_rejects_bad_parcel_ph() {
        let mut bad = parcel();
        bad.soil_ph = Some(19.0);
        let catalog = InMemoryCatalog::new().with_parcel(bad);
        assert!(matches!(catalog.validate(), Err(EngineError::InvalidCatalog(_))));
        assert!(InMemoryCatalog::new().with_parcel(parcel()).validate().is_ok());
    }
}
