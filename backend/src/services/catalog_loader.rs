//! CSV loading of the reference catalog
//!
//! Reads crops, parcels, fertilizers, prices and weather from a data directory into an
//! [`InMemoryCatalog`]. Any malformed row aborts loading with the file and row number.

use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::{
    AreaUnit, Crop, CropCategory, Fertilizer, GroundType, IdealRange, InMemoryCatalog, Month,
    NpkRatio, Parcel, PlantingWindow, PricePoint, SoilType, WeatherSample,
    DEFAULT_IDEAL_SOIL_PH,
};

use crate::error::{AppError, AppResult};

pub const CROPS_CSV: &str = "crops.csv";
pub const PARCELS_CSV: &str = "parcels.csv";
pub const FERTILIZERS_CSV: &str = "fertilizers.csv";
pub const PRICE_HISTORY_CSV: &str = "price_history.csv";
pub const WEATHER_NORMALS_CSV: &str = "weather_normals.csv";
pub const WEATHER_FORECAST_CSV: &str = "weather_forecast.csv";

#[derive(Debug, Deserialize)]
struct CropRow {
    crop_id: String,
    name: String,
    category: String,
    plant_start_month: u8,
    plant_end_month: u8,
    temp_min_f: f64,
    temp_max_f: f64,
    rain_min_in: f64,
    rain_max_in: f64,
    ph_min: Option<f64>,
    ph_max: Option<f64>,
    base_yield_lb_per_acre: f64,
    base_price_per_lb: Decimal,
    fertilizer_lb_per_acre: f64,
    overhead_per_acre: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct ParcelRow {
    parcel_id: String,
    name: String,
    region: String,
    soil_type: String,
    ground_type: String,
    soil_ph: Option<f64>,
    area: f64,
    area_unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FertilizerRow {
    fertilizer_id: String,
    name: String,
    n: f64,
    p: f64,
    k: f64,
    cost_per_lb: Decimal,
    /// Comma-separated month numbers
    valid_months: String,
    /// Semicolon-separated crop ids; empty for every crop
    crop_ids: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    crop_id: String,
    year: i32,
    month: u8,
    price_per_lb: Decimal,
}

#[derive(Debug, Deserialize)]
struct WeatherRow {
    /// Parcel id or region
    location: String,
    month: u8,
    temp_f: Option<f64>,
    rainfall_in: Option<f64>,
}

/// Loads the catalog from a directory of CSV files
pub struct CatalogLoader {
    dir: PathBuf,
}

impl CatalogLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read every catalog file and validate the result
    pub fn load(&self) -> AppResult<InMemoryCatalog> {
        let mut catalog = InMemoryCatalog::new();

        for crop in parse_crops(self.open(CROPS_CSV)?, CROPS_CSV)? {
            catalog.add_crop(crop);
        }
        for parcel in parse_parcels(self.open(PARCELS_CSV)?, PARCELS_CSV)? {
            catalog.add_parcel(parcel);
        }
        for fertilizer in parse_fertilizers(self.open(FERTILIZERS_CSV)?, FERTILIZERS_CSV)? {
            catalog.add_fertilizer(fertilizer);
        }

        let prices = parse_prices(self.open(PRICE_HISTORY_CSV)?, PRICE_HISTORY_CSV)?;
        let price_count = prices.len();
        for point in prices {
            catalog.add_price(point);
        }

        let normals = parse_weather(self.open(WEATHER_NORMALS_CSV)?, WEATHER_NORMALS_CSV, false)?;
        let normal_count = normals.len();
        for (location, sample) in normals {
            catalog.add_weather_normal(location, sample);
        }

        let mut forecast_count = 0;
        if self.dir.join(WEATHER_FORECAST_CSV).exists() {
            let forecasts =
                parse_weather(self.open(WEATHER_FORECAST_CSV)?, WEATHER_FORECAST_CSV, true)?;
            forecast_count = forecasts.len();
            for (location, sample) in forecasts {
                catalog.add_weather_forecast(location, sample);
            }
        } else {
            tracing::warn!(
                "No {} in {}; monthly predictions use normals",
                WEATHER_FORECAST_CSV,
                self.dir.display()
            );
        }

        catalog
            .validate()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        tracing::info!(
            crops = catalog.crop_count(),
            parcels = catalog.parcel_count(),
            fertilizers = catalog.fertilizer_count(),
            prices = price_count,
            normals = normal_count,
            forecasts = forecast_count,
            "Catalog loaded from {}",
            self.dir.display()
        );

        Ok(catalog)
    }

    fn open(&self, file: &str) -> AppResult<std::fs::File> {
        let path = self.dir.join(file);
        std::fs::File::open(&path)
            .map_err(|e| AppError::Configuration(format!("Cannot open {}: {}", path.display(), e)))
    }
}

fn row_error(source: &str, row: usize, message: impl std::fmt::Display) -> AppError {
    AppError::Configuration(format!("{} row {}: {}", source, row, message))
}

/// Deserialize every record, numbering rows as they appear in the file (header is row 1)
fn read_rows<T: DeserializeOwned, R: Read>(reader: R, source: &str) -> AppResult<Vec<(usize, T)>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<T>()
        .enumerate()
        .map(|(i, result)| {
            let row = i + 2;
            result.map(|record| (row, record)).map_err(|e| row_error(source, row, e))
        })
        .collect()
}

fn month(source: &str, row: usize, value: u8) -> AppResult<Month> {
    Month::try_from(value).map_err(|msg| row_error(source, row, msg))
}

fn parse_field<T: FromStr<Err = &'static str>>(source: &str, row: usize, value: &str) -> AppResult<T> {
    value
        .parse::<T>()
        .map_err(|msg| row_error(source, row, format!("{} ({})", msg, value)))
}

pub fn parse_crops<R: Read>(reader: R, source: &str) -> AppResult<Vec<Crop>> {
    read_rows::<CropRow, _>(reader, source)?
        .into_iter()
        .map(|(row, r)| {
            let ideal_soil_ph = match (r.ph_min, r.ph_max) {
                (Some(min), Some(max)) => IdealRange::new(min, max),
                _ => DEFAULT_IDEAL_SOIL_PH,
            };
            Ok(Crop {
                category: parse_field::<CropCategory>(source, row, &r.category)?,
                planting_window: PlantingWindow::new(
                    month(source, row, r.plant_start_month)?,
                    month(source, row, r.plant_end_month)?,
                ),
                id: r.crop_id,
                name: r.name,
                ideal_temperature_f: IdealRange::new(r.temp_min_f, r.temp_max_f),
                ideal_rainfall_in: IdealRange::new(r.rain_min_in, r.rain_max_in),
                ideal_soil_ph,
                base_yield_per_acre: r.base_yield_lb_per_acre,
                base_price_per_lb: r.base_price_per_lb,
                fertilizer_lbs_per_acre: r.fertilizer_lb_per_acre,
                overhead_per_acre: r.overhead_per_acre,
            })
        })
        .collect()
}

pub fn parse_parcels<R: Read>(reader: R, source: &str) -> AppResult<Vec<Parcel>> {
    read_rows::<ParcelRow, _>(reader, source)?
        .into_iter()
        .map(|(row, r)| {
            let area_unit = match r.area_unit.as_deref() {
                None | Some("") => AreaUnit::default(),
                Some(unit) => parse_field::<AreaUnit>(source, row, unit)?,
            };
            Ok(Parcel {
                soil_type: parse_field::<SoilType>(source, row, &r.soil_type)?,
                ground_type: parse_field::<GroundType>(source, row, &r.ground_type)?,
                id: r.parcel_id,
                name: r.name,
                region: r.region,
                soil_ph: r.soil_ph,
                area: r.area,
                area_unit,
            })
        })
        .collect()
}

pub fn parse_fertilizers<R: Read>(reader: R, source: &str) -> AppResult<Vec<Fertilizer>> {
    read_rows::<FertilizerRow, _>(reader, source)?
        .into_iter()
        .map(|(row, r)| {
            let valid_months = r
                .valid_months
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    let n = s
                        .parse::<u8>()
                        .map_err(|_| row_error(source, row, format!("Invalid month ({})", s)))?;
                    month(source, row, n)
                })
                .collect::<AppResult<Vec<Month>>>()?;
            let crop_ids = r
                .crop_ids
                .unwrap_or_default()
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            Ok(Fertilizer {
                id: r.fertilizer_id,
                name: r.name,
                npk: NpkRatio::new(r.n, r.p, r.k),
                cost_per_lb: r.cost_per_lb,
                valid_months,
                crop_ids,
            })
        })
        .collect()
}

pub fn parse_prices<R: Read>(reader: R, source: &str) -> AppResult<Vec<PricePoint>> {
    read_rows::<PriceRow, _>(reader, source)?
        .into_iter()
        .map(|(row, r)| {
            Ok(PricePoint {
                month: month(source, row, r.month)?,
                crop_id: r.crop_id,
                year: r.year,
                price_per_lb: r.price_per_lb,
            })
        })
        .collect()
}

/// Weather rows keyed by location; `forecast` selects the sample source
pub fn parse_weather<R: Read>(
    reader: R,
    source: &str,
    forecast: bool,
) -> AppResult<Vec<(String, WeatherSample)>> {
    read_rows::<WeatherRow, _>(reader, source)?
        .into_iter()
        .map(|(row, r)| {
            let m = month(source, row, r.month)?;
            let sample = if forecast {
                WeatherSample::forecast(m, r.temp_f, r.rainfall_in)
            } else {
                WeatherSample::normal(m, r.temp_f, r.rainfall_in)
            };
            Ok((r.location, sample))
        })
        .collect()
}
