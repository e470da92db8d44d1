//! Catalog fixtures shared by the engine integration tests

#![allow(dead_code)]

use rust_decimal::Decimal;
use shared::{
    AreaUnit, Crop, CropCategory, Fertilizer, GroundType, IdealRange, InMemoryCatalog, Month,
    NpkRatio, Parcel, PlantingWindow, PricePoint, SoilType, WeatherSample, DEFAULT_IDEAL_SOIL_PH,
};

pub const REGION: &str = "valley";

pub fn m(n: u8) -> Month {
    Month::new(n).unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn parcel(id: &str, soil: SoilType, ground: GroundType, acres: f64) -> Parcel {
    Parcel {
        id: id.to_string(),
        name: format!("Parcel {}", id),
        region: REGION.to_string(),
        soil_type: soil,
        ground_type: ground,
        soil_ph: Some(6.5),
        area: acres,
        area_unit: AreaUnit::Acres,
    }
}

/// Crop tolerant of 50-80 °F and 1-5 in of rain, with no overhead
pub fn crop(id: &str, category: CropCategory, window: (u8, u8), base_yield: f64) -> Crop {
    Crop {
        id: id.to_string(),
        name: id.to_string(),
        category,
        planting_window: PlantingWindow::new(m(window.0), m(window.1)),
        ideal_temperature_f: IdealRange::new(50.0, 80.0),
        ideal_rainfall_in: IdealRange::new(1.0, 5.0),
        ideal_soil_ph: DEFAULT_IDEAL_SOIL_PH,
        base_yield_per_acre: base_yield,
        base_price_per_lb: dec("0.25"),
        fertilizer_lbs_per_acre: 0.0,
        overhead_per_acre: Some(Decimal::ZERO),
    }
}

pub fn price(crop_id: &str, month: u8, price: &str) -> PricePoint {
    PricePoint {
        crop_id: crop_id.to_string(),
        year: 2024,
        month: m(month),
        price_per_lb: dec(price),
    }
}

pub fn fertilizer(id: &str, npk: (f64, f64, f64), cost: &str) -> Fertilizer {
    Fertilizer {
        id: id.to_string(),
        name: id.to_string(),
        npk: NpkRatio::new(npk.0, npk.1, npk.2),
        cost_per_lb: dec(cost),
        valid_months: Month::all().collect(),
        crop_ids: Vec::new(),
    }
}

/// Add ideal weather normals (65 °F, 3 in) for every month of the region
pub fn with_ideal_normals(mut catalog: InMemoryCatalog) -> InMemoryCatalog {
    for month in Month::all() {
        catalog.add_weather_normal(REGION, WeatherSample::normal(month, Some(65.0), Some(3.0)));
    }
    catalog
}

/// Add the same price for a crop in every month
pub fn with_year_round_price(mut catalog: InMemoryCatalog, crop_id: &str, p: &str) -> InMemoryCatalog {
    for n in 1..=12 {
        catalog.add_price(price(crop_id, n, p));
    }
    catalog
}

/// Corn, Soybean and Wheat plantable all year on a one-acre loamy parcel.
///
/// With ideal weather and no costs the monthly profits are 4000, 3000 and 2500.
pub fn three_crop_catalog() -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new()
        .with_parcel(parcel("P1", SoilType::Loamy, GroundType::Flat, 1.0))
        .with_crop(crop("Corn", CropCategory::Grain, (1, 12), 10_000.0))
        .with_crop(crop("Soybean", CropCategory::Legume, (1, 12), 10_000.0))
        .with_crop(crop("Wheat", CropCategory::Grain, (1, 12), 10_000.0));
    let catalog = with_ideal_normals(catalog);
    let catalog = with_year_round_price(catalog, "Corn", "0.40");
    let catalog = with_year_round_price(catalog, "Soybean", "0.30");
    with_year_round_price(catalog, "Wheat", "0.25")
}

/// One-acre parcel with year-round crops at 10000 lb/acre, given as (id, price, overhead)
///
/// Each crop's monthly profit is `10000 × price - overhead`, so a high overhead makes a loss.
pub fn year_round_catalog(crops: &[(String, Decimal, Decimal)]) -> InMemoryCatalog {
    let mut catalog = with_ideal_normals(
        InMemoryCatalog::new().with_parcel(parcel("P1", SoilType::Loamy, GroundType::Flat, 1.0)),
    );
    for (id, price_per_lb, overhead) in crops {
        let mut c = crop(id, CropCategory::Grain, (1, 12), 10_000.0);
        c.overhead_per_acre = Some(*overhead);
        catalog.add_crop(c);
        for n in 1..=12 {
            catalog.add_price(PricePoint {
                crop_id: id.clone(),
                year: 2024,
                month: m(n),
                price_per_lb: *price_per_lb,
            });
        }
    }
    catalog
}
