//! Tests for result formatting
//! Rounding, month names and image order for both prediction kinds

mod common;

use common::*;
use rust_decimal::Decimal;
use shared::engine::formatter::{
    format_monthly_prediction, format_rotation_plan, long_term_image_order, FALLOW_LABEL,
    SHORT_TERM_IMAGE_COUNT,
};
use shared::{
    AnnualPlanRequest, CropCategory, Engine, EngineSettings, IdealRange, MonthlyRequest,
    RankingMethod, Season,
};

fn six_crop_catalog() -> shared::InMemoryCatalog {
    let mut catalog = three_crop_catalog();
    for (name, p) in [("Barley", "0.20"), ("Oats", "0.15"), ("Rice", "0.10")] {
        catalog.add_crop(crop(name, CropCategory::Grain, (1, 12), 10_000.0));
        catalog = with_year_round_price(catalog, name, p);
    }
    catalog
}

#[test]
fn monthly_prediction_shape() {
    let catalog = six_crop_catalog();
    let prediction = Engine::new(&catalog, EngineSettings::default())
        .predict_month(&MonthlyRequest {
            parcel_id: "P1".to_string(),
            month: 9,
            top_n: 10,
            ranking_method: RankingMethod::Profit,
            min_confidence: 60.0,
        })
        .unwrap();
    let formatted = format_monthly_prediction(&prediction);

    assert_eq!(formatted.month_name, "September");
    assert_eq!(formatted.season, Season::Fall);
    assert_eq!(formatted.recommendations.len(), 6);
    assert_eq!(formatted.image_order.len(), SHORT_TERM_IMAGE_COUNT);
    assert_eq!(
        formatted.image_order,
        vec!["Corn", "Soybean", "Wheat", "Barley", "Oats"]
    );

    let top = &formatted.recommendations[0];
    assert_eq!(top.revenue, Decimal::new(400_000, 2));
    assert_eq!(top.confidence, 100.0);
    assert_eq!(top.confidence_level, "Very High");
    assert_eq!(top.penalties.aggregate, 0.0);
    assert_eq!(top.sensitivity.profit_at_low_price, Decimal::new(360_000, 2));
    assert_eq!(top.composite_score, None);
}

#[test]
fn penalties_rounded_to_four_places() {
    let mut catalog = three_crop_catalog();
    let mut odd = crop("Odd", CropCategory::Forage, (1, 12), 10_000.0);
    // 65 °F is 7 °F below the range: 7 / 40
    odd.ideal_temperature_f = IdealRange::new(72.0, 80.0);
    catalog.add_crop(odd);
    let catalog = with_year_round_price(catalog, "Odd", "0.333");

    let prediction = Engine::new(&catalog, EngineSettings::default())
        .predict_month(&MonthlyRequest {
            parcel_id: "P1".to_string(),
            month: 3,
            top_n: 5,
            ranking_method: RankingMethod::Profit,
            min_confidence: 0.0,
        })
        .unwrap();
    let formatted = format_monthly_prediction(&prediction);
    let odd = formatted
        .recommendations
        .iter()
        .find(|r| r.crop_id == "Odd")
        .unwrap();

    assert_eq!(odd.penalties.temperature, 0.175);
    assert_eq!(odd.effective_yield_per_acre, 8250.0);
    assert_eq!(odd.confidence, 82.5);
    assert!(odd.revenue.scale() <= 2);
}

#[test]
fn rotation_plan_image_order_labels_fallow() {
    let catalog = three_crop_catalog();
    let plan = Engine::new(&catalog, EngineSettings::default())
        .plan_annual(&AnnualPlanRequest {
            parcel_id: "P1".to_string(),
            start_month: 4,
            diversification_bonus: 0.0,
            min_profit_threshold: Decimal::from(5000),
        })
        .unwrap();

    let order = long_term_image_order(&plan);
    assert_eq!(order.len(), 12);
    assert!(order.iter().all(|name| name == FALLOW_LABEL));

    let formatted = format_rotation_plan(&plan);
    assert_eq!(formatted.start_month_name, "April");
    assert_eq!(formatted.entries[0].month_name, "April");
    assert_eq!(formatted.entries[11].month_name, "March");
    assert!(formatted.entries.iter().all(|e| e.crop_name.is_none()));
    assert_eq!(formatted.summary.best_month, None);
}

#[test]
fn rotation_plan_summary_names_months() {
    let catalog = three_crop_catalog();
    let plan = Engine::new(&catalog, EngineSettings::default())
        .plan_annual(&AnnualPlanRequest {
            parcel_id: "P1".to_string(),
            start_month: 1,
            diversification_bonus: 1.0,
            min_profit_threshold: Decimal::ZERO,
        })
        .unwrap();
    let formatted = format_rotation_plan(&plan);

    assert_eq!(formatted.image_order[0], "Corn");
    assert_eq!(formatted.image_order[1], "Soybean");
    assert_eq!(formatted.summary.best_month.as_deref(), Some("January"));
    assert_eq!(formatted.summary.worst_month.as_deref(), Some("March"));
    assert_eq!(formatted.entries[1].profit, Some(Decimal::new(300_000, 2)));

    let runners_up: Vec<&str> = formatted.entries[0]
        .alternatives
        .iter()
        .map(|a| a.crop_name.as_str())
        .collect();
    assert_eq!(runners_up, vec!["Soybean", "Wheat"]);
    assert_eq!(formatted.entries[0].alternatives[1].profit, Decimal::new(250_000, 2));
}
