//! Short-term ranking of crops for a single month

use std::cmp::Ordering;

use rust_decimal::prelude::ToPrimitive;

use crate::catalog::CatalogRepository;
use crate::engine::economics::{calculate_economics, default_price_variation, profit_sensitivity};
use crate::engine::eligibility::{evaluate_eligibility, Candidate, WeatherBasis};
use crate::engine::fertilizer::choose_fertilizer;
use crate::engine::yield_model::effective_yield;
use crate::engine::{parse_month, resolve_parcel, EngineSettings, MonthlyRequest};
use crate::error::{EngineError, EngineResult};
use crate::models::{ConfidenceLevel, MonthlyPrediction, Parcel, RecommendationRecord};
use crate::types::{Month, RankingMethod};
use crate::validation::{validate_min_confidence, validate_top_n};

/// Composite weights for normalized profit, ROI and suitability
pub const COMPOSITE_WEIGHTS: [f64; 3] = [0.4, 0.3, 0.3];

/// Run the yield model and economics for one eligible crop; the record is unranked
pub fn score_candidate<C: CatalogRepository + ?Sized>(
    catalog: &C,
    settings: &EngineSettings,
    parcel: &Parcel,
    month: Month,
    candidate: &Candidate<'_>,
) -> RecommendationRecord {
    let crop = candidate.crop;
    let assessment = effective_yield(crop, &candidate.weather, parcel.soil_ph, &settings.penalties);
    let fertilizer = choose_fertilizer(catalog, &crop.id, month, settings.fertilizer_preference);
    let economics = calculate_economics(
        crop,
        assessment.effective_yield_per_acre,
        parcel.area_sqft(),
        candidate.price_per_lb,
        fertilizer.as_ref(),
    );
    let sensitivity = profit_sensitivity(&economics, default_price_variation());

    RecommendationRecord {
        rank: 0,
        crop_id: crop.id.clone(),
        crop_name: crop.name.clone(),
        category: crop.category,
        base_yield_per_acre: crop.base_yield_per_acre,
        effective_yield_per_acre: assessment.effective_yield_per_acre,
        penalties: assessment.penalties,
        price_per_lb: candidate.price_per_lb,
        revenue: economics.revenue,
        cost: economics.cost,
        profit: economics.profit,
        profit_per_acre: economics.profit_per_acre,
        roi_percent: economics.roi_percent,
        break_even_yield_per_acre: economics.break_even_yield_per_acre,
        sensitivity,
        confidence: assessment.confidence,
        confidence_level: ConfidenceLevel::from_score(assessment.confidence),
        fertilizer,
        weather_source: candidate.weather.source,
        composite_score: None,
    }
}

/// Position of `value` between `min` and `max`; `flat` when the range is empty
fn normalize(value: f64, min: f64, max: f64, flat: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        flat
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Composite score of every record against the others in the same set
///
/// Profit and ROI are min-max normalized (a missing ROI counts as the minimum), the
/// aggregate penalty is normalized and inverted, and the three are blended with
/// [`COMPOSITE_WEIGHTS`]. Scores lie in [0, 1].
pub fn composite_scores(records: &[RecommendationRecord]) -> Vec<f64> {
    let profit = |r: &RecommendationRecord| r.profit.to_f64().unwrap_or(0.0);
    let roi = |r: &RecommendationRecord| r.roi_percent.and_then(|v| v.to_f64());

    let (min_profit, max_profit) = bounds(records.iter().map(profit));
    let (min_roi, max_roi) = bounds(records.iter().filter_map(roi));
    let (min_penalty, max_penalty) = bounds(records.iter().map(|r| r.penalties.aggregate));
    let [profit_weight, roi_weight, suitability_weight] = COMPOSITE_WEIGHTS;

    records
        .iter()
        .map(|r| {
            let profit_norm = normalize(profit(r), min_profit, max_profit, 0.0);
            let roi_norm = roi(r).map_or(0.0, |v| normalize(v, min_roi, max_roi, 0.0));
            let suitability_norm =
                1.0 - normalize(r.penalties.aggregate, min_penalty, max_penalty, 0.0);
            profit_weight * profit_norm + roi_weight * roi_norm + suitability_weight * suitability_norm
        })
        .collect()
}

/// Ordering for `method`, best first; ties go to crop name then id
pub fn compare_records(
    a: &RecommendationRecord,
    b: &RecommendationRecord,
    method: RankingMethod,
) -> Ordering {
    let primary = match method {
        RankingMethod::Profit => b.profit.cmp(&a.profit),
        RankingMethod::Yield => b
            .effective_yield_per_acre
            .total_cmp(&a.effective_yield_per_acre),
        RankingMethod::Confidence => b.confidence.total_cmp(&a.confidence),
        RankingMethod::Roi => match (a.roi_percent, b.roi_percent) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        RankingMethod::Suitability => a.penalties.aggregate.total_cmp(&b.penalties.aggregate),
        RankingMethod::Composite => b
            .composite_score
            .unwrap_or(0.0)
            .total_cmp(&a.composite_score.unwrap_or(0.0)),
    };

    primary
        .then_with(|| a.crop_name.cmp(&b.crop_name))
        .then_with(|| a.crop_id.cmp(&b.crop_id))
}

/// Sort records best-first and number them from 1
///
/// The composite method scores the records against each other first.
pub fn rank_records(records: &mut [RecommendationRecord], method: RankingMethod) {
    if method == RankingMethod::Composite {
        let scores = composite_scores(records);
        for (record, score) in records.iter_mut().zip(scores) {
            record.composite_score = Some(score);
        }
    }
    records.sort_by(|a, b| compare_records(a, b, method));
    for (i, record) in records.iter_mut().enumerate() {
        record.rank = i + 1;
    }
}

/// Top crops for a parcel in one month
///
/// Weather comes from the month's forecast when one exists, otherwise the normal.
/// Crops without weather or price data are excluded rather than failing the request.
pub fn predict_month<C: CatalogRepository + ?Sized>(
    catalog: &C,
    settings: &EngineSettings,
    request: &MonthlyRequest,
) -> EngineResult<MonthlyPrediction> {
    let month = parse_month("month", request.month)?;
    validate_top_n(request.top_n).map_err(|msg| EngineError::validation("top_n", msg))?;
    validate_min_confidence(request.min_confidence)
        .map_err(|msg| EngineError::validation("min_confidence", msg))?;

    let parcel = resolve_parcel(catalog, &request.parcel_id)?;
    let eligibility = evaluate_eligibility(catalog, parcel, month, WeatherBasis::ForecastThenNormal);

    let scored: Vec<RecommendationRecord> = eligibility
        .candidates
        .iter()
        .map(|candidate| score_candidate(catalog, settings, parcel, month, candidate))
        .collect();
    let candidates_evaluated = scored.len();

    let mut recommendations: Vec<RecommendationRecord> = scored
        .into_iter()
        .filter(|r| r.confidence >= request.min_confidence)
        .collect();
    let below_confidence = candidates_evaluated - recommendations.len();

    rank_records(&mut recommendations, request.ranking_method);
    recommendations.truncate(request.top_n);

    Ok(MonthlyPrediction {
        parcel_id: parcel.id.clone(),
        month,
        ranking_method: request.ranking_method,
        candidates_evaluated,
        below_confidence,
        recommendations,
        exclusions: eligibility.exclusions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::models::{
        Crop, CropCategory, GroundType, PenaltyBreakdown, PlantingWindow, PricePoint,
        ProfitSensitivity, SoilType, WeatherSample, WeatherSource, DEFAULT_IDEAL_SOIL_PH,
    };
    use crate::types::{AreaUnit, IdealRange};
    use rust_decimal::Decimal;

    fn m(n: u8) -> Month {
        Month::new(n).unwrap()
    }

    fn record(name: &str, profit: i64, roi: Option<i64>) -> RecommendationRecord {
        RecommendationRecord {
            rank: 0,
            crop_id: name.to_lowercase(),
            crop_name: name.to_string(),
            category: CropCategory::Grain,
            base_yield_per_acre: 1000.0,
            effective_yield_per_acre: 800.0,
            penalties: PenaltyBreakdown::default(),
            price_per_lb: Decimal::ONE,
            revenue: Decimal::from(profit),
            cost: Decimal::ZERO,
            profit: Decimal::from(profit),
            profit_per_acre: None,
            roi_percent: roi.map(Decimal::from),
            break_even_yield_per_acre: None,
            sensitivity: ProfitSensitivity {
                price_variation: Decimal::ZERO,
                profit_at_low_price: Decimal::from(profit),
                profit_at_high_price: Decimal::from(profit),
                profit_per_price_unit: Decimal::ZERO,
                break_even_price_per_lb: None,
            },
            confidence: 90.0,
            confidence_level: ConfidenceLevel::VeryHigh,
            fertilizer: None,
            weather_source: WeatherSource::Normal,
            composite_score: None,
        }
    }

    fn with_penalty(mut record: RecommendationRecord, aggregate: f64) -> RecommendationRecord {
        record.penalties.aggregate = aggregate;
        record
    }

    #[test]
    fn test_rank_by_profit_breaks_ties_by_name() {
        let mut records = vec![
            record("Wheat", 100, None),
            record("Barley", 300, None),
            record("Alfalfa", 100, None),
        ];
        rank_records(&mut records, RankingMethod::Profit);

        let names: Vec<&str> = records.iter().map(|r| r.crop_name.as_str()).collect();
        assert_eq!(names, vec!["Barley", "Alfalfa", "Wheat"]);
        let ranks: Vec<usize> = records.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_rank_by_roi_puts_missing_last() {
        let mut records = vec![
            record("Corn", 100, None),
            record("Oats", 50, Some(20)),
            record("Rice", 10, Some(80)),
        ];
        rank_records(&mut records, RankingMethod::Roi);

        let names: Vec<&str> = records.iter().map(|r| r.crop_name.as_str()).collect();
        assert_eq!(names, vec!["Rice", "Oats", "Corn"]);
    }

    #[test]
    fn test_rank_by_composite_blends_factors() {
        let mut records = vec![
            with_penalty(record("Alfalfa", 100, Some(10)), 0.0),
            with_penalty(record("Barley", 300, Some(20)), 0.5),
            with_penalty(record("Canola", 200, Some(40)), 0.25),
        ];
        rank_records(&mut records, RankingMethod::Composite);

        // Canola: 0.4 * 0.5 + 0.3 * 1.0 + 0.3 * 0.5; Barley: 0.4 + 0.3 / 3; Alfalfa: 0.3
        let names: Vec<&str> = records.iter().map(|r| r.crop_name.as_str()).collect();
        assert_eq!(names, vec!["Canola", "Barley", "Alfalfa"]);
        let scores: Vec<f64> = records.iter().map(|r| r.composite_score.unwrap()).collect();
        assert!((scores[0] - 0.65).abs() < 1e-9);
        assert!((scores[1] - 0.5).abs() < 1e-9);
        assert!((scores[2] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_composite_with_identical_records() {
        let records = vec![record("Oats", 100, None), record("Rice", 100, None)];
        let scores = composite_scores(&records);
        // Flat profit and ROI add nothing; equal penalties count as fully suitable
        assert_eq!(scores, vec![0.3, 0.3]);
        assert!(composite_scores(&[]).is_empty());
    }

    #[test]
    fn test_other_methods_leave_composite_unset() {
        let mut records = vec![record("Oats", 100, None)];
        rank_records(&mut records, RankingMethod::Profit);
        assert_eq!(records[0].composite_score, None);
    }

    fn small_catalog() -> InMemoryCatalog {
        let crop = Crop {
            id: "corn".to_string(),
            name: "Corn".to_string(),
            category: CropCategory::Grain,
            planting_window: PlantingWindow::new(m(4), m(6)),
            ideal_temperature_f: IdealRange::new(60.0, 85.0),
            ideal_rainfall_in: IdealRange::new(3.0, 6.0),
            ideal_soil_ph: DEFAULT_IDEAL_SOIL_PH,
            base_yield_per_acre: 10_000.0,
            base_price_per_lb: Decimal::new(20, 2),
            fertilizer_lbs_per_acre: 0.0,
            overhead_per_acre: Some(Decimal::from(100)),
        };
        let parcel = Parcel {
            id: "P1".to_string(),
            name: "North".to_string(),
            region: "valley".to_string(),
            soil_type: SoilType::Loamy,
            ground_type: GroundType::Flat,
            soil_ph: Some(6.5),
            area: 1.0,
            area_unit: AreaUnit::Acres,
        };
        InMemoryCatalog::new()
            .with_parcel(parcel)
            .with_crop(crop)
            .with_weather_normal("valley", WeatherSample::normal(m(5), Some(70.0), Some(4.0)))
            .with_price(PricePoint {
                crop_id: "corn".to_string(),
                year: 2024,
                month: m(5),
                price_per_lb: Decimal::new(25, 2),
            })
    }

    fn request(month: u8) -> MonthlyRequest {
        MonthlyRequest {
            parcel_id: "P1".to_string(),
            month,
            top_n: 5,
            ranking_method: RankingMethod::Profit,
            min_confidence: 0.0,
        }
    }

    #[test]
    fn test_predict_month_scores_ideal_crop() {
        let catalog = small_catalog();
        let prediction = predict_month(&catalog, &EngineSettings::default(), &request(5)).unwrap();

        assert_eq!(prediction.recommendations.len(), 1);
        let top = &prediction.recommendations[0];
        assert_eq!(top.rank, 1);
        assert_eq!(top.effective_yield_per_acre, 10_000.0);
        assert_eq!(top.confidence, 100.0);
        assert_eq!(top.revenue, Decimal::from(2500));
        assert_eq!(top.cost, Decimal::from(100));
        assert_eq!(top.profit, Decimal::from(2400));
    }

    #[test]
    fn test_predict_month_validation_and_not_found() {
        let catalog = small_catalog();
        let settings = EngineSettings::default();

        let err = predict_month(&catalog, &settings, &request(13)).unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "month"));

        let mut req = request(5);
        req.top_n = 0;
        assert!(matches!(
            predict_month(&catalog, &settings, &req),
            Err(EngineError::Validation { .. })
        ));

        let mut req = request(5);
        req.parcel_id = "P404".to_string();
        assert!(matches!(
            predict_month(&catalog, &settings, &req),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_predict_month_without_data_is_empty() {
        let catalog = small_catalog();
        let prediction = predict_month(&catalog, &EngineSettings::default(), &request(6)).unwrap();
        assert!(prediction.is_empty());
        assert_eq!(prediction.candidates_evaluated, 0);
        assert_eq!(prediction.exclusions.len(), 1);
    }
}
