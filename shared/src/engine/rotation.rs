//! Long-term rotation planning
//!
//! A greedy, forward-only pass over twelve months. Each month's candidates are scored
//! on weather normals, then nudged by a diversification adjustment that favours crops
//! the plan has not used recently. The pick is final; later months never revise it.
//!
//! The adjustment is `bonus × freshness × scale`, where `scale` is the largest absolute
//! profit among the month's candidates. It never depends on a candidate's own sign, so
//! crops that are equally fresh keep their profit order even when every crop loses money.

use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::catalog::CatalogRepository;
use crate::engine::eligibility::{evaluate_eligibility, WeatherBasis};
use crate::engine::ranker::score_candidate;
use crate::engine::{parse_month, resolve_parcel, AnnualPlanRequest, EngineSettings};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AnnualSummary, CropCategory, RecommendationRecord, RotationAlternative, RotationChoice,
    RotationEntry, RotationPlan, SkipReason, SuccessionKind, SuccessionNote,
};
use crate::types::{Month, MONTHS_PER_YEAR};
use crate::validation::validate_diversification_bonus;

/// Runners-up kept on each planned month
pub const ROTATION_ALTERNATIVES: usize = 3;

/// How long ago, in plan months, each crop was last chosen
#[derive(Debug, Default)]
pub struct RotationHistory {
    last_chosen: HashMap<String, usize>,
}

impl RotationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, crop_id: &str, step: usize) {
        self.last_chosen.insert(crop_id.to_string(), step);
    }

    /// 1.0 for a crop never chosen; otherwise `(months_since - 1) / 11`
    pub fn freshness(&self, crop_id: &str, step: usize) -> f64 {
        match self.last_chosen.get(crop_id) {
            None => 1.0,
            Some(&last) => {
                let months_since = step.saturating_sub(last).max(1);
                ((months_since - 1) as f64 / (MONTHS_PER_YEAR - 1) as f64).clamp(0.0, 1.0)
            }
        }
    }
}

/// Largest absolute profit among a month's candidates; zero for none
pub fn diversification_scale(records: &[RecommendationRecord]) -> Decimal {
    records
        .iter()
        .map(|r| r.profit.abs())
        .max()
        .unwrap_or(Decimal::ZERO)
}

/// `profit + bonus × freshness × scale`
pub fn adjusted_score(
    profit: Decimal,
    diversification_bonus: f64,
    freshness: f64,
    scale: Decimal,
) -> Decimal {
    let weight = Decimal::from_f64(diversification_bonus * freshness).unwrap_or(Decimal::ZERO);
    profit + weight * scale.abs()
}

/// Best-first: higher adjusted score, then higher profit, then crop name
fn compare_choices(a: &RotationChoice, b: &RotationChoice) -> Ordering {
    b.adjusted_score
        .cmp(&a.adjusted_score)
        .then_with(|| b.profit.cmp(&a.profit))
        .then_with(|| a.crop_name.cmp(&b.crop_name))
        .then_with(|| a.crop_id.cmp(&b.crop_id))
}

fn to_choice(record: RecommendationRecord, adjusted_score: Decimal, freshness: f64) -> RotationChoice {
    RotationChoice {
        crop_id: record.crop_id,
        crop_name: record.crop_name,
        category: record.category,
        effective_yield_per_acre: record.effective_yield_per_acre,
        confidence: record.confidence,
        profit: record.profit,
        adjusted_score,
        freshness,
        fertilizer: record.fertilizer,
    }
}

/// Agronomic note on planting `current` after `previous`
pub fn succession_note(previous: &RotationChoice, current: &RotationChoice) -> SuccessionNote {
    let (kind, message) = if previous.crop_id == current.crop_id {
        (
            SuccessionKind::Concern,
            format!("Consecutive {} may deplete soil nutrients", current.crop_name),
        )
    } else {
        match (previous.category, current.category) {
            (CropCategory::Legume, next) if next.benefits_from_legume() => (
                SuccessionKind::Beneficial,
                format!("{} uses nitrogen fixed by {}", current.crop_name, previous.crop_name),
            ),
            (CropCategory::Root, CropCategory::Root) => (
                SuccessionKind::Concern,
                "Root crops in succession increase disease risk".to_string(),
            ),
            (CropCategory::Grain, CropCategory::Legume) => (
                SuccessionKind::Beneficial,
                format!("{} restores nitrogen after {}", current.crop_name, previous.crop_name),
            ),
            (CropCategory::Root, CropCategory::Grain) => (
                SuccessionKind::Beneficial,
                "Grain after a root crop breaks disease cycles".to_string(),
            ),
            _ => (
                SuccessionKind::Neutral,
                "No significant interactions identified".to_string(),
            ),
        }
    };

    SuccessionNote {
        kind,
        previous_crop: previous.crop_name.clone(),
        message,
    }
}

/// Plan a crop (or fallow) for each of the twelve months starting at `start_month`
pub fn plan_annual<C: CatalogRepository + ?Sized>(
    catalog: &C,
    settings: &EngineSettings,
    request: &AnnualPlanRequest,
) -> EngineResult<RotationPlan> {
    let start_month = parse_month("start_month", request.start_month)?;
    validate_diversification_bonus(request.diversification_bonus)
        .map_err(|msg| EngineError::validation("diversification_bonus", msg))?;

    let parcel = resolve_parcel(catalog, &request.parcel_id)?;
    let mut history = RotationHistory::new();
    let mut previous: Option<RotationChoice> = None;
    let mut entries = Vec::with_capacity(MONTHS_PER_YEAR);

    for (step, month) in Month::cycle_from(start_month).enumerate() {
        let eligibility = evaluate_eligibility(catalog, parcel, month, WeatherBasis::Normal);
        let candidates_considered = eligibility.candidates.len();

        if eligibility.candidates.is_empty() {
            let reason = if eligibility.has_data_gaps() {
                SkipReason::DataUnavailable
            } else {
                SkipReason::NoEligibleCrops
            };
            entries.push(RotationEntry::fallow(month, reason, 0));
            continue;
        }

        let survivors: Vec<RecommendationRecord> = eligibility
            .candidates
            .iter()
            .map(|candidate| score_candidate(catalog, settings, parcel, month, candidate))
            .filter(|record| record.profit >= request.min_profit_threshold)
            .collect();
        let scale = diversification_scale(&survivors);

        let mut choices: Vec<RotationChoice> = survivors
            .into_iter()
            .map(|record| {
                let freshness = history.freshness(&record.crop_id, step);
                let score =
                    adjusted_score(record.profit, request.diversification_bonus, freshness, scale);
                to_choice(record, score, freshness)
            })
            .collect();
        choices.sort_by(compare_choices);

        let mut ranked = choices.into_iter();
        let Some(choice) = ranked.next() else {
            entries.push(RotationEntry::fallow(
                month,
                SkipReason::BelowProfitThreshold,
                candidates_considered,
            ));
            continue;
        };

        let alternatives = ranked
            .take(ROTATION_ALTERNATIVES)
            .map(|alt| RotationAlternative::from(&alt))
            .collect();

        history.record(&choice.crop_id, step);
        let succession = previous.as_ref().map(|prev| succession_note(prev, &choice));
        previous = Some(choice.clone());

        entries.push(RotationEntry {
            month,
            choice: Some(choice),
            skip_reason: None,
            succession,
            candidates_considered,
            alternatives,
        });
    }

    let summary = AnnualSummary::from_entries(&entries);

    Ok(RotationPlan {
        parcel_id: parcel.id.clone(),
        start_month,
        diversification_bonus: request.diversification_bonus,
        min_profit_threshold: request.min_profit_threshold,
        entries,
        summary,
    })
}
