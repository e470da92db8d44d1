//! Parcel-scale revenue, cost and profit arithmetic
//!
//! Money is carried as `Decimal` rounded to cents; agronomic quantities stay `f64`.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::models::{Crop, FertilizerChoice, ProfitSensitivity};
use crate::types::SQUARE_FEET_PER_ACRE;

/// Money results for one crop on one parcel
#[derive(Debug, Clone, PartialEq)]
pub struct Economics {
    pub acres: f64,
    pub revenue: Decimal,
    pub cost: Decimal,
    /// Always `revenue - cost`
    pub profit: Decimal,
    /// Absent for a zero-acre parcel
    pub profit_per_acre: Option<Decimal>,
    /// Absent when the cost is zero
    pub roi_percent: Option<Decimal>,
    /// Yield per acre (lb) at which revenue covers cost; absent for a zero price
    pub break_even_yield_per_acre: Option<f64>,
    /// Pounds harvested on the whole parcel
    pub harvest_lbs: Decimal,
}

/// Price swing used for sensitivity figures: ±10%
pub fn default_price_variation() -> Decimal {
    Decimal::new(10, 2)
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Per-acre cost: fertilizer for the crop's requirement plus overhead
pub fn cost_per_acre(crop: &Crop, fertilizer: Option<&FertilizerChoice>) -> Decimal {
    let fertilizer_cost = fertilizer
        .map(|f| f.cost_per_lb * to_decimal(crop.fertilizer_lbs_per_acre))
        .unwrap_or(Decimal::ZERO);
    fertilizer_cost + crop.effective_overhead_per_acre()
}

/// Revenue, cost and profit of growing `crop` on `area_sqft` square feet
pub fn calculate_economics(
    crop: &Crop,
    effective_yield_per_acre: f64,
    area_sqft: f64,
    price_per_lb: Decimal,
    fertilizer: Option<&FertilizerChoice>,
) -> Economics {
    let acres_dec = to_decimal(area_sqft.max(0.0)) / to_decimal(SQUARE_FEET_PER_ACRE);
    let per_acre_cost = cost_per_acre(crop, fertilizer);

    let harvest = acres_dec * to_decimal(effective_yield_per_acre.max(0.0));
    let revenue = (harvest * price_per_lb).round_dp(2);
    let cost = (acres_dec * per_acre_cost).round_dp(2);
    let profit = revenue - cost;

    let profit_per_acre = (!acres_dec.is_zero()).then(|| (profit / acres_dec).round_dp(2));
    let roi_percent = (!cost.is_zero()).then(|| (profit / cost * Decimal::ONE_HUNDRED).round_dp(2));
    let break_even_yield_per_acre = (price_per_lb > Decimal::ZERO)
        .then(|| (per_acre_cost / price_per_lb).round_dp(2).to_f64())
        .flatten();

    Economics {
        acres: area_sqft.max(0.0) / SQUARE_FEET_PER_ACRE,
        revenue,
        cost,
        profit,
        profit_per_acre,
        roi_percent,
        break_even_yield_per_acre,
        harvest_lbs: harvest.round_dp(2),
    }
}

/// Profit at the market price moved down and up by `price_variation`
///
/// Revenue is linear in price, so both scenarios scale the rounded revenue; cost is unchanged.
pub fn profit_sensitivity(economics: &Economics, price_variation: Decimal) -> ProfitSensitivity {
    let variation = price_variation.max(Decimal::ZERO);
    let profit_at = |factor: Decimal| (economics.revenue * factor).round_dp(2) - economics.cost;

    ProfitSensitivity {
        price_variation: variation,
        profit_at_low_price: profit_at(Decimal::ONE - variation),
        profit_at_high_price: profit_at(Decimal::ONE + variation),
        profit_per_price_unit: economics.harvest_lbs,
        break_even_price_per_lb: (economics.harvest_lbs > Decimal::ZERO)
            .then(|| (economics.cost / economics.harvest_lbs).round_dp(4)),
    }
}
