//! Fertilizer matching for a crop and planting month

use std::cmp::Ordering;

use crate::catalog::CatalogRepository;
use crate::models::{Fertilizer, FertilizerChoice};
use crate::types::{FertilizerPreference, Month};

/// Pick the best fertilizer among `options` that may be applied in `month`
///
/// Ties fall back to the cheaper product, then to the name.
pub fn select_fertilizer(
    options: &[&Fertilizer],
    month: Month,
    preference: FertilizerPreference,
) -> Option<FertilizerChoice> {
    options
        .iter()
        .copied()
        .filter(|f| f.is_valid_in(month))
        .min_by(|a, b| compare_by_preference(a, b, preference))
        .map(FertilizerChoice::from)
}

/// Look up the crop's fertilizer options in the catalog and pick one
pub fn choose_fertilizer<C: CatalogRepository + ?Sized>(
    catalog: &C,
    crop_id: &str,
    month: Month,
    preference: FertilizerPreference,
) -> Option<FertilizerChoice> {
    let options = catalog.get_fertilizer_options(crop_id);
    select_fertilizer(&options, month, preference)
}

/// Orders fertilizers best-first
fn compare_by_preference(a: &Fertilizer, b: &Fertilizer, preference: FertilizerPreference) -> Ordering {
    let primary = match preference {
        FertilizerPreference::Balanced => a.npk.variance().total_cmp(&b.npk.variance()),
        FertilizerPreference::Nitrogen => b.npk.nitrogen.total_cmp(&a.npk.nitrogen),
        FertilizerPreference::Phosphorus => b.npk.phosphorus.total_cmp(&a.npk.phosphorus),
        FertilizerPreference::Potassium => b.npk.potassium.total_cmp(&a.npk.potassium),
        FertilizerPreference::Cost => Ordering::Equal,
    };

    primary
        .then_with(|| a.cost_per_lb.cmp(&b.cost_per_lb))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
