//! Market price models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Month;

/// Observed market price for a crop in one month of one year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub crop_id: String,
    pub year: i32,
    pub month: Month,
    /// Price per pound ($)
    pub price_per_lb: Decimal,
}
