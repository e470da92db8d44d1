//! Validation utilities for planner inputs and reference data
//!
//! Every check returns a static message; callers decide which field to attach it to.

use crate::types::IdealRange;

// ============================================================================
// Request Validations
// ============================================================================

/// Validate a calendar month number (1-12)
pub fn validate_month(month: u8) -> Result<(), &'static str> {
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12");
    }
    Ok(())
}

/// Validate the number of recommendations requested
pub fn validate_top_n(top_n: usize) -> Result<(), &'static str> {
    if top_n < 1 {
        return Err("top_n must be at least 1");
    }
    Ok(())
}

/// Validate a minimum confidence threshold (0-100)
pub fn validate_min_confidence(min_confidence: f64) -> Result<(), &'static str> {
    if !min_confidence.is_finite() || !(0.0..=100.0).contains(&min_confidence) {
        return Err("min_confidence must be between 0 and 100");
    }
    Ok(())
}

/// Validate a parcel area in square feet
pub fn validate_parcel_area(area_sqft: f64) -> Result<(), &'static str> {
    if !area_sqft.is_finite() {
        return Err("Parcel area must be a finite number");
    }
    if area_sqft <= 0.0 {
        return Err("Parcel area must be greater than zero");
    }
    Ok(())
}

/// Validate the rotation diversification bonus
pub fn validate_diversification_bonus(bonus: f64) -> Result<(), &'static str> {
    if !bonus.is_finite() {
        return Err("Diversification bonus must be a finite number");
    }
    if bonus < 0.0 {
        return Err("Diversification bonus cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Reference Data Validations
// ============================================================================

/// Validate a soil pH reading
pub fn validate_soil_ph(ph: f64) -> Result<(), &'static str> {
    if !ph.is_finite() || !(0.0..=14.0).contains(&ph) {
        return Err("Soil pH must be between 0 and 14");
    }
    Ok(())
}

/// Validate an ideal growing range
pub fn validate_ideal_range(range: &IdealRange) -> Result<(), &'static str> {
    if !range.is_valid() {
        return Err("Ideal range minimum must not exceed its maximum");
    }
    Ok(())
}

/// Validate a maximum deviation used by the penalty ramp
pub fn validate_max_deviation(max_deviation: f64) -> Result<(), &'static str> {
    if !max_deviation.is_finite() || max_deviation <= 0.0 {
        return Err("Maximum deviation must be a positive number");
    }
    Ok(())
}
