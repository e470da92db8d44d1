//! HTTP request handlers

pub mod catalog;
pub mod health;
pub mod prediction;

pub use catalog::{get_parcel, list_crops, list_parcels};
pub use health::health_check;
pub use prediction::{plan_annual, predict_monthly};
