//! Weather observation models

use serde::{Deserialize, Serialize};

use crate::types::Month;

/// Monthly weather figures for a parcel or region
///
/// Either figure may be absent; absent factors are not penalized but reduce confidence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeatherSample {
    pub month: Month,
    pub temperature_f: Option<f64>,
    pub rainfall_in: Option<f64>,
    pub source: WeatherSource,
}

impl WeatherSample {
    pub fn normal(month: Month, temperature_f: Option<f64>, rainfall_in: Option<f64>) -> Self {
        Self {
            month,
            temperature_f,
            rainfall_in,
            source: WeatherSource::Normal,
        }
    }

    pub fn forecast(month: Month, temperature_f: Option<f64>, rainfall_in: Option<f64>) -> Self {
        Self {
            month,
            temperature_f,
            rainfall_in,
            source: WeatherSource::Forecast,
        }
    }

    /// True when neither figure is present
    pub fn is_empty(&self) -> bool {
        self.temperature_f.is_none() && self.rainfall_in.is_none()
    }
}

/// Where a weather sample came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    /// Long-run monthly average
    Normal,
    /// Forecast for the upcoming season
    Forecast,
}
