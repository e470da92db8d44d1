//! Configuration management for the Harvest crop planner
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with HARVEST_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{EngineSettings, FertilizerPreference, PenaltySettings, RankingMethod};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Reference data location
    pub data: DataConfig,

    /// Engine defaults and penalty tuning
    pub engine: EngineConfig,

    /// Image-ordering service
    pub image_send: ImageSendConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Directory holding the catalog CSV files
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    pub default_top_n: usize,
    pub default_min_confidence: f64,
    pub default_ranking_method: RankingMethod,
    pub default_diversification_bonus: f64,
    pub default_min_profit_threshold: Decimal,
    pub fertilizer_preference: FertilizerPreference,

    /// Temperature deviation (°F) at which the penalty reaches 1.0
    pub temperature_max_deviation_f: f64,

    /// Rainfall deviation (inches) at which the penalty reaches 1.0
    pub rainfall_max_deviation_in: f64,

    /// Soil pH deviation at which the penalty reaches 1.0
    pub soil_ph_max_deviation: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageSendConfig {
    /// Forward image order after each prediction
    pub enabled: bool,

    /// Image-ordering service endpoint
    pub api_endpoint: String,

    /// Image-ordering service API key
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Directory holding crop images
    pub images_dir: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("HARVEST_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("data.dir", "data")?
            .set_default("engine.default_top_n", 5)?
            .set_default("engine.default_min_confidence", 60.0)?
            .set_default("engine.default_ranking_method", "profit")?
            .set_default("engine.default_diversification_bonus", 0.1)?
            .set_default("engine.default_min_profit_threshold", "0")?
            .set_default("engine.fertilizer_preference", "balanced")?
            .set_default("engine.temperature_max_deviation_f", 40.0)?
            .set_default("engine.rainfall_max_deviation_in", 12.0)?
            .set_default("engine.soil_ph_max_deviation", 3.0)?
            .set_default("image_send.enabled", false)?
            .set_default("image_send.api_endpoint", "https://api.example.com/imageSend")?
            .set_default("image_send.api_key", "")?
            .set_default("image_send.timeout_secs", 30)?
            .set_default("image_send.images_dir", "images")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (HARVEST_ prefix)
            .add_source(
                Environment::with_prefix("HARVEST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl EngineConfig {
    /// Engine tunables derived from this configuration
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            penalties: PenaltySettings {
                temperature_max_deviation_f: self.temperature_max_deviation_f,
                rainfall_max_deviation_in: self.rainfall_max_deviation_in,
                soil_ph_max_deviation: self.soil_ph_max_deviation,
            },
            fertilizer_preference: self.fertilizer_preference,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_top_n: 5,
            default_min_confidence: 60.0,
            default_ranking_method: RankingMethod::Profit,
            default_diversification_bonus: 0.1,
            default_min_profit_threshold: Decimal::ZERO,
            fertilizer_preference: FertilizerPreference::Balanced,
            temperature_max_deviation_f: 40.0,
            rainfall_max_deviation_in: 12.0,
            soil_ph_max_deviation: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults_match_penalty_defaults() {
        let settings = EngineConfig::default().settings();
        assert_eq!(settings.penalties, PenaltySettings::default());
        assert_eq!(settings.fertilizer_preference, FertilizerPreference::Balanced);
    }
}
