//! Land parcel models

use serde::{Deserialize, Serialize};

use crate::models::crop::CropCategory;
use crate::types::{AreaUnit, SQUARE_FEET_PER_ACRE};

/// A parcel of land that crops are planned for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parcel {
    pub id: String,
    pub name: String,
    /// Region key used to resolve weather records
    pub region: String,
    pub soil_type: SoilType,
    pub ground_type: GroundType,
    pub soil_ph: Option<f64>,
    pub area: f64,
    #[serde(default)]
    pub area_unit: AreaUnit,
}

impl Parcel {
    pub fn area_sqft(&self) -> f64 {
        self.area_unit.to_square_feet(self.area)
    }

    pub fn acres(&self) -> f64 {
        self.area_sqft() / SQUARE_FEET_PER_ACRE
    }
}

/// Dominant soil texture of a parcel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Sandy,
    Loamy,
    Clay,
    Silt,
    Peat,
    Chalky,
}

impl SoilType {
    /// Whether crops of `category` can be grown in this soil
    pub fn supports(&self, category: CropCategory) -> bool {
        !matches!(
            (self, category),
            (SoilType::Clay, CropCategory::Root)
                | (SoilType::Peat, CropCategory::Legume)
                | (SoilType::Peat, CropCategory::Fiber)
                | (SoilType::Chalky, CropCategory::Vegetable)
        )
    }
}

impl std::str::FromStr for SoilType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandy" | "sand" => Ok(SoilType::Sandy),
            "loamy" | "loam" => Ok(SoilType::Loamy),
            "clay" => Ok(SoilType::Clay),
            "silt" | "silty" => Ok(SoilType::Silt),
            "peat" | "peaty" => Ok(SoilType::Peat),
            "chalky" | "chalk" => Ok(SoilType::Chalky),
            _ => Err("Unknown soil type"),
        }
    }
}

/// Terrain of a parcel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GroundType {
    Flat,
    Sloped,
    Terraced,
    Wetland,
}

impl GroundType {
    /// Whether crops of `category` can be grown on this terrain
    pub fn supports(&self, category: CropCategory) -> bool {
        match self {
            GroundType::Flat => true,
            GroundType::Sloped => !matches!(category, CropCategory::Root | CropCategory::Fiber),
            GroundType::Terraced => category != CropCategory::Fiber,
            GroundType::Wetland => matches!(category, CropCategory::Grain | CropCategory::Forage),
        }
    }
}

impl std::str::FromStr for GroundType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "level" => Ok(GroundType::Flat),
            "sloped" | "slope" | "hilly" => Ok(GroundType::Sloped),
            "terraced" | "terrace" => Ok(GroundType::Terraced),
            "wetland" | "marsh" => Ok(GroundType::Wetland),
            _ => Err("Unknown ground type"),
        }
    }
}
