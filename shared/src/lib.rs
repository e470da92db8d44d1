//! Shared types, models and the planning engine for the Harvest crop planner
//!
//! The engine is pure: it reads reference data through [`catalog::CatalogRepository`]
//! and performs no I/O. The backend crate wires it to CSV data and HTTP.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use catalog::*;
pub use engine::{AnnualPlanRequest, Engine, EngineSettings, MonthlyRequest, PenaltySettings};
pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
