//! Services for the Harvest crop planner

pub mod catalog;
pub mod catalog_loader;
pub mod recommendation;

pub use catalog::CatalogService;
pub use catalog_loader::CatalogLoader;
pub use recommendation::RecommendationService;
