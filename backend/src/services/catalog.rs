//! Read-only queries over the loaded catalog

use std::sync::Arc;

use shared::{CatalogRepository, InMemoryCatalog, Month};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{CropQuery, CropSummary, ParcelSummary};

/// Catalog service for parcel and crop listings
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<InMemoryCatalog>,
}

impl CatalogService {
    pub fn new(catalog: Arc<InMemoryCatalog>) -> Self {
        Self { catalog }
    }

    pub fn list_parcels(&self) -> Vec<ParcelSummary> {
        self.catalog
            .list_parcels()
            .into_iter()
            .map(ParcelSummary::from)
            .collect()
    }

    pub fn get_parcel(&self, parcel_id: &str) -> AppResult<ParcelSummary> {
        self.catalog
            .get_parcel(parcel_id)
            .map(ParcelSummary::from)
            .ok_or_else(|| AppError::NotFound(format!("Parcel {}", parcel_id)))
    }

    /// All crops, or only those plantable in the queried month
    pub fn list_crops(&self, query: &CropQuery) -> AppResult<Vec<CropSummary>> {
        query.validate()?;
        let month = query.month.and_then(Month::new);

        Ok(self
            .catalog
            .list_crops()
            .iter()
            .filter(|crop| month.map_or(true, |m| crop.is_plantable_in(m)))
            .map(CropSummary::from)
            .collect())
    }
}
