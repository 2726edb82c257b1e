//! Engine facade: one entry point wiring the pipeline stages together.
//! A query runs filter -> geo adjustment -> recommendation decoration ->
//! ranking against a single catalog snapshot, so a concurrent catalog
//! refresh never tears the results of an in-flight query.

use crate::catalog::{Catalog, CatalogHandle, CatalogProvider};
use crate::config::EngineConfig;
use crate::domain::matching::{FulfillmentSummary, MatchResult};
use crate::domain::request::{Query, RawRequest, RequestedItem};
use crate::domain::supplier::SupplierId;
use crate::errors::{DomainError, MatchError};
use crate::rank::SortStrategy;
use crate::{filter, fulfillment, geo, rank};

#[derive(Debug)]
pub struct MatchEngine {
    catalog: CatalogHandle,
    config: EngineConfig,
}

impl MatchEngine {
    pub fn new(catalog: Catalog, config: EngineConfig) -> Self {
        Self { catalog: CatalogHandle::new(catalog), config }
    }

    pub fn from_provider(
        provider: &dyn CatalogProvider,
        config: EngineConfig,
    ) -> Result<Self, DomainError> {
        Ok(Self::new(Catalog::from_provider(provider)?, config))
    }

    /// Normalizes a raw request and runs the full matching pipeline.
    pub fn submit(
        &self,
        raw: RawRequest,
        strategy: SortStrategy,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let query = raw.normalize()?;
        self.match_suppliers(&query, strategy)
    }

    /// Matches an already-normalized query against the current snapshot.
    pub fn match_suppliers(
        &self,
        query: &Query,
        strategy: SortStrategy,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let snapshot = self.catalog.snapshot();
        let candidates = filter::filter(&snapshot, query, &self.config)?;
        let adjusted: Vec<MatchResult> = candidates
            .into_iter()
            .map(|supplier| geo::adjust(supplier, query.location(), &self.config))
            .collect();
        let decorated = rank::decorate_recommendations(adjusted);
        Ok(rank::rank(decorated, strategy))
    }

    /// Per-item fulfillment breakdown for one supplier.
    pub fn fulfill(
        &self,
        supplier_id: &SupplierId,
        requested: &[RequestedItem],
    ) -> Result<FulfillmentSummary, MatchError> {
        let snapshot = self.catalog.snapshot();
        let supplier = snapshot
            .by_id(supplier_id)
            .ok_or_else(|| MatchError::UnknownSupplier(supplier_id.0.clone()))?;
        Ok(fulfillment::fulfill(supplier, requested, &self.config))
    }

    /// Atomically swaps in a fresh catalog snapshot.
    pub fn replace_catalog(&self, catalog: Catalog) {
        self.catalog.replace(catalog);
    }

    pub fn catalog(&self) -> &CatalogHandle {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
