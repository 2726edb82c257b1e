pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod filter;
pub mod fulfillment;
pub mod geo;
pub mod rank;

pub use catalog::{
    Catalog, CatalogFileError, CatalogHandle, CatalogProvider, StaticCatalogProvider,
};
pub use config::{ConfigError, EngineConfig, GeoTable, ResolvedLocation, SynonymBucket};
pub use domain::matching::{FulfillmentLine, FulfillmentSummary, MatchResult};
pub use domain::request::{LeadTimePreference, Query, RawItem, RawRequest, RequestedItem};
pub use domain::supplier::{
    AvailabilityStatus, ItemAvailability, Platform, Supplier, SupplierId, SupplierLocation,
    SupplierProfile,
};
pub use engine::MatchEngine;
pub use errors::{DomainError, MatchError};
pub use geo::ProximityTier;
pub use rank::SortStrategy;
