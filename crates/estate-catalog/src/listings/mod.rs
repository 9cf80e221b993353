//! Property listings: the stored model, the backend REST surface, and the pure
//! derivations (curation, filtering, price formatting) the storefront runs over
//! a fetched collection.

pub mod curation;
pub mod domain;
pub mod filter;
pub mod import;
pub mod pricing;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
pub(crate) mod tests;

pub use curation::{segment, segment_with, CatalogSections, HotDealFill};
pub use domain::{
    ListingStatus, ListingValidationError, Property, PropertyDraft, PropertyId, PropertyPatch,
    PropertyType,
};
pub use filter::ListingFilter;
pub use import::{ListingImportError, ListingImporter};
pub use pricing::{format_measure, format_price, Currency};
pub use repository::{InMemoryListingRepository, ListingRepository, RepositoryError};
pub use router::{listing_router, ListingApi};
pub use service::{ListingService, ListingServiceError};
