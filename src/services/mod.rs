pub mod catalog_service;
pub use catalog_service::{CatalogError, CatalogService, DataOrigin, FEATURED_LIMIT, Fetched};

pub mod catalog_service_impl;
pub use catalog_service_impl::DefaultCatalogService;
