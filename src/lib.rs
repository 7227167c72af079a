//! Catalog access layer for the AniStream frontend.
//!
//! Every page of the app (home, browse, detail, upload, profile) reads and
//! writes catalog data through [`CatalogService`]. The service resolves each
//! operation against the configured remote backend, or, when no backend is
//! configured or a read fails, against a fixed demonstration data set. Reads
//! never fail; writes are never silently dropped.

pub mod clients;
pub mod config;
pub mod fallback;
pub mod models;
pub mod services;

pub use clients::{Backend, BackendError, ProgressFn, RestBackend};
pub use config::BackendConfig;
pub use models::{
    Anime, AnimeDraft, AnimeStatus, Episode, EpisodeDraft, Profile, ProfileUpdate,
};
pub use services::{
    CatalogError, CatalogService, DataOrigin, DefaultCatalogService, FEATURED_LIMIT, Fetched,
};
