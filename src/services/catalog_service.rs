//! Domain service for catalog access.
//!
//! One façade over catalog, episode, favorite and profile data, uniform for
//! every page regardless of whether a live backend is configured. Reads
//! always produce a value (falling back to the demo data set); writes either
//! persist or fail loudly.

use async_trait::async_trait;
use thiserror::Error;

use crate::clients::{BackendError, ProgressFn};
use crate::models::{Anime, AnimeDraft, Episode, EpisodeDraft, Profile, ProfileUpdate};

/// Upper bound on the featured rail.
pub const FEATURED_LIMIT: usize = 6;

/// Where a read's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Served by the configured backend.
    Live,
    /// No backend configured; demo data.
    Fallback,
    /// Backend configured but the call failed; demo data, and the caller may
    /// want to tell the user the view is degraded.
    Degraded,
}

/// A read result together with its [`DataOrigin`].
///
/// Rendering proceeds with `value` either way; `origin` is the side channel
/// for the "backend unavailable" signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    pub value: T,
    pub origin: DataOrigin,
}

impl<T> Fetched<T> {
    pub const fn live(value: T) -> Self {
        Self {
            value,
            origin: DataOrigin::Live,
        }
    }

    pub const fn fallback(value: T) -> Self {
        Self {
            value,
            origin: DataOrigin::Fallback,
        }
    }

    pub const fn degraded(value: T) -> Self {
        Self {
            value,
            origin: DataOrigin::Degraded,
        }
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self.origin, DataOrigin::Degraded)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            value: f(self.value),
            origin: self.origin,
        }
    }
}

/// Domain errors for catalog writes.
///
/// Reads never return these; the fallback rule absorbs read failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("backend not configured; writes are unavailable")]
    WriteUnavailable,

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("duplicate: {0}")]
    Duplicate(String),
}

impl CatalogError {
    /// Maps a backend failure on the write path. Conflicts become
    /// [`CatalogError::Duplicate`]; everything else is a plain write failure.
    pub(crate) fn from_write(err: BackendError) -> Self {
        match err {
            BackendError::Conflict(msg) => Self::Duplicate(msg),
            BackendError::NotFound(msg) => Self::NotFound(msg),
            other => Self::WriteFailed(other.to_string()),
        }
    }
}

/// The catalog access layer.
///
/// All operations are async and non-blocking; none panics across this
/// boundary. Write acknowledgment is awaited before returning, so a read
/// issued after a successful write observes it.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Whether a live backend is configured. Presentation only (demo-mode
    /// banner); business logic must not branch on it.
    fn backend_configured(&self) -> bool;

    /// Looks up one catalog entry. `None` means not found in the active
    /// data source.
    async fn get_anime(&self, id: &str) -> Fetched<Option<Anime>>;

    /// All entries, newest first.
    async fn list_anime(&self) -> Fetched<Vec<Anime>>;

    /// Featured entries, at most [`FEATURED_LIMIT`].
    async fn featured_anime(&self) -> Fetched<Vec<Anime>>;

    /// Community entries (non-empty uploader), newest first.
    async fn community_anime(&self) -> Fetched<Vec<Anime>>;

    /// Entries uploaded by one account, newest first.
    async fn user_anime(&self, user_id: &str) -> Fetched<Vec<Anime>>;

    /// Episodes of one entry, ascending episode number.
    async fn list_episodes(&self, anime_id: &str) -> Fetched<Vec<Episode>>;

    /// Entries the account has favorited. Order unspecified.
    async fn list_favorites(&self, user_id: &str) -> Fetched<Vec<Anime>>;

    async fn is_favorite(&self, user_id: &str, anime_id: &str) -> Fetched<bool>;

    async fn get_profile(&self, user_id: &str) -> Fetched<Option<Profile>>;

    /// Adds a favorite link. Idempotent: re-adding reports success.
    async fn add_favorite(&self, user_id: &str, anime_id: &str) -> Result<(), CatalogError>;

    /// Removes a favorite link. Removing an absent link reports success.
    async fn remove_favorite(&self, user_id: &str, anime_id: &str) -> Result<(), CatalogError>;

    /// Creates a catalog entry from a draft. The id is generated here and
    /// the uploader is the authenticated caller, never client input.
    async fn add_anime(&self, user_id: &str, draft: AnimeDraft) -> Result<Anime, CatalogError>;

    /// Creates an episode. Rejects a duplicate `(anime, episode_number)`
    /// pair with [`CatalogError::Duplicate`].
    async fn add_episode(
        &self,
        anime_id: &str,
        draft: EpisodeDraft,
    ) -> Result<Episode, CatalogError>;

    /// Updates non-authentication profile fields.
    async fn update_profile(
        &self,
        user_id: &str,
        patch: ProfileUpdate,
    ) -> Result<Profile, CatalogError>;

    /// Uploads a media object and returns its public URL. `progress` is
    /// invoked with `(bytes_sent, bytes_total)` as the body streams.
    async fn upload_media(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        progress: Option<ProgressFn>,
    ) -> Result<String, CatalogError>;
}
