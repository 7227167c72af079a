//! The backend collaborator contract.
//!
//! Row-oriented operations over the `anime`, `anime_episodes`, `favorites`
//! and `profiles` collections, plus the binary object store. The catalog
//! service only talks to this trait; [`RestBackend`](super::RestBackend) is
//! the production implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Anime, Episode, Profile, ProfileUpdate};

/// Upload progress callback, invoked with `(bytes_sent, bytes_total)`.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send + Sync>;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Persistence operations the catalog layer delegates to.
///
/// Writes must only resolve once the backend has acknowledged them; a read
/// issued after a returned write observes the written row. Implementations
/// are expected to bound every call with a timeout.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_anime(&self, id: &str) -> Result<Option<Anime>, BackendError>;

    /// All entries, newest first.
    async fn list_anime(&self) -> Result<Vec<Anime>, BackendError>;

    /// Entries flagged featured, newest first, at most `limit`.
    async fn list_featured_anime(&self, limit: usize) -> Result<Vec<Anime>, BackendError>;

    /// Entries with a non-null uploader, newest first.
    async fn list_community_anime(&self) -> Result<Vec<Anime>, BackendError>;

    async fn list_anime_by_uploader(&self, user_id: &str) -> Result<Vec<Anime>, BackendError>;

    async fn insert_anime(&self, anime: &Anime) -> Result<Anime, BackendError>;

    /// Episodes of one entry, ascending episode number.
    async fn list_episodes(&self, anime_id: &str) -> Result<Vec<Episode>, BackendError>;

    async fn episode_exists(&self, anime_id: &str, number: i32) -> Result<bool, BackendError>;

    async fn insert_episode(&self, episode: &Episode) -> Result<Episode, BackendError>;

    /// Entries the user has favorited, via the favorites link collection.
    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Anime>, BackendError>;

    async fn favorite_exists(&self, user_id: &str, anime_id: &str) -> Result<bool, BackendError>;

    /// Creates the favorite link; already-present links are not an error.
    async fn upsert_favorite(&self, user_id: &str, anime_id: &str) -> Result<(), BackendError>;

    /// Removes the favorite link; absent links are not an error.
    async fn delete_favorite(&self, user_id: &str, anime_id: &str) -> Result<(), BackendError>;

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, BackendError>;

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfileUpdate,
    ) -> Result<Profile, BackendError>;

    /// Stores a binary object and returns its public URL.
    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        progress: Option<ProgressFn>,
    ) -> Result<String, BackendError>;
}
