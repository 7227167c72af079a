//! Default implementation of the [`CatalogService`] trait.
//!
//! Holds the one backend handle decided at construction time; every
//! operation reads it from the instance instead of re-deriving "is the
//! backend configured" at the call site. The fallback policy lives in a
//! single decorator ([`DefaultCatalogService::read_or_fallback`]) so each
//! read only states which demo-data slice stands in for it.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clients::{Backend, BackendError, ProgressFn, RestBackend};
use crate::config::BackendConfig;
use crate::fallback;
use crate::models::{Anime, AnimeDraft, Episode, EpisodeDraft, Profile, ProfileUpdate};
use crate::services::catalog_service::{
    CatalogError, CatalogService, FEATURED_LIMIT, Fetched,
};

pub struct DefaultCatalogService {
    backend: Option<Arc<dyn Backend>>,
}

impl DefaultCatalogService {
    /// Builds the service from a connection config. `None` (or a config the
    /// HTTP client rejects) means demo mode for the lifetime of the value.
    #[must_use]
    pub fn new(config: Option<&BackendConfig>) -> Self {
        let backend = config.and_then(|c| match RestBackend::new(c) {
            Ok(rest) => Some(Arc::new(rest) as Arc<dyn Backend>),
            Err(err) => {
                warn!(error = %err, "backend config rejected; running in demo mode");
                None
            }
        });
        Self { backend }
    }

    /// Reads the connection config from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_env().as_ref())
    }

    /// Uses an explicit backend implementation.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Demo mode: every read serves the fallback set, every write fails
    /// with [`CatalogError::WriteUnavailable`].
    #[must_use]
    pub const fn offline() -> Self {
        Self { backend: None }
    }

    /// The read-path fallback policy, applied uniformly to every read.
    ///
    /// Unconfigured backend: serve `fallback`. Configured backend whose call
    /// fails: log, serve `fallback`, and mark the result degraded so the
    /// caller can surface it without blocking rendering.
    async fn read_or_fallback<T, Fut>(
        &self,
        op: &'static str,
        fallback: impl FnOnce() -> T + Send,
        live: impl FnOnce(Arc<dyn Backend>) -> Fut + Send,
    ) -> Fetched<T>
    where
        T: Send,
        Fut: Future<Output = Result<T, BackendError>> + Send,
    {
        let Some(backend) = &self.backend else {
            debug!(operation = op, "backend not configured; serving demo data");
            return Fetched::fallback(fallback());
        };
        match live(Arc::clone(backend)).await {
            Ok(value) => Fetched::live(value),
            Err(err) => {
                warn!(operation = op, error = %err, "backend read failed; serving demo data");
                Fetched::degraded(fallback())
            }
        }
    }

    fn write_backend(&self) -> Result<&Arc<dyn Backend>, CatalogError> {
        self.backend.as_ref().ok_or(CatalogError::WriteUnavailable)
    }
}

fn required(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn validate_anime_draft(draft: &AnimeDraft) -> Result<(), CatalogError> {
    required("title", &draft.title)?;
    required("description", &draft.description)?;
    required("cover image", &draft.cover_image)?;
    if !(1900..=2100).contains(&draft.release_year) {
        return Err(CatalogError::Validation(format!(
            "release year {} out of range",
            draft.release_year
        )));
    }
    if let Some(rating) = draft.rating {
        if !(0.0..=10.0).contains(&rating) {
            return Err(CatalogError::Validation(format!(
                "rating {rating} must be between 0.0 and 10.0"
            )));
        }
    }
    if let Some(count) = draft.episode_count {
        if count < 1 {
            return Err(CatalogError::Validation(
                "episode count must be positive".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_episode_draft(draft: &EpisodeDraft) -> Result<(), CatalogError> {
    if draft.episode_number < 1 {
        return Err(CatalogError::Validation(
            "episode number must be positive".to_string(),
        ));
    }
    required("title", &draft.title)?;
    required("video URL", &draft.video_url)?;
    Ok(())
}

fn validate_profile_update(patch: &ProfileUpdate) -> Result<(), CatalogError> {
    if patch.is_empty() {
        return Err(CatalogError::Validation("no fields to update".to_string()));
    }
    if let Some(username) = &patch.username {
        required("username", username)?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl CatalogService for DefaultCatalogService {
    fn backend_configured(&self) -> bool {
        self.backend.is_some()
    }

    async fn get_anime(&self, id: &str) -> Fetched<Option<Anime>> {
        self.read_or_fallback(
            "get_anime",
            || fallback::anime_by_id(id),
            |b| async move { b.fetch_anime(id).await },
        )
        .await
    }

    async fn list_anime(&self) -> Fetched<Vec<Anime>> {
        self.read_or_fallback("list_anime", fallback::all_anime, |b| async move {
            b.list_anime().await
        })
        .await
    }

    async fn featured_anime(&self) -> Fetched<Vec<Anime>> {
        let mut fetched = self
            .read_or_fallback("featured_anime", fallback::featured_anime, |b| async move {
                b.list_featured_anime(FEATURED_LIMIT).await
            })
            .await;
        fetched.value.truncate(FEATURED_LIMIT);
        fetched
    }

    async fn community_anime(&self) -> Fetched<Vec<Anime>> {
        self.read_or_fallback("community_anime", fallback::community_anime, |b| async move {
            b.list_community_anime().await
        })
        .await
    }

    async fn user_anime(&self, user_id: &str) -> Fetched<Vec<Anime>> {
        self.read_or_fallback(
            "user_anime",
            || fallback::anime_by_uploader(user_id),
            |b| async move { b.list_anime_by_uploader(user_id).await },
        )
        .await
    }

    async fn list_episodes(&self, anime_id: &str) -> Fetched<Vec<Episode>> {
        self.read_or_fallback(
            "list_episodes",
            || fallback::episodes_for(anime_id),
            |b| async move { b.list_episodes(anime_id).await },
        )
        .await
    }

    async fn list_favorites(&self, user_id: &str) -> Fetched<Vec<Anime>> {
        self.read_or_fallback(
            "list_favorites",
            || fallback::favorites_for(user_id),
            |b| async move { b.list_favorites(user_id).await },
        )
        .await
    }

    async fn is_favorite(&self, user_id: &str, anime_id: &str) -> Fetched<bool> {
        self.read_or_fallback(
            "is_favorite",
            || fallback::is_favorite(user_id, anime_id),
            |b| async move { b.favorite_exists(user_id, anime_id).await },
        )
        .await
    }

    async fn get_profile(&self, user_id: &str) -> Fetched<Option<Profile>> {
        self.read_or_fallback(
            "get_profile",
            || fallback::profile_by_id(user_id),
            |b| async move { b.fetch_profile(user_id).await },
        )
        .await
    }

    async fn add_favorite(&self, user_id: &str, anime_id: &str) -> Result<(), CatalogError> {
        let backend = self.write_backend()?;
        match backend.upsert_favorite(user_id, anime_id).await {
            Ok(()) => {}
            // The link already existing is what the caller asked for;
            // idempotence must not depend on how the backend resolves it.
            Err(BackendError::Conflict(_)) => {
                debug!(user_id, anime_id, "favorite already present");
                return Ok(());
            }
            Err(err) => return Err(CatalogError::from_write(err)),
        }
        debug!(user_id, anime_id, "favorite added");
        Ok(())
    }

    async fn remove_favorite(&self, user_id: &str, anime_id: &str) -> Result<(), CatalogError> {
        let backend = self.write_backend()?;
        backend
            .delete_favorite(user_id, anime_id)
            .await
            .map_err(CatalogError::from_write)?;
        debug!(user_id, anime_id, "favorite removed");
        Ok(())
    }

    async fn add_anime(&self, user_id: &str, draft: AnimeDraft) -> Result<Anime, CatalogError> {
        validate_anime_draft(&draft)?;
        let backend = self.write_backend()?;

        let anime = Anime {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            cover_image: draft.cover_image,
            banner_image: draft.banner_image,
            episode_count: draft.episode_count.unwrap_or(1),
            status: draft.status.unwrap_or_default(),
            rating: draft.rating.unwrap_or(7.0),
            genres: draft.genres,
            release_year: draft.release_year,
            video_url: draft.video_url,
            uploaded_by: Some(user_id.to_string()),
            created_at: Utc::now(),
        };

        let created = backend
            .insert_anime(&anime)
            .await
            .map_err(CatalogError::from_write)?;
        info!(anime_id = %created.id, uploader = user_id, title = %created.title, "catalog entry created");
        Ok(created)
    }

    async fn add_episode(
        &self,
        anime_id: &str,
        draft: EpisodeDraft,
    ) -> Result<Episode, CatalogError> {
        validate_episode_draft(&draft)?;
        let backend = self.write_backend()?;

        backend
            .fetch_anime(anime_id)
            .await
            .map_err(CatalogError::from_write)?
            .ok_or_else(|| CatalogError::NotFound(format!("anime {anime_id}")))?;

        if backend
            .episode_exists(anime_id, draft.episode_number)
            .await
            .map_err(CatalogError::from_write)?
        {
            return Err(CatalogError::Duplicate(format!(
                "episode {} already exists for anime {anime_id}",
                draft.episode_number
            )));
        }

        let episode = Episode {
            id: Uuid::new_v4().to_string(),
            anime_id: anime_id.to_string(),
            episode_number: draft.episode_number,
            title: draft.title,
            description: draft.description,
            video_url: draft.video_url,
            thumbnail: draft.thumbnail,
            created_at: Utc::now(),
        };

        let created = backend
            .insert_episode(&episode)
            .await
            .map_err(CatalogError::from_write)?;
        info!(anime_id, number = created.episode_number, "episode created");
        Ok(created)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: ProfileUpdate,
    ) -> Result<Profile, CatalogError> {
        validate_profile_update(&patch)?;
        let backend = self.write_backend()?;
        let profile = backend
            .update_profile(user_id, &patch)
            .await
            .map_err(CatalogError::from_write)?;
        info!(user_id, "profile updated");
        Ok(profile)
    }

    async fn upload_media(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        progress: Option<ProgressFn>,
    ) -> Result<String, CatalogError> {
        required("bucket", bucket)?;
        required("path", path)?;
        let backend = self.write_backend()?;
        let url = backend
            .upload_object(bucket, path, bytes, content_type, progress)
            .await
            .map_err(CatalogError::from_write)?;
        info!(bucket, path, "media uploaded");
        Ok(url)
    }
}
