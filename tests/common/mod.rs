//! Shared test backends: an in-memory store standing in for a reachable
//! backend, and one that fails every call.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use anistream::{
    Anime, AnimeStatus, Backend, BackendError, Episode, Profile, ProfileUpdate, ProgressFn,
};

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn sample_anime(id: &str, uploaded_by: Option<&str>, day: u32) -> Anime {
    Anime {
        id: id.to_string(),
        title: format!("Sample {id}"),
        description: "A sample entry".to_string(),
        cover_image: "https://img.example.com/cover.jpg".to_string(),
        banner_image: None,
        episode_count: 12,
        status: AnimeStatus::Airing,
        rating: 8.0,
        genres: vec!["Action".to_string()],
        release_year: 2023,
        video_url: None,
        uploaded_by: uploaded_by.map(ToString::to_string),
        created_at: chrono::TimeZone::with_ymd_and_hms(&Utc, 2024, 6, day, 0, 0, 0).unwrap(),
    }
}

#[derive(Default)]
struct State {
    anime: Vec<Anime>,
    episodes: Vec<Episode>,
    favorites: HashSet<(String, String)>,
    profiles: Vec<Profile>,
}

/// In-memory [`Backend`] with a call counter, used as the "configured and
/// reachable" case.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    calls: AtomicUsize,
    strict_favorite_inserts: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_anime(&self, anime: Anime) {
        self.state.lock().unwrap().anime.push(anime);
    }

    pub fn seed_profile(&self, profile: Profile) {
        self.state.lock().unwrap().profiles.push(profile);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes favorite inserts behave like a store whose upsert resolves on
    /// a surrogate primary key: re-inserting an existing link conflicts.
    pub fn conflict_on_duplicate_favorite(&self) {
        self.strict_favorite_inserts.store(true, Ordering::SeqCst);
    }

    pub fn anime_count(&self) -> usize {
        self.state.lock().unwrap().anime.len()
    }

    pub fn favorite_link_count(&self, user_id: &str, anime_id: &str) -> usize {
        usize::from(
            self.state
                .lock()
                .unwrap()
                .favorites
                .contains(&(user_id.to_string(), anime_id.to_string())),
        )
    }

    pub fn episode_count_for(&self, anime_id: &str, number: i32) -> usize {
        self.state
            .lock()
            .unwrap()
            .episodes
            .iter()
            .filter(|e| e.anime_id == anime_id && e.episode_number == number)
            .count()
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn assemble_profile(state: &State, profile: &Profile) -> Profile {
        let mut assembled = profile.clone();
        assembled.favorites = state
            .favorites
            .iter()
            .filter(|(u, _)| u == &profile.id)
            .map(|(_, a)| a.clone())
            .collect();
        assembled.uploads = state
            .anime
            .iter()
            .filter(|a| a.uploaded_by.as_deref() == Some(&profile.id))
            .map(|a| a.id.clone())
            .collect();
        assembled
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn fetch_anime(&self, id: &str) -> Result<Option<Anime>, BackendError> {
        self.tick();
        let state = self.state.lock().unwrap();
        Ok(state.anime.iter().find(|a| a.id == id).cloned())
    }

    async fn list_anime(&self) -> Result<Vec<Anime>, BackendError> {
        self.tick();
        let state = self.state.lock().unwrap();
        let mut anime = state.anime.clone();
        anime.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(anime)
    }

    async fn list_featured_anime(&self, limit: usize) -> Result<Vec<Anime>, BackendError> {
        self.tick();
        // The in-memory store has no featured flag; newest entries stand in.
        let mut anime = self.list_anime().await?;
        anime.truncate(limit);
        Ok(anime)
    }

    async fn list_community_anime(&self) -> Result<Vec<Anime>, BackendError> {
        self.tick();
        let mut anime = self.list_anime().await?;
        anime.retain(Anime::is_community);
        Ok(anime)
    }

    async fn list_anime_by_uploader(&self, user_id: &str) -> Result<Vec<Anime>, BackendError> {
        self.tick();
        let mut anime = self.list_anime().await?;
        anime.retain(|a| a.uploaded_by.as_deref() == Some(user_id));
        Ok(anime)
    }

    async fn insert_anime(&self, anime: &Anime) -> Result<Anime, BackendError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        if state.anime.iter().any(|a| a.id == anime.id) {
            return Err(BackendError::Conflict(format!("anime {}", anime.id)));
        }
        state.anime.push(anime.clone());
        Ok(anime.clone())
    }

    async fn list_episodes(&self, anime_id: &str) -> Result<Vec<Episode>, BackendError> {
        self.tick();
        let state = self.state.lock().unwrap();
        let mut episodes: Vec<Episode> = state
            .episodes
            .iter()
            .filter(|e| e.anime_id == anime_id)
            .cloned()
            .collect();
        episodes.sort_by_key(|e| e.episode_number);
        Ok(episodes)
    }

    async fn episode_exists(&self, anime_id: &str, number: i32) -> Result<bool, BackendError> {
        self.tick();
        let state = self.state.lock().unwrap();
        Ok(state
            .episodes
            .iter()
            .any(|e| e.anime_id == anime_id && e.episode_number == number))
    }

    async fn insert_episode(&self, episode: &Episode) -> Result<Episode, BackendError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        if state
            .episodes
            .iter()
            .any(|e| e.anime_id == episode.anime_id && e.episode_number == episode.episode_number)
        {
            return Err(BackendError::Conflict(format!(
                "episode {} of anime {}",
                episode.episode_number, episode.anime_id
            )));
        }
        state.episodes.push(episode.clone());
        Ok(episode.clone())
    }

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Anime>, BackendError> {
        self.tick();
        let state = self.state.lock().unwrap();
        Ok(state
            .anime
            .iter()
            .filter(|a| {
                state
                    .favorites
                    .contains(&(user_id.to_string(), a.id.clone()))
            })
            .cloned()
            .collect())
    }

    async fn favorite_exists(&self, user_id: &str, anime_id: &str) -> Result<bool, BackendError> {
        self.tick();
        let state = self.state.lock().unwrap();
        Ok(state
            .favorites
            .contains(&(user_id.to_string(), anime_id.to_string())))
    }

    async fn upsert_favorite(&self, user_id: &str, anime_id: &str) -> Result<(), BackendError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        let link = (user_id.to_string(), anime_id.to_string());
        if self.strict_favorite_inserts.load(Ordering::SeqCst) && state.favorites.contains(&link) {
            return Err(BackendError::Conflict(
                "duplicate key value violates unique constraint \"favorites_user_id_anime_id_key\""
                    .to_string(),
            ));
        }
        state.favorites.insert(link);
        Ok(())
    }

    async fn delete_favorite(&self, user_id: &str, anime_id: &str) -> Result<(), BackendError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        state
            .favorites
            .remove(&(user_id.to_string(), anime_id.to_string()));
        Ok(())
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, BackendError> {
        self.tick();
        let state = self.state.lock().unwrap();
        Ok(state
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .map(|p| Self::assemble_profile(&state, p)))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfileUpdate,
    ) -> Result<Profile, BackendError> {
        self.tick();
        let mut state = self.state.lock().unwrap();
        let index = state
            .profiles
            .iter()
            .position(|p| p.id == user_id)
            .ok_or_else(|| BackendError::NotFound(format!("profile {user_id}")))?;
        if let Some(username) = &patch.username {
            state.profiles[index].username = username.clone();
        }
        if let Some(avatar_url) = &patch.avatar_url {
            state.profiles[index].avatar_url = Some(avatar_url.clone());
        }
        if let Some(bio) = &patch.bio {
            state.profiles[index].bio = Some(bio.clone());
        }
        let profile = state.profiles[index].clone();
        Ok(Self::assemble_profile(&state, &profile))
    }

    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
        progress: Option<ProgressFn>,
    ) -> Result<String, BackendError> {
        self.tick();
        let total = bytes.len() as u64;
        if let Some(progress) = progress {
            progress(0, total);
            progress(total, total);
        }
        Ok(format!("memory://{bucket}/{path}"))
    }
}

/// A configured-but-unreachable backend: every call fails.
pub struct FailingBackend;

fn unavailable() -> BackendError {
    BackendError::Api {
        status: 503,
        message: "backend offline".to_string(),
    }
}

#[async_trait]
impl Backend for FailingBackend {
    async fn fetch_anime(&self, _id: &str) -> Result<Option<Anime>, BackendError> {
        Err(unavailable())
    }

    async fn list_anime(&self) -> Result<Vec<Anime>, BackendError> {
        Err(unavailable())
    }

    async fn list_featured_anime(&self, _limit: usize) -> Result<Vec<Anime>, BackendError> {
        Err(unavailable())
    }

    async fn list_community_anime(&self) -> Result<Vec<Anime>, BackendError> {
        Err(unavailable())
    }

    async fn list_anime_by_uploader(&self, _user_id: &str) -> Result<Vec<Anime>, BackendError> {
        Err(unavailable())
    }

    async fn insert_anime(&self, _anime: &Anime) -> Result<Anime, BackendError> {
        Err(unavailable())
    }

    async fn list_episodes(&self, _anime_id: &str) -> Result<Vec<Episode>, BackendError> {
        Err(unavailable())
    }

    async fn episode_exists(&self, _anime_id: &str, _number: i32) -> Result<bool, BackendError> {
        Err(unavailable())
    }

    async fn insert_episode(&self, _episode: &Episode) -> Result<Episode, BackendError> {
        Err(unavailable())
    }

    async fn list_favorites(&self, _user_id: &str) -> Result<Vec<Anime>, BackendError> {
        Err(unavailable())
    }

    async fn favorite_exists(&self, _user_id: &str, _anime_id: &str) -> Result<bool, BackendError> {
        Err(unavailable())
    }

    async fn upsert_favorite(&self, _user_id: &str, _anime_id: &str) -> Result<(), BackendError> {
        Err(unavailable())
    }

    async fn delete_favorite(&self, _user_id: &str, _anime_id: &str) -> Result<(), BackendError> {
        Err(unavailable())
    }

    async fn fetch_profile(&self, _user_id: &str) -> Result<Option<Profile>, BackendError> {
        Err(unavailable())
    }

    async fn update_profile(
        &self,
        _user_id: &str,
        _patch: &ProfileUpdate,
    ) -> Result<Profile, BackendError> {
        Err(unavailable())
    }

    async fn upload_object(
        &self,
        _bucket: &str,
        _path: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
        _progress: Option<ProgressFn>,
    ) -> Result<String, BackendError> {
        Err(unavailable())
    }
}
