//! HTTP implementation of [`Backend`] against a row-oriented REST API
//! (PostgREST-style query predicates plus a binary object store).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::clients::backend::{Backend, BackendError, ProgressFn};
use crate::config::BackendConfig;
use crate::models::{Anime, AnimeStatus, Episode, Profile, ProfileUpdate};

/// Every backend call is bounded; a hung backend degrades reads instead of
/// blocking the UI.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const UPLOAD_CHUNK: usize = 64 * 1024;

#[derive(Clone)]
pub struct RestBackend {
    http: Client,
    base: Url,
    key: String,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base = Url::parse(&format!("{}/", config.url.trim_end_matches('/')))?;
        let http = Client::builder()
            .user_agent(concat!("anistream/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base,
            key: config.key.clone(),
        })
    }

    fn table(&self, name: &str) -> Result<Url, BackendError> {
        Ok(self.base.join(&format!("rest/v1/{name}"))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = extract_message(&response.text().await.unwrap_or_default());
        if status == StatusCode::CONFLICT {
            return Err(BackendError::Conflict(message));
        }
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_rows<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Vec<T>, BackendError> {
        let response = self.request(Method::GET, url).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn anime_query(&self, pairs: &[(&str, &str)]) -> Result<Vec<Anime>, BackendError> {
        let mut url = self.table("anime")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        let rows: Vec<AnimeRow> = self.get_rows(url).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn favorite_ids(&self, user_id: &str) -> Result<Vec<String>, BackendError> {
        let mut url = self.table("favorites")?;
        url.query_pairs_mut()
            .append_pair("select", "anime_id")
            .append_pair("user_id", &format!("eq.{user_id}"));
        let rows: Vec<AnimeIdRow> = self.get_rows(url).await?;
        Ok(rows.into_iter().map(|r| r.anime_id).collect())
    }

    async fn upload_ids(&self, user_id: &str) -> Result<Vec<String>, BackendError> {
        let mut url = self.table("anime")?;
        url.query_pairs_mut()
            .append_pair("select", "id")
            .append_pair("uploaded_by", &format!("eq.{user_id}"));
        let rows: Vec<IdRow> = self.get_rows(url).await?;
        Ok(rows.into_iter().map(|r| r.id).collect())
    }

    async fn assemble_profile(&self, row: ProfileRow) -> Result<Profile, BackendError> {
        let favorites = self.favorite_ids(&row.id).await?;
        let uploads = self.upload_ids(&row.id).await?;
        Ok(row.into_profile(favorites, uploads))
    }

    fn favorites_upsert_url(&self) -> Result<Url, BackendError> {
        let mut url = self.table("favorites")?;
        url.query_pairs_mut()
            .append_pair("on_conflict", "user_id,anime_id");
        Ok(url)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}storage/v1/object/public/{bucket}/{path}", self.base)
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn fetch_anime(&self, id: &str) -> Result<Option<Anime>, BackendError> {
        debug!(anime_id = id, "fetching anime");
        let found = self
            .anime_query(&[("id", &format!("eq.{id}")), ("limit", "1")])
            .await?;
        Ok(found.into_iter().next())
    }

    async fn list_anime(&self) -> Result<Vec<Anime>, BackendError> {
        self.anime_query(&[("order", "created_at.desc")]).await
    }

    async fn list_featured_anime(&self, limit: usize) -> Result<Vec<Anime>, BackendError> {
        self.anime_query(&[
            ("is_featured", "eq.true"),
            ("order", "created_at.desc"),
            ("limit", &limit.to_string()),
        ])
        .await
    }

    async fn list_community_anime(&self) -> Result<Vec<Anime>, BackendError> {
        // Uploader presence is authoritative for "community"; the stored
        // is_community flag is only a denormalization.
        self.anime_query(&[("uploaded_by", "not.is.null"), ("order", "created_at.desc")])
            .await
    }

    async fn list_anime_by_uploader(&self, user_id: &str) -> Result<Vec<Anime>, BackendError> {
        self.anime_query(&[
            ("uploaded_by", &format!("eq.{user_id}")),
            ("order", "created_at.desc"),
        ])
        .await
    }

    async fn insert_anime(&self, anime: &Anime) -> Result<Anime, BackendError> {
        debug!(anime_id = %anime.id, "inserting anime");
        let response = self
            .request(Method::POST, self.table("anime")?)
            .header("Prefer", "return=representation")
            .json(&[AnimeInsert::from(anime)])
            .send()
            .await?;
        let rows: Vec<AnimeRow> = Self::check(response).await?.json().await?;
        rows.into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| BackendError::Api {
                status: 200,
                message: "insert returned no representation".to_string(),
            })
    }

    async fn list_episodes(&self, anime_id: &str) -> Result<Vec<Episode>, BackendError> {
        let mut url = self.table("anime_episodes")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("anime_id", &format!("eq.{anime_id}"))
            .append_pair("order", "episode_number.asc");
        let rows: Vec<EpisodeRow> = self.get_rows(url).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn episode_exists(&self, anime_id: &str, number: i32) -> Result<bool, BackendError> {
        let mut url = self.table("anime_episodes")?;
        url.query_pairs_mut()
            .append_pair("select", "id")
            .append_pair("anime_id", &format!("eq.{anime_id}"))
            .append_pair("episode_number", &format!("eq.{number}"))
            .append_pair("limit", "1");
        let rows: Vec<IdRow> = self.get_rows(url).await?;
        Ok(!rows.is_empty())
    }

    async fn insert_episode(&self, episode: &Episode) -> Result<Episode, BackendError> {
        debug!(anime_id = %episode.anime_id, number = episode.episode_number, "inserting episode");
        let response = self
            .request(Method::POST, self.table("anime_episodes")?)
            .header("Prefer", "return=representation")
            .json(&[EpisodeInsert::from(episode)])
            .send()
            .await?;
        let rows: Vec<EpisodeRow> = Self::check(response).await?.json().await?;
        rows.into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| BackendError::Api {
                status: 200,
                message: "insert returned no representation".to_string(),
            })
    }

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Anime>, BackendError> {
        let mut url = self.table("favorites")?;
        url.query_pairs_mut()
            .append_pair("select", "anime(*)")
            .append_pair("user_id", &format!("eq.{user_id}"));
        let rows: Vec<FavoriteJoinRow> = self.get_rows(url).await?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.anime.map(Into::into))
            .collect())
    }

    async fn favorite_exists(&self, user_id: &str, anime_id: &str) -> Result<bool, BackendError> {
        let mut url = self.table("favorites")?;
        url.query_pairs_mut()
            .append_pair("select", "id")
            .append_pair("user_id", &format!("eq.{user_id}"))
            .append_pair("anime_id", &format!("eq.{anime_id}"))
            .append_pair("limit", "1");
        let rows: Vec<IdRow> = self.get_rows(url).await?;
        Ok(!rows.is_empty())
    }

    async fn upsert_favorite(&self, user_id: &str, anime_id: &str) -> Result<(), BackendError> {
        // merge-duplicates resolves on the primary key unless on_conflict
        // names the link columns; without it a re-add hits the unique
        // constraint and comes back 409.
        let response = self
            .request(Method::POST, self.favorites_upsert_url()?)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[FavoriteInsert { user_id, anime_id }])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_favorite(&self, user_id: &str, anime_id: &str) -> Result<(), BackendError> {
        let mut url = self.table("favorites")?;
        url.query_pairs_mut()
            .append_pair("user_id", &format!("eq.{user_id}"))
            .append_pair("anime_id", &format!("eq.{anime_id}"));
        let response = self.request(Method::DELETE, url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, BackendError> {
        let mut url = self.table("profiles")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("limit", "1");
        let rows: Vec<ProfileRow> = self.get_rows(url).await?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(self.assemble_profile(row).await?)),
            None => Ok(None),
        }
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfileUpdate,
    ) -> Result<Profile, BackendError> {
        let mut url = self.table("profiles")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{user_id}"));
        let response = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        let rows: Vec<ProfileRow> = Self::check(response).await?.json().await?;
        let Some(row) = rows.into_iter().next() else {
            return Err(BackendError::NotFound(format!("profile {user_id}")));
        };
        self.assemble_profile(row).await
    }

    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        progress: Option<ProgressFn>,
    ) -> Result<String, BackendError> {
        let url = self.base.join(&format!("storage/v1/object/{bucket}/{path}"))?;
        let total = bytes.len() as u64;
        debug!(bucket, path, total, "uploading object");

        let body = if let Some(progress) = progress {
            progress(0, total);
            let chunks: Vec<Vec<u8>> = bytes.chunks(UPLOAD_CHUNK).map(<[u8]>::to_vec).collect();
            let mut sent: u64 = 0;
            let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
                sent += chunk.len() as u64;
                progress(sent, total);
                Ok::<Vec<u8>, std::io::Error>(chunk)
            }));
            reqwest::Body::wrap_stream(stream)
        } else {
            reqwest::Body::from(bytes)
        };

        let response = self
            .request(Method::POST, url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(self.public_url(bucket, path))
    }
}

fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no error detail".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        })
}

// Wire rows. Column names follow the backend schema; everything is
// normalized into the domain types here and nowhere else.

#[derive(Debug, Deserialize)]
struct AnimeRow {
    id: String,
    title: String,
    description: String,
    cover_image: String,
    #[serde(default)]
    banner_image: Option<String>,
    #[serde(default)]
    episodes_count: i32,
    #[serde(default)]
    status: AnimeStatus,
    #[serde(default)]
    rating: f32,
    #[serde(default)]
    genres: Vec<String>,
    release_year: i32,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    uploaded_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AnimeRow> for Anime {
    fn from(row: AnimeRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            cover_image: row.cover_image,
            banner_image: row.banner_image,
            episode_count: row.episodes_count,
            status: row.status,
            rating: row.rating,
            genres: row.genres,
            release_year: row.release_year,
            video_url: row.video_url,
            uploaded_by: row.uploaded_by,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct AnimeInsert<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    cover_image: &'a str,
    banner_image: Option<&'a str>,
    episodes_count: i32,
    status: AnimeStatus,
    rating: f32,
    genres: &'a [String],
    release_year: i32,
    video_url: Option<&'a str>,
    uploaded_by: Option<&'a str>,
    is_featured: bool,
    is_community: bool,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a Anime> for AnimeInsert<'a> {
    fn from(anime: &'a Anime) -> Self {
        Self {
            id: &anime.id,
            title: &anime.title,
            description: &anime.description,
            cover_image: &anime.cover_image,
            banner_image: anime.banner_image.as_deref(),
            episodes_count: anime.episode_count,
            status: anime.status,
            rating: anime.rating,
            genres: &anime.genres,
            release_year: anime.release_year,
            video_url: anime.video_url.as_deref(),
            uploaded_by: anime.uploaded_by.as_deref(),
            is_featured: false,
            is_community: anime.uploaded_by.is_some(),
            created_at: anime.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EpisodeRow {
    id: String,
    anime_id: String,
    episode_number: i32,
    title: String,
    #[serde(default)]
    description: Option<String>,
    video_url: String,
    #[serde(default)]
    thumbnail: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<EpisodeRow> for Episode {
    fn from(row: EpisodeRow) -> Self {
        Self {
            id: row.id,
            anime_id: row.anime_id,
            episode_number: row.episode_number,
            title: row.title,
            description: row.description,
            video_url: row.video_url,
            thumbnail: row.thumbnail,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct EpisodeInsert<'a> {
    id: &'a str,
    anime_id: &'a str,
    episode_number: i32,
    title: &'a str,
    description: Option<&'a str>,
    video_url: &'a str,
    thumbnail: Option<&'a str>,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a Episode> for EpisodeInsert<'a> {
    fn from(episode: &'a Episode) -> Self {
        Self {
            id: &episode.id,
            anime_id: &episode.anime_id,
            episode_number: episode.episode_number,
            title: &episode.title,
            description: episode.description.as_deref(),
            video_url: &episode.video_url,
            thumbnail: episode.thumbnail.as_deref(),
            created_at: episode.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct FavoriteInsert<'a> {
    user_id: &'a str,
    anime_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct FavoriteJoinRow {
    anime: Option<AnimeRow>,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    username: String,
    email: String,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    bio: Option<String>,
}

impl ProfileRow {
    fn into_profile(self, favorites: Vec<String>, uploads: Vec<String>) -> Profile {
        Profile {
            id: self.id,
            username: self.username,
            email: self.email,
            avatar_url: self.avatar_url,
            bio: self.bio,
            favorites,
            uploads,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AnimeIdRow {
    anime_id: String,
}
