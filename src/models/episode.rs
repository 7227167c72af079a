use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single playable unit belonging to an [`Anime`](super::Anime).
///
/// `(anime_id, episode_number)` is unique; the layer rejects duplicates on
/// insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub anime_id: String,
    pub episode_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new episode.
///
/// Required: a positive `episode_number`, `title` and `video_url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDraft {
    pub episode_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail: Option<String>,
}
