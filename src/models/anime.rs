use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Airing status of a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimeStatus {
    #[default]
    Airing,
    Completed,
    Upcoming,
}

impl std::fmt::Display for AnimeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Airing => "Airing",
            Self::Completed => "Completed",
            Self::Upcoming => "Upcoming",
        };
        f.write_str(s)
    }
}

/// A catalog entry: one anime title.
///
/// This is the single shape the rest of the app sees. Wire rows and demo
/// records are normalized into it at the boundary; field-name drift between
/// data sources never leaks past the clients module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub banner_image: Option<String>,
    pub episode_count: i32,
    pub status: AnimeStatus,
    pub rating: f32,
    pub genres: Vec<String>,
    pub release_year: i32,
    pub video_url: Option<String>,
    /// Uploader account id. `None` means platform-owned content; presence is
    /// the source of truth for "community" entries.
    pub uploaded_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Anime {
    #[must_use]
    pub const fn is_community(&self) -> bool {
        self.uploaded_by.is_some()
    }
}

/// Caller-supplied fields for a new catalog entry.
///
/// Required: `title`, `description`, `cover_image`, `release_year`. The rest
/// default at creation time (status `Airing`, one episode, rating 7.0). The
/// uploader is always taken from the authenticated caller, never from the
/// draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeDraft {
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub banner_image: Option<String>,
    pub episode_count: Option<i32>,
    pub status: Option<AnimeStatus>,
    pub rating: Option<f32>,
    pub genres: Vec<String>,
    pub release_year: i32,
    pub video_url: Option<String>,
}
