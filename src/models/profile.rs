use serde::{Deserialize, Serialize};

/// An account profile.
///
/// Accounts are created by the external identity provider; this layer only
/// reads them and updates the non-authentication fields. `favorites` and
/// `uploads` are derived memberships (favorite links, entries whose uploader
/// is this account), folded in here so callers get one record per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub favorites: Vec<String>,
    pub uploads: Vec<String>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.avatar_url.is_none() && self.bio.is_none()
    }
}
