pub mod anime;
pub mod episode;
pub mod profile;

pub use anime::{Anime, AnimeDraft, AnimeStatus};
pub use episode::{Episode, EpisodeDraft};
pub use profile::{Profile, ProfileUpdate};
