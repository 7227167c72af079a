//! The fixed demonstration data set.
//!
//! Served whenever no backend is configured, and whenever a configured
//! backend fails a read. The records here are immutable; writes are never
//! applied to them.

use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Anime, AnimeStatus, Episode, Profile};

const COVER: &str = "/placeholder.svg?height=400&width=300";
const BANNER: &str = "/placeholder.svg?height=600&width=1200";
const AVATAR: &str = "/placeholder.svg?height=100&width=100";

/// Entry ids flagged featured in the demo set.
const FEATURED_IDS: [&str; 3] = ["1", "2", "3"];

fn day(n: u32) -> DateTime<Utc> {
    // Staggered timestamps so newest-first ordering is well defined.
    Utc.with_ymd_and_hms(2024, 1, n, 12, 0, 0).unwrap()
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    title: &str,
    description: &str,
    banner: bool,
    episode_count: i32,
    status: AnimeStatus,
    rating: f32,
    genres: &[&str],
    release_year: i32,
    video_url: Option<&str>,
    uploaded_by: Option<&str>,
    created: u32,
) -> Anime {
    Anime {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        cover_image: COVER.to_string(),
        banner_image: banner.then(|| BANNER.to_string()),
        episode_count,
        status,
        rating,
        genres: genres.iter().map(ToString::to_string).collect(),
        release_year,
        video_url: video_url.map(ToString::to_string),
        uploaded_by: uploaded_by.map(ToString::to_string),
        created_at: day(created),
    }
}

static ANIME: LazyLock<Vec<Anime>> = LazyLock::new(|| {
    vec![
        entry(
            "1",
            "Demon Slayer: Kimetsu no Yaiba",
            "Tanjiro Kamado, a kind-hearted boy who sells charcoal for a living, finds his \
             family slaughtered by a demon. To make matters worse, his younger sister Nezuko, \
             the sole survivor, has been transformed into a demon herself. Though devastated \
             by this grim reality, Tanjiro resolves to become a demon slayer to turn his \
             sister back into a human and avenge his family.",
            true,
            26,
            AnimeStatus::Airing,
            8.9,
            &["Action", "Fantasy", "Historical"],
            2019,
            Some("https://www.youtube.com/watch?v=VQGCKyvzIM4"),
            None,
            1,
        ),
        entry(
            "2",
            "Attack on Titan",
            "Centuries ago, mankind was slaughtered to near extinction by monstrous humanoid \
             creatures called Titans, forcing humans to hide in fear behind enormous \
             concentric walls. What makes these giants truly terrifying is that their taste \
             for human flesh is not born out of hunger but what appears to be out of pleasure.",
            true,
            75,
            AnimeStatus::Completed,
            9.1,
            &["Action", "Drama", "Fantasy"],
            2013,
            Some("https://www.youtube.com/watch?v=MGRm4IzK1SQ"),
            None,
            2,
        ),
        entry(
            "3",
            "My Hero Academia",
            "In a world where people with superpowers (called 'Quirks') are the norm, middle \
             school student Izuku Midoriya has no powers. However, he still dreams of becoming \
             a superhero himself. It seems an impossible dream, until a chance encounter with \
             the greatest hero of them all gives him a chance to change his destiny.",
            true,
            113,
            AnimeStatus::Airing,
            8.4,
            &["Action", "Comedy", "Superhero"],
            2016,
            Some("https://www.youtube.com/watch?v=EPVkcwyLQQ8"),
            None,
            3,
        ),
        entry(
            "4",
            "One Piece",
            "Gol D. Roger was known as the 'Pirate King,' the strongest and most infamous \
             being to have sailed the Grand Line. The capture and execution of Roger by the \
             World Government brought a change throughout the world.",
            false,
            1000,
            AnimeStatus::Airing,
            8.7,
            &["Action", "Adventure", "Comedy"],
            1999,
            None,
            None,
            4,
        ),
        entry(
            "5",
            "Jujutsu Kaisen",
            "Yuji Itadori is a boy with tremendous physical strength, though he lives a \
             completely ordinary high school life. One day, to save a classmate who has been \
             attacked by curses, he eats the finger of Ryomen Sukuna, taking the curse into \
             his own soul.",
            false,
            24,
            AnimeStatus::Airing,
            8.8,
            &["Action", "Supernatural", "Horror"],
            2020,
            None,
            Some("1"),
            5,
        ),
        entry(
            "6",
            "Fullmetal Alchemist: Brotherhood",
            "After a horrific alchemy experiment goes wrong in the Elric household, brothers \
             Edward and Alphonse are left in a catastrophic new reality. Ignoring the \
             alchemical principle banning human transmutation, the boys attempted to bring \
             their recently deceased mother back to life.",
            false,
            64,
            AnimeStatus::Completed,
            9.2,
            &["Action", "Adventure", "Drama"],
            2009,
            None,
            None,
            6,
        ),
        entry(
            "7",
            "Death Note",
            "Light Yagami is a genius high school student who is about to learn about life \
             through a book of death. When a bored shinigami, a God of Death, named Ryuk \
             drops a black notepad called a Death Note, Light receives power over life and \
             death with the stroke of a pen.",
            false,
            37,
            AnimeStatus::Completed,
            9.0,
            &["Mystery", "Psychological", "Supernatural"],
            2006,
            None,
            None,
            7,
        ),
        entry(
            "8",
            "Spy x Family",
            "A spy on an undercover mission gets married and adopts a child as part of his \
             cover. His wife and daughter have secrets of their own, and all three must \
             strive to keep together.",
            false,
            25,
            AnimeStatus::Airing,
            8.6,
            &["Action", "Comedy", "Slice of Life"],
            2022,
            None,
            Some("1"),
            8,
        ),
        entry(
            "9",
            "Chainsaw Man",
            "Denji has a simple dream—to live a happy and peaceful life, spending time with \
             a girl he likes. This is a far cry from reality, however, as Denji is forced by \
             the yakuza into killing devils in order to pay off his crushing debts.",
            false,
            12,
            AnimeStatus::Completed,
            8.7,
            &["Action", "Horror", "Supernatural"],
            2022,
            None,
            None,
            9,
        ),
        entry(
            "10",
            "Violet Evergarden",
            "The Great War finally came to an end after four long years of conflict; \
             fractured in two, the continent of Telesis slowly began to flourish once again. \
             Caught up in the bloodshed was Violet Evergarden, a young girl raised for the \
             sole purpose of decimating enemy lines.",
            false,
            13,
            AnimeStatus::Completed,
            8.9,
            &["Drama", "Fantasy", "Slice of Life"],
            2018,
            None,
            None,
            10,
        ),
        entry(
            "11",
            "Your Name",
            "Mitsuha Miyamizu, a high school girl, yearns to live the life of a boy in the \
             bustling city of Tokyo—a dream that stands in stark contrast to her present \
             life in the countryside. Meanwhile in the city, Taki Tachibana lives a busy \
             life as a high school student while juggling his part-time job and hopes for a \
             future in architecture.",
            false,
            1,
            AnimeStatus::Completed,
            9.0,
            &["Romance", "Supernatural", "Drama"],
            2016,
            None,
            None,
            11,
        ),
        entry(
            "12",
            "Tokyo Ghoul",
            "Tokyo has become a cruel and merciless city—a place where vicious creatures \
             called 'ghouls' exist alongside humans. The citizens of this once great \
             metropolis live in constant fear of these bloodthirsty savages and their \
             thirst for human flesh.",
            false,
            12,
            AnimeStatus::Completed,
            8.0,
            &["Action", "Horror", "Psychological"],
            2014,
            None,
            None,
            12,
        ),
        entry(
            "13",
            "Naruto Shippuden",
            "Naruto Uzumaki returns after two and a half years of training with Jiraiya to \
             face the Akatsuki, a mysterious organization of elite rogue ninja who are \
             hunting down the powerful tailed beasts.",
            false,
            500,
            AnimeStatus::Completed,
            8.6,
            &["Action", "Adventure", "Fantasy"],
            2007,
            None,
            Some("2"),
            13,
        ),
        entry(
            "14",
            "One Punch Man",
            "Saitama has become too powerful, and he can defeat his enemies with a single \
             punch. Now, the greatest challenge for him is to find a worthy opponent who can \
             give him the excitement he once felt.",
            false,
            24,
            AnimeStatus::Airing,
            8.8,
            &["Action", "Comedy", "Superhero"],
            2015,
            None,
            Some("2"),
            14,
        ),
    ]
});

static EPISODES: LazyLock<Vec<Episode>> = LazyLock::new(|| {
    vec![
        Episode {
            id: "1".to_string(),
            anime_id: "1".to_string(),
            episode_number: 1,
            title: "Cruelty".to_string(),
            description: Some(
                "Tanjiro's peaceful life is shattered when his family is slaughtered by demons."
                    .to_string(),
            ),
            video_url: "#".to_string(),
            thumbnail: None,
            created_at: day(1),
        },
        Episode {
            id: "2".to_string(),
            anime_id: "1".to_string(),
            episode_number: 2,
            title: "Trainer Sakonji Urokodaki".to_string(),
            description: Some(
                "Tanjiro begins his training to become a demon slayer.".to_string(),
            ),
            video_url: "#".to_string(),
            thumbnail: None,
            created_at: day(1),
        },
    ]
});

static PROFILES: LazyLock<Vec<Profile>> = LazyLock::new(|| {
    vec![
        Profile {
            id: "1".to_string(),
            username: "Anime Fan".to_string(),
            email: "user@example.com".to_string(),
            avatar_url: Some(AVATAR.to_string()),
            bio: Some(
                "Just a casual anime enthusiast who loves to share great content!".to_string(),
            ),
            favorites: vec!["1", "3", "6", "9"].into_iter().map(String::from).collect(),
            uploads: vec!["5", "8"].into_iter().map(String::from).collect(),
        },
        Profile {
            id: "2".to_string(),
            username: "Otaku Master".to_string(),
            email: "otaku@example.com".to_string(),
            avatar_url: Some(AVATAR.to_string()),
            bio: Some(
                "Dedicated anime curator with a passion for finding hidden gems.".to_string(),
            ),
            favorites: vec!["2", "4", "7"].into_iter().map(String::from).collect(),
            uploads: vec!["13", "14"].into_iter().map(String::from).collect(),
        },
    ]
});

fn newest_first(mut anime: Vec<Anime>) -> Vec<Anime> {
    anime.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    anime
}

pub fn anime_by_id(id: &str) -> Option<Anime> {
    ANIME.iter().find(|a| a.id == id).cloned()
}

pub fn all_anime() -> Vec<Anime> {
    newest_first(ANIME.clone())
}

pub fn featured_anime() -> Vec<Anime> {
    newest_first(
        ANIME
            .iter()
            .filter(|a| FEATURED_IDS.contains(&a.id.as_str()))
            .cloned()
            .collect(),
    )
}

pub fn community_anime() -> Vec<Anime> {
    newest_first(ANIME.iter().filter(|a| a.is_community()).cloned().collect())
}

pub fn anime_by_uploader(user_id: &str) -> Vec<Anime> {
    newest_first(
        ANIME
            .iter()
            .filter(|a| a.uploaded_by.as_deref() == Some(user_id))
            .cloned()
            .collect(),
    )
}

pub fn episodes_for(anime_id: &str) -> Vec<Episode> {
    let mut episodes: Vec<Episode> = EPISODES
        .iter()
        .filter(|e| e.anime_id == anime_id)
        .cloned()
        .collect();
    episodes.sort_by_key(|e| e.episode_number);
    episodes
}

pub fn favorites_for(user_id: &str) -> Vec<Anime> {
    let Some(profile) = profile_by_id(user_id) else {
        return Vec::new();
    };
    ANIME
        .iter()
        .filter(|a| profile.favorites.contains(&a.id))
        .cloned()
        .collect()
}

pub fn is_favorite(user_id: &str, anime_id: &str) -> bool {
    profile_by_id(user_id).is_some_and(|p| p.favorites.iter().any(|id| id == anime_id))
}

pub fn profile_by_id(user_id: &str) -> Option<Profile> {
    PROFILES.iter().find(|p| p.id == user_id).cloned()
}
