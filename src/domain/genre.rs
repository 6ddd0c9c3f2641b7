// src/domain/genre.rs
use serde::{Deserialize, Serialize};

/// Movie genres as the upstream catalog reports them, plus the two
/// pseudo-rows the carousel renders alongside real genres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    // Core / very frequent
    Action,
    Adventure,
    Animation,
    Biography,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Family,
    Fantasy,
    History,
    Horror,
    Music,
    Musical,
    Mystery,
    Romance,
    SciFi,
    Sport,
    Thriller,
    War,
    Western,

    // Fairly common sub/additional ones
    FilmNoir,
    Short,
    News,
    RealityTv,
    TalkShow,
    GameShow,

    // Less frequent but still appear
    Adult,
    Superhero,

    // Carousel pseudo-rows, not real catalog genres
    RecentlyAdded,
    AiSuggestions,
}

impl Genre {
    /// Display name, matching the upstream catalog's spelling
    pub fn display_name(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Animation => "Animation",
            Genre::Biography => "Biography",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Family => "Family",
            Genre::Fantasy => "Fantasy",
            Genre::History => "History",
            Genre::Horror => "Horror",
            Genre::Music => "Music",
            Genre::Musical => "Musical",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Sport => "Sport",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
            Genre::Western => "Western",
            Genre::FilmNoir => "Film-Noir",
            Genre::Short => "Short",
            Genre::News => "News",
            Genre::RealityTv => "Reality-TV",
            Genre::TalkShow => "Talk-Show",
            Genre::GameShow => "Game-Show",
            Genre::Adult => "Adult",
            Genre::Superhero => "Superhero",
            Genre::RecentlyAdded => "Recently Added",
            Genre::AiSuggestions => "AI Suggestions",
        }
    }

    /// Try to match a genre string from the upstream catalog
    /// (case-insensitive, tolerant of space/underscore separators and the
    /// long form "Science-Fiction"). Returns None if no match.
    pub fn from_name(value: &str) -> Option<Genre> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        let normalized = trimmed
            .replace([' ', '_'], "-")
            .to_ascii_lowercase()
            .replace("science-fiction", "sci-fi");

        Self::all().iter().copied().find(|genre| {
            genre.display_name().replace(' ', "-").to_ascii_lowercase() == normalized
        })
    }

    /// Parse a comma-separated genre field ("Action, Sci-Fi") into a list.
    /// Unknown values are ignored.
    pub fn parse_list(field: Option<&str>) -> Vec<Genre> {
        match field {
            Some(field) => field.split(',').filter_map(Genre::from_name).collect(),
            None => Vec::new(),
        }
    }

    fn all() -> &'static [Genre] {
        &[
            Genre::Action,
            Genre::Adventure,
            Genre::Animation,
            Genre::Biography,
            Genre::Comedy,
            Genre::Crime,
            Genre::Documentary,
            Genre::Drama,
            Genre::Family,
            Genre::Fantasy,
            Genre::History,
            Genre::Horror,
            Genre::Music,
            Genre::Musical,
            Genre::Mystery,
            Genre::Romance,
            Genre::SciFi,
            Genre::Sport,
            Genre::Thriller,
            Genre::War,
            Genre::Western,
            Genre::FilmNoir,
            Genre::Short,
            Genre::News,
            Genre::RealityTv,
            Genre::TalkShow,
            Genre::GameShow,
            Genre::Adult,
            Genre::Superhero,
            Genre::RecentlyAdded,
            Genre::AiSuggestions,
        ]
    }
}
