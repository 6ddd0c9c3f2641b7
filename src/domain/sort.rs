// src/domain/sort.rs
use crate::domain::movie::MovieSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    None,
    Title,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sort a result list for display. Years that fail to parse ("2012–2014")
/// sort as 0.
pub fn sort_movies(mut movies: Vec<MovieSummary>, by: SortOption, order: SortOrder) -> Vec<MovieSummary> {
    match by {
        SortOption::None => {}
        SortOption::Title => movies.sort_by(|a, b| a.title.cmp(&b.title)),
        SortOption::Year => {
            movies.sort_by_key(|m| m.year.parse::<i32>().unwrap_or(0));
        }
    }

    if order == SortOrder::Desc && by != SortOption::None {
        movies.reverse();
    }

    movies
}

/// Human-readable label for the active sort, shown in the filter chip
pub fn sort_display_name(by: SortOption, order: SortOrder) -> &'static str {
    match (by, order) {
        (SortOption::None, _) => "None",
        (SortOption::Title, SortOrder::Asc) => "Title (A-Z)",
        (SortOption::Title, SortOrder::Desc) => "Title (Z-A)",
        (SortOption::Year, SortOrder::Asc) => "Year (Old)",
        (SortOption::Year, SortOrder::Desc) => "Year (New)",
    }
}
