// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

pub mod genre;
pub mod movie;
pub mod search;
pub mod sort;

pub use genre::Genre;
pub use movie::{InteractionRecord, MovieDetail, MovieSummary, Rating, FIELD_PLACEHOLDER};
pub use search::{PageKey, SearchOutcome, SearchPage};
pub use sort::{sort_display_name, sort_movies, SortOption, SortOrder};
