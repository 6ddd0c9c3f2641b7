// src/integrations/omdb/mod.rs

pub mod client;

pub use client::{MediaKind, MovieApi, OmdbClient, OmdbConfig};
