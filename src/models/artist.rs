use serde::{Deserialize, Serialize};

use super::Painting;

pub type ArtistId = i64;

/// Represents an artist in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    /// Free-form biography text
    pub bio: String,
    /// Reference to the portrait stored by the media collaborator
    pub image: String,
}

/// An artist together with their catalog paintings, newest year first
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistWithPaintings {
    pub artist: Artist,
    pub paintings: Vec<Painting>,
}

impl ArtistWithPaintings {
    pub fn new(artist: Artist, mut paintings: Vec<Painting>) -> Self {
        paintings.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.title.cmp(&b.title)));
        Self { artist, paintings }
    }
}
