use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ArtistId, Tag, TagId};

pub type PaintingId = i64;

/// Represents a painting in the catalog with its attached tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Painting {
    pub id: PaintingId,
    pub title: String,
    pub artist_id: ArtistId,
    /// Display name of the owning artist
    pub artist_name: String,
    pub year: i32,
    /// Reference to the image stored by the media collaborator
    pub image: String,
    pub description: String,
    /// Tags ordered by name
    pub tags: Vec<Tag>,
    /// Archived paintings are hidden from listings and rankings but kept
    pub archive: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Painting {
    pub fn tag_ids(&self) -> HashSet<TagId> {
        self.tags.iter().map(|t| t.id).collect()
    }

    /// Number of this painting's tags that appear in `reference`
    pub fn shared_tag_count(&self, reference: &HashSet<TagId>) -> u32 {
        self.tag_ids().intersection(reference).count() as u32
    }
}

/// Payload used by administrative write paths to add a painting
#[derive(Debug, Clone, Deserialize)]
pub struct NewPainting {
    pub title: String,
    pub artist_id: ArtistId,
    pub year: i32,
    pub image: String,
    pub description: String,
}

/// A painting paired with the number of tags it shares with a reference set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPainting {
    pub painting: Painting,
    pub shared_tags: u32,
}
