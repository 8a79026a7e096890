//! Catalog storage abstraction
//!
//! The rankers and favorite toggle only talk to this trait, so they work the
//! same against PostgreSQL and the in-memory catalog used in tests.

use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{Artist, ArtistId, FavoriteInsert, Painting, PaintingId, Tag, TagId, UserId},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// Read access to the catalog plus the favorite write paths
///
/// "Listed" paintings are the non-archived ones; only the default listing
/// filters on that. Every other read, ranking candidates included, covers
/// the full catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch a single painting by ID, archived or not
    async fn painting(&self, id: PaintingId) -> AppResult<Option<Painting>>;

    /// Every painting in the catalog, archived ones included, newest first
    async fn all_paintings(&self) -> AppResult<Vec<Painting>>;

    /// Non-archived paintings, newest first
    async fn listed_paintings(&self) -> AppResult<Vec<Painting>>;

    /// Every painting by one artist, archived ones included
    async fn artist_paintings(&self, artist_id: ArtistId) -> AppResult<Vec<Painting>>;

    /// Tag IDs attached to a painting
    async fn tags_of(&self, painting_id: PaintingId) -> AppResult<HashSet<TagId>>;

    /// Union of the tag IDs attached to any of the given paintings
    ///
    /// Default implementation calls `tags_of` per painting. Stores with a
    /// batch query should override it.
    async fn tags_of_many(&self, painting_ids: &[PaintingId]) -> AppResult<HashSet<TagId>> {
        let mut tags = HashSet::new();
        for id in painting_ids {
            tags.extend(self.tags_of(*id).await?);
        }
        Ok(tags)
    }

    /// Paintings carrying at least one of `tag_ids`, each returned once
    async fn paintings_having_any_tag(
        &self,
        tag_ids: &HashSet<TagId>,
        excluding: Option<PaintingId>,
    ) -> AppResult<Vec<Painting>>;

    /// IDs of every painting the user has favorited
    async fn favorites_of(&self, user_id: UserId) -> AppResult<HashSet<PaintingId>>;

    /// Paintings the user has favorited, most recently favorited first
    async fn favorite_paintings(&self, user_id: UserId) -> AppResult<Vec<Painting>>;

    /// Atomically create the favorite unless the pair already exists
    async fn insert_favorite(
        &self,
        user_id: UserId,
        painting_id: PaintingId,
    ) -> AppResult<FavoriteInsert>;

    /// Remove the favorite; returns whether a row was deleted
    async fn delete_favorite(&self, user_id: UserId, painting_id: PaintingId) -> AppResult<bool>;

    /// All artists ordered by name
    async fn artists(&self) -> AppResult<Vec<Artist>>;

    async fn artist(&self, id: ArtistId) -> AppResult<Option<Artist>>;

    /// All tags ordered by name
    async fn tags(&self) -> AppResult<Vec<Tag>>;
}
