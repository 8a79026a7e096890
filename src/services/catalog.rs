use std::collections::{HashMap, HashSet};

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ArtistId, ArtistWithPaintings, Painting, PaintingId, Tag, UserId},
    store::CatalogStore,
};

/// Non-archived paintings, newest first
pub async fn list_paintings(store: &dyn CatalogStore) -> AppResult<Vec<Painting>> {
    store.listed_paintings().await
}

/// A single painting by ID; archived paintings are still returned
pub async fn painting_detail(store: &dyn CatalogStore, id: PaintingId) -> AppResult<Painting> {
    store
        .painting(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Painting {} not found", id)))
}

/// Every artist with all of their paintings, archived ones included
pub async fn list_artists(store: &dyn CatalogStore) -> AppResult<Vec<ArtistWithPaintings>> {
    let artists = store.artists().await?;

    let mut by_artist: HashMap<ArtistId, Vec<Painting>> = HashMap::new();
    for painting in store.all_paintings().await? {
        by_artist.entry(painting.artist_id).or_default().push(painting);
    }

    Ok(artists
        .into_iter()
        .map(|artist| {
            let paintings = by_artist.remove(&artist.id).unwrap_or_default();
            ArtistWithPaintings::new(artist, paintings)
        })
        .collect())
}

pub async fn artist_detail(
    store: &dyn CatalogStore,
    id: ArtistId,
) -> AppResult<ArtistWithPaintings> {
    let artist = store
        .artist(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", id)))?;

    let paintings = store.artist_paintings(id).await?;

    Ok(ArtistWithPaintings::new(artist, paintings))
}

/// All tags ordered by name, cached when a cache is configured
pub async fn list_tags(store: &dyn CatalogStore, cache: Option<&Cache>) -> AppResult<Vec<Tag>> {
    cached!(cache, CacheKey::Tags, async { store.tags().await })
}

/// Paintings the user has favorited, archived ones included
pub async fn list_favorites(store: &dyn CatalogStore, user_id: UserId) -> AppResult<Vec<Painting>> {
    store.favorite_paintings(user_id).await
}

/// IDs the caller has favorited; empty for anonymous callers
pub async fn favorite_ids(
    store: &dyn CatalogStore,
    user_id: Option<UserId>,
) -> AppResult<HashSet<PaintingId>> {
    match user_id {
        Some(user_id) => store.favorites_of(user_id).await,
        None => Ok(HashSet::new()),
    }
}
