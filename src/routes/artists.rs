use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::{ArtistId, ArtistWithPaintings, PaintingId},
    routes::{paintings::PaintingResponse, AppState},
    services::catalog,
};

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub id: ArtistId,
    pub name: String,
    pub bio: String,
    pub image: String,
    pub paintings: Vec<PaintingResponse>,
}

impl ArtistResponse {
    fn new(entry: ArtistWithPaintings, favorites: &HashSet<PaintingId>) -> Self {
        Self {
            id: entry.artist.id,
            name: entry.artist.name,
            bio: entry.artist.bio,
            image: entry.artist.image,
            paintings: PaintingResponse::many(entry.paintings, favorites),
        }
    }
}

/// GET /artists
pub async fn list(
    State(state): State<Arc<AppState>>,
    user: Option<CurrentUser>,
) -> AppResult<Json<Vec<ArtistResponse>>> {
    let store = state.store.as_ref();
    let favorites = catalog::favorite_ids(store, user.map(|u| u.0)).await?;
    let artists = catalog::list_artists(store).await?;
    Ok(Json(
        artists
            .into_iter()
            .map(|a| ArtistResponse::new(a, &favorites))
            .collect(),
    ))
}

/// GET /artists/:id
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ArtistId>,
    user: Option<CurrentUser>,
) -> AppResult<Json<ArtistResponse>> {
    let store = state.store.as_ref();
    let artist = catalog::artist_detail(store, id).await?;
    let favorites = catalog::favorite_ids(store, user.map(|u| u.0)).await?;
    Ok(Json(ArtistResponse::new(artist, &favorites)))
}
