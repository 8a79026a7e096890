use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::AppResult,
    middleware::{CurrentUser, RequestId},
    models::{ArtistId, Painting, PaintingId, ScoredPainting},
    routes::AppState,
    services::{catalog, similarity},
};

/// Painting as returned to clients
#[derive(Debug, Serialize)]
pub struct PaintingResponse {
    pub id: PaintingId,
    pub title: String,
    /// Artist display name
    pub artist: String,
    pub artist_id: ArtistId,
    pub year: i32,
    pub image: String,
    pub description: String,
    /// Tag names
    pub tags: Vec<String>,
    pub archive: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Whether the calling user has favorited this painting
    pub is_favorite: bool,
    /// Present on ranked listings only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_tags: Option<u32>,
}

impl PaintingResponse {
    pub fn new(painting: Painting, favorites: &HashSet<PaintingId>) -> Self {
        Self {
            is_favorite: favorites.contains(&painting.id),
            id: painting.id,
            title: painting.title,
            artist: painting.artist_name,
            artist_id: painting.artist_id,
            year: painting.year,
            image: painting.image,
            description: painting.description,
            tags: painting.tags.into_iter().map(|t| t.name).collect(),
            archive: painting.archive,
            created_at: painting.created_at,
            updated_at: painting.updated_at,
            shared_tags: None,
        }
    }

    pub fn scored(scored: ScoredPainting, favorites: &HashSet<PaintingId>) -> Self {
        Self {
            shared_tags: Some(scored.shared_tags),
            ..Self::new(scored.painting, favorites)
        }
    }

    pub fn many(paintings: Vec<Painting>, favorites: &HashSet<PaintingId>) -> Vec<Self> {
        paintings
            .into_iter()
            .map(|p| Self::new(p, favorites))
            .collect()
    }
}

/// GET /paintings
pub async fn list(
    State(state): State<Arc<AppState>>,
    user: Option<CurrentUser>,
) -> AppResult<Json<Vec<PaintingResponse>>> {
    let store = state.store.as_ref();
    let favorites = catalog::favorite_ids(store, user.map(|u| u.0)).await?;
    let paintings = catalog::list_paintings(store).await?;
    Ok(Json(PaintingResponse::many(paintings, &favorites)))
}

/// GET /paintings/:id
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PaintingId>,
    user: Option<CurrentUser>,
) -> AppResult<Json<PaintingResponse>> {
    let store = state.store.as_ref();
    let painting = catalog::painting_detail(store, id).await?;
    let favorites = catalog::favorite_ids(store, user.map(|u| u.0)).await?;
    Ok(Json(PaintingResponse::new(painting, &favorites)))
}

/// GET /paintings/:id/similar
pub async fn similar(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<PaintingId>,
    user: Option<CurrentUser>,
) -> AppResult<Json<Vec<PaintingResponse>>> {
    tracing::info!(request_id = %request_id, painting_id = id, "Looking up similar paintings");

    let store = state.store.as_ref();
    let similar = similarity::similar_to(store, state.cache.as_ref(), id).await?;
    let favorites = catalog::favorite_ids(store, user.map(|u| u.0)).await?;

    Ok(Json(
        similar
            .into_iter()
            .map(|s| PaintingResponse::scored(s, &favorites))
            .collect(),
    ))
}
