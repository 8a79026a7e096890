use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    middleware::CurrentUser,
    models::{Favorite, PaintingId, UserId},
    routes::{paintings::PaintingResponse, AppState},
    services::{self, catalog},
};

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub id: i64,
    pub user: UserId,
    pub painting: PaintingId,
    pub created_at: DateTime<Utc>,
    pub created: bool,
}

impl FavoriteResponse {
    fn new(favorite: Favorite, created: bool) -> Self {
        Self {
            id: favorite.id,
            user: favorite.user_id,
            painting: favorite.painting_id,
            created_at: favorite.created_at,
            created,
        }
    }
}

/// POST /paintings/:id/favorite
///
/// 201 with the new favorite, or 409 if the painting was already favorited.
pub async fn mark(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(painting_id): Path<PaintingId>,
) -> AppResult<(StatusCode, Json<FavoriteResponse>)> {
    let outcome = services::mark_favorite(state.store.as_ref(), user_id, painting_id).await?;

    if !outcome.created {
        return Err(AppError::Conflict(format!(
            "Painting {} is already in favorites",
            painting_id
        )));
    }

    Ok((
        StatusCode::CREATED,
        Json(FavoriteResponse::new(outcome.favorite, true)),
    ))
}

/// DELETE /paintings/:id/favorite
///
/// 204 when removed, 404 when the painting was not favorited.
pub async fn unmark(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(painting_id): Path<PaintingId>,
) -> AppResult<StatusCode> {
    let outcome = services::unfavorite(state.store.as_ref(), user_id, painting_id).await?;

    if outcome.removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Painting {} is not in favorites",
            painting_id
        )))
    }
}

/// GET /favorites
pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<PaintingResponse>>> {
    let store = state.store.as_ref();
    let paintings = catalog::list_favorites(store, user_id).await?;
    let favorites = paintings.iter().map(|p| p.id).collect();
    Ok(Json(PaintingResponse::many(paintings, &favorites)))
}
