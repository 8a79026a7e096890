use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{error::AppResult, models::Tag, routes::AppState, services::catalog};

/// GET /tags
pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Tag>>> {
    let tags = catalog::list_tags(state.store.as_ref(), state.cache.as_ref()).await?;
    Ok(Json(tags))
}
