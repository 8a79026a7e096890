use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult,
    middleware::{CurrentUser, RequestId},
    routes::{paintings::PaintingResponse, AppState},
    services::{catalog, recommendations},
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<PaintingResponse>>> {
    tracing::info!(
        request_id = %request_id,
        user_id,
        policy = ?state.recommendation_policy,
        "Processing recommendation request"
    );

    let store = state.store.as_ref();
    let ranked =
        recommendations::recommendations_for(store, user_id, state.recommendation_policy).await?;
    let favorites = catalog::favorite_ids(store, Some(user_id)).await?;

    Ok(Json(
        ranked
            .into_iter()
            .map(|s| PaintingResponse::scored(s, &favorites))
            .collect(),
    ))
}
