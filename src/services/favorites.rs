use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{Favorite, PaintingId, UserId},
    store::CatalogStore,
};

/// Outcome of marking a painting as favorite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkFavorite {
    /// `false` when the pair was already favorited and nothing changed
    pub created: bool,
    pub favorite: Favorite,
}

/// Outcome of removing a favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unfavorite {
    /// `false` when there was nothing to remove
    pub removed: bool,
}

/// Marks `painting_id` as a favorite of `user_id`
///
/// Relies on the store's atomic create-if-absent, so concurrent calls for the
/// same pair leave one row and at most one of them reports `created`.
#[instrument(skip(store))]
pub async fn mark_favorite(
    store: &dyn CatalogStore,
    user_id: UserId,
    painting_id: PaintingId,
) -> AppResult<MarkFavorite> {
    if store.painting(painting_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Painting {} not found",
            painting_id
        )));
    }

    let insert = store.insert_favorite(user_id, painting_id).await?;

    if insert.created {
        tracing::info!(user_id, painting_id, "Favorite created");
    } else {
        tracing::debug!(user_id, painting_id, "Painting already favorited");
    }

    Ok(MarkFavorite {
        created: insert.created,
        favorite: insert.favorite,
    })
}

/// Removes the favorite for the pair, if any
#[instrument(skip(store))]
pub async fn unfavorite(
    store: &dyn CatalogStore,
    user_id: UserId,
    painting_id: PaintingId,
) -> AppResult<Unfavorite> {
    let removed = store.delete_favorite(user_id, painting_id).await?;

    if removed {
        tracing::info!(user_id, painting_id, "Favorite removed");
    }

    Ok(Unfavorite { removed })
}
