use tracing::instrument;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{PaintingId, ScoredPainting},
    store::CatalogStore,
};

use super::ranking::rank_by_overlap;

/// Finds paintings sharing at least one tag with `painting_id`
///
/// Only tags the target carries are counted, each candidate appears once,
/// and the target itself is never returned. Archiving does not take a
/// painting out of the ranking, as target or as candidate.
///
/// Results are cached per painting when a cache is configured.
#[instrument(skip(store, cache))]
pub async fn similar_to(
    store: &dyn CatalogStore,
    cache: Option<&Cache>,
    painting_id: PaintingId,
) -> AppResult<Vec<ScoredPainting>> {
    if store.painting(painting_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Painting {} not found",
            painting_id
        )));
    }

    cached!(cache, CacheKey::Similar(painting_id), async {
        compute_similar(store, painting_id).await
    })
}

async fn compute_similar(
    store: &dyn CatalogStore,
    painting_id: PaintingId,
) -> AppResult<Vec<ScoredPainting>> {
    let tags = store.tags_of(painting_id).await?;
    if tags.is_empty() {
        tracing::debug!(painting_id, "Painting has no tags, nothing is similar");
        return Ok(Vec::new());
    }

    let candidates = store
        .paintings_having_any_tag(&tags, Some(painting_id))
        .await?;

    let ranked: Vec<ScoredPainting> = rank_by_overlap(
        candidates.into_iter().filter(|p| p.id != painting_id),
        &tags,
    )
    .into_iter()
    .filter(|s| s.shared_tags > 0)
    .collect();

    tracing::info!(
        painting_id,
        tag_count = tags.len(),
        similar_count = ranked.len(),
        "Computed similar paintings"
    );

    Ok(ranked)
}
