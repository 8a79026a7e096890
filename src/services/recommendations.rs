use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    error::AppResult,
    models::{ScoredPainting, UserId},
    store::CatalogStore,
};

use super::ranking::rank_by_overlap;

/// Whether a user's own favorites may show up in their recommendations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPolicy {
    #[default]
    IncludeFavorites,
    ExcludeFavorites,
}

/// Generates personalized painting recommendations
///
/// Every painting in the catalog, archived ones included, is scored by how
/// many of its tags also appear on any painting the user has favorited. A
/// user without favorites (including an identity the catalog has never seen)
/// gets every painting at zero, which degrades to a title-ordered listing.
#[instrument(skip(store))]
pub async fn recommendations_for(
    store: &dyn CatalogStore,
    user_id: UserId,
    policy: RecommendationPolicy,
) -> AppResult<Vec<ScoredPainting>> {
    let favorites = store.favorites_of(user_id).await?;

    let favorite_ids: Vec<_> = favorites.iter().copied().collect();
    let liked_tags = store.tags_of_many(&favorite_ids).await?;

    let paintings = store.all_paintings().await?;
    let universe = paintings.into_iter().filter(|p| match policy {
        RecommendationPolicy::IncludeFavorites => true,
        RecommendationPolicy::ExcludeFavorites => !favorites.contains(&p.id),
    });

    let ranked = rank_by_overlap(universe, &liked_tags);

    tracing::info!(
        user_id,
        favorite_count = favorites.len(),
        liked_tag_count = liked_tags.len(),
        recommended = ranked.len(),
        "Computed recommendations"
    );

    Ok(ranked)
}
