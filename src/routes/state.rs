use std::sync::Arc;

use crate::{db::Cache, services::RecommendationPolicy, store::CatalogStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    /// Ranking cache; `None` runs every request against the store
    pub cache: Option<Cache>,
    pub recommendation_policy: RecommendationPolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            cache: None,
            recommendation_policy: RecommendationPolicy::default(),
        }
    }

    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_recommendation_policy(mut self, policy: RecommendationPolicy) -> Self {
        self.recommendation_policy = policy;
        self
    }
}
