pub mod catalog;
pub mod favorites;
pub mod ranking;
pub mod recommendations;
pub mod similarity;

pub use favorites::{mark_favorite, unfavorite, MarkFavorite, Unfavorite};
pub use recommendations::{recommendations_for, RecommendationPolicy};
pub use similarity::similar_to;
