use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PaintingId;

/// Identity issued by the external account service
pub type UserId = i64;

/// A user's affinity marker for a painting; unique per (user, painting)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: UserId,
    pub painting_id: PaintingId,
    pub created_at: DateTime<Utc>,
}

/// Result of an atomic create-if-absent on the favorites table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteInsert {
    /// The row for the pair, whether freshly created or pre-existing
    pub favorite: Favorite,
    /// `false` when the pair was already favorited
    pub created: bool,
}
