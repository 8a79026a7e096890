use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{
        Artist, ArtistId, Favorite, FavoriteInsert, Painting, PaintingId, Tag, TagId, UserId,
    },
};

use super::CatalogStore;

/// Shared projection for painting reads: the painting, its artist's name and
/// its tags aggregated into parallel arrays ordered by tag name.
const PAINTING_SELECT: &str = r#"
    SELECT p.id, p.title, p.artist_id, a.name AS artist_name, p.year, p.image,
           p.description, p.archive, p.created_at, p.updated_at,
           COALESCE(array_agg(t.id ORDER BY t.name) FILTER (WHERE t.id IS NOT NULL), '{}') AS tag_ids,
           COALESCE(array_agg(t.name ORDER BY t.name) FILTER (WHERE t.id IS NOT NULL), '{}') AS tag_names
    FROM paintings p
    JOIN artists a ON a.id = p.artist_id
    LEFT JOIN painting_tags pt ON pt.painting_id = p.id
    LEFT JOIN tags t ON t.id = pt.tag_id
"#;

const PAINTING_GROUP_BY: &str = "GROUP BY p.id, a.id";

/// Inserts the pair or, when it already exists, returns the existing row.
/// One statement, so there is no gap between the insert and the lookup.
const FAVORITE_INSERT: &str = r#"
    WITH inserted AS (
        INSERT INTO favorites (user_id, painting_id) VALUES ($1, $2)
        ON CONFLICT ON CONSTRAINT unique_favorite DO NOTHING
        RETURNING id, user_id, painting_id, created_at
    )
    SELECT id, user_id, painting_id, created_at, TRUE AS created FROM inserted
    UNION ALL
    SELECT id, user_id, painting_id, created_at, FALSE AS created FROM favorites
    WHERE user_id = $1 AND painting_id = $2 AND NOT EXISTS (SELECT 1 FROM inserted)
"#;

const FAVORITE_INSERT_ATTEMPTS: u32 = 3;

#[derive(sqlx::FromRow)]
struct FavoriteRow {
    #[sqlx(flatten)]
    favorite: Favorite,
    created: bool,
}

#[derive(sqlx::FromRow)]
struct PaintingRow {
    id: PaintingId,
    title: String,
    artist_id: ArtistId,
    artist_name: String,
    year: i32,
    image: String,
    description: String,
    archive: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    tag_ids: Vec<TagId>,
    tag_names: Vec<String>,
}

impl From<PaintingRow> for Painting {
    fn from(row: PaintingRow) -> Self {
        let tags = row
            .tag_ids
            .into_iter()
            .zip(row.tag_names)
            .map(|(id, name)| Tag { id, name })
            .collect();

        Painting {
            id: row.id,
            title: row.title,
            artist_id: row.artist_id,
            artist_name: row.artist_name,
            year: row.year,
            image: row.image,
            description: row.description,
            tags,
            archive: row.archive,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Catalog store backed by PostgreSQL
///
/// Favorite uniqueness is enforced by the `unique_favorite` constraint, so
/// concurrent inserts for the same pair cannot both succeed.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_paintings(&self, sql: &str) -> AppResult<Vec<Painting>> {
        let rows = sqlx::query_as::<_, PaintingRow>(sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Painting::from).collect())
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn painting(&self, id: PaintingId) -> AppResult<Option<Painting>> {
        let sql = format!("{PAINTING_SELECT} WHERE p.id = $1 {PAINTING_GROUP_BY}");
        let row = sqlx::query_as::<_, PaintingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Painting::from))
    }

    async fn all_paintings(&self) -> AppResult<Vec<Painting>> {
        let sql =
            format!("{PAINTING_SELECT} {PAINTING_GROUP_BY} ORDER BY p.created_at DESC, p.id DESC");
        self.fetch_paintings(&sql).await
    }

    async fn listed_paintings(&self) -> AppResult<Vec<Painting>> {
        let sql = format!(
            "{PAINTING_SELECT} WHERE p.archive = FALSE {PAINTING_GROUP_BY} \
             ORDER BY p.created_at DESC, p.id DESC"
        );
        self.fetch_paintings(&sql).await
    }

    async fn artist_paintings(&self, artist_id: ArtistId) -> AppResult<Vec<Painting>> {
        let sql = format!(
            "{PAINTING_SELECT} WHERE p.artist_id = $1 {PAINTING_GROUP_BY} \
             ORDER BY p.year DESC, p.title, p.id"
        );
        let rows = sqlx::query_as::<_, PaintingRow>(&sql)
            .bind(artist_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Painting::from).collect())
    }

    async fn tags_of(&self, painting_id: PaintingId) -> AppResult<HashSet<TagId>> {
        let ids = sqlx::query_scalar::<_, TagId>(
            "SELECT tag_id FROM painting_tags WHERE painting_id = $1",
        )
        .bind(painting_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids.into_iter().collect())
    }

    async fn tags_of_many(&self, painting_ids: &[PaintingId]) -> AppResult<HashSet<TagId>> {
        if painting_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let ids = sqlx::query_scalar::<_, TagId>(
            "SELECT DISTINCT tag_id FROM painting_tags WHERE painting_id = ANY($1)",
        )
        .bind(painting_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids.into_iter().collect())
    }

    async fn paintings_having_any_tag(
        &self,
        tag_ids: &HashSet<TagId>,
        excluding: Option<PaintingId>,
    ) -> AppResult<Vec<Painting>> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }
        let tag_ids: Vec<TagId> = tag_ids.iter().copied().collect();

        // EXISTS keeps one row per painting however many tags match
        let sql = format!(
            "{PAINTING_SELECT} \
             WHERE ($2::BIGINT IS NULL OR p.id <> $2) \
               AND EXISTS (SELECT 1 FROM painting_tags m \
                           WHERE m.painting_id = p.id AND m.tag_id = ANY($1)) \
             {PAINTING_GROUP_BY} \
             ORDER BY p.created_at DESC, p.id DESC"
        );
        let rows = sqlx::query_as::<_, PaintingRow>(&sql)
            .bind(&tag_ids)
            .bind(excluding)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Painting::from).collect())
    }

    async fn favorites_of(&self, user_id: UserId) -> AppResult<HashSet<PaintingId>> {
        let ids = sqlx::query_scalar::<_, PaintingId>(
            "SELECT painting_id FROM favorites WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids.into_iter().collect())
    }

    async fn favorite_paintings(&self, user_id: UserId) -> AppResult<Vec<Painting>> {
        let sql = format!(
            "{PAINTING_SELECT} \
             JOIN favorites f ON f.painting_id = p.id AND f.user_id = $1 \
             {PAINTING_GROUP_BY}, f.id \
             ORDER BY f.created_at DESC, f.id DESC"
        );
        let rows = sqlx::query_as::<_, PaintingRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Painting::from).collect())
    }

    async fn insert_favorite(
        &self,
        user_id: UserId,
        painting_id: PaintingId,
    ) -> AppResult<FavoriteInsert> {
        // A pair committed by a concurrent insert after this statement's
        // snapshot is invisible to the fallback SELECT, and a concurrent
        // delete can remove it; either way no row comes back and the
        // statement is rerun with a fresh snapshot.
        for attempt in 1..=FAVORITE_INSERT_ATTEMPTS {
            let row = sqlx::query_as::<_, FavoriteRow>(FAVORITE_INSERT)
                .bind(user_id)
                .bind(painting_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| match e {
                    sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                        AppError::NotFound(format!("Painting {} not found", painting_id))
                    }
                    other => AppError::Database(other),
                })?;

            if let Some(row) = row {
                return Ok(FavoriteInsert {
                    favorite: row.favorite,
                    created: row.created,
                });
            }
            tracing::debug!(user_id, painting_id, attempt, "Favorite insert raced, retrying");
        }

        Err(AppError::Internal(format!(
            "Favorite for painting {} kept changing under concurrent writes",
            painting_id
        )))
    }

    async fn delete_favorite(&self, user_id: UserId, painting_id: PaintingId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND painting_id = $2")
            .bind(user_id)
            .bind(painting_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn artists(&self) -> AppResult<Vec<Artist>> {
        let artists = sqlx::query_as::<_, Artist>(
            "SELECT id, name, bio, image FROM artists ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(artists)
    }

    async fn artist(&self, id: ArtistId) -> AppResult<Option<Artist>> {
        let artist =
            sqlx::query_as::<_, Artist>("SELECT id, name, bio, image FROM artists WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(artist)
    }

    async fn tags(&self) -> AppResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }
}
