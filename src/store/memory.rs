use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        Artist, ArtistId, Favorite, FavoriteInsert, NewPainting, Painting, PaintingId, Tag, TagId,
        UserId,
    },
};

use super::CatalogStore;

/// In-process catalog backed by ordered maps behind a single lock
///
/// Every favorite write takes the write lock for the whole check-and-insert,
/// so the (user, painting) uniqueness holds under concurrent requests.
#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
    inner: Arc<RwLock<CatalogInner>>,
}

#[derive(Default)]
struct CatalogInner {
    artists: BTreeMap<ArtistId, Artist>,
    /// Paintings stored without tags; tags are joined in on read
    paintings: BTreeMap<PaintingId, Painting>,
    tags: BTreeMap<TagId, Tag>,
    painting_tags: BTreeSet<(PaintingId, TagId)>,
    favorites: BTreeMap<(UserId, PaintingId), Favorite>,
    last_id: i64,
}

impl CatalogInner {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn tag_ids_of(&self, painting_id: PaintingId) -> impl Iterator<Item = TagId> + '_ {
        self.painting_tags
            .range((painting_id, TagId::MIN)..=(painting_id, TagId::MAX))
            .map(|(_, tag_id)| *tag_id)
    }

    fn hydrate(&self, painting: &Painting) -> Painting {
        let mut tags: Vec<Tag> = self
            .tag_ids_of(painting.id)
            .filter_map(|id| self.tags.get(&id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));

        let artist_name = self
            .artists
            .get(&painting.artist_id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| painting.artist_name.clone());

        Painting {
            tags,
            artist_name,
            ..painting.clone()
        }
    }

    /// Hydrated paintings matching `keep`, newest first
    fn paintings_where<F>(&self, keep: F) -> Vec<Painting>
    where
        F: Fn(&Painting) -> bool,
    {
        let mut paintings: Vec<Painting> = self
            .paintings
            .values()
            .filter(|p| keep(p))
            .map(|p| self.hydrate(p))
            .collect();
        newest_first(&mut paintings);
        paintings
    }
}

fn newest_first(paintings: &mut [Painting]) {
    paintings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an artist
    pub async fn add_artist(
        &self,
        name: impl Into<String>,
        bio: impl Into<String>,
        image: impl Into<String>,
    ) -> Artist {
        let mut inner = self.inner.write().await;
        let artist = Artist {
            id: inner.next_id(),
            name: name.into(),
            bio: bio.into(),
            image: image.into(),
        };
        inner.artists.insert(artist.id, artist.clone());
        artist
    }

    /// Adds a tag; names must be unique
    pub async fn add_tag(&self, name: impl Into<String>) -> AppResult<Tag> {
        let name = name.into();
        let mut inner = self.inner.write().await;
        if inner.tags.values().any(|t| t.name == name) {
            return Err(AppError::Conflict(format!("Tag '{}' already exists", name)));
        }
        let tag = Tag::new(inner.next_id(), name);
        inner.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    /// Adds a painting owned by an existing artist
    pub async fn add_painting(&self, new: NewPainting) -> AppResult<Painting> {
        let mut inner = self.inner.write().await;
        let artist_name = inner
            .artists
            .get(&new.artist_id)
            .map(|a| a.name.clone())
            .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", new.artist_id)))?;

        let now = Utc::now();
        let painting = Painting {
            id: inner.next_id(),
            title: new.title,
            artist_id: new.artist_id,
            artist_name,
            year: new.year,
            image: new.image,
            description: new.description,
            tags: Vec::new(),
            archive: false,
            created_at: now,
            updated_at: now,
        };
        inner.paintings.insert(painting.id, painting.clone());
        Ok(painting)
    }

    /// Attaches a tag to a painting; returns `false` if it was already attached
    pub async fn tag_painting(&self, painting_id: PaintingId, tag_id: TagId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        if !inner.paintings.contains_key(&painting_id) {
            return Err(AppError::NotFound(format!("Painting {} not found", painting_id)));
        }
        if !inner.tags.contains_key(&tag_id) {
            return Err(AppError::NotFound(format!("Tag {} not found", tag_id)));
        }
        Ok(inner.painting_tags.insert((painting_id, tag_id)))
    }

    /// Sets the archive flag on a painting
    pub async fn set_archived(&self, painting_id: PaintingId, archive: bool) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let painting = inner
            .paintings
            .get_mut(&painting_id)
            .ok_or_else(|| AppError::NotFound(format!("Painting {} not found", painting_id)))?;
        painting.archive = archive;
        painting.updated_at = Utc::now();
        Ok(())
    }

    /// Number of favorite rows stored for the pair (0 or 1)
    pub async fn favorite_count(&self, user_id: UserId, painting_id: PaintingId) -> usize {
        let inner = self.inner.read().await;
        inner
            .favorites
            .values()
            .filter(|f| f.user_id == user_id && f.painting_id == painting_id)
            .count()
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn painting(&self, id: PaintingId) -> AppResult<Option<Painting>> {
        let inner = self.inner.read().await;
        Ok(inner.paintings.get(&id).map(|p| inner.hydrate(p)))
    }

    async fn all_paintings(&self) -> AppResult<Vec<Painting>> {
        let inner = self.inner.read().await;
        Ok(inner.paintings_where(|_| true))
    }

    async fn listed_paintings(&self) -> AppResult<Vec<Painting>> {
        let inner = self.inner.read().await;
        Ok(inner.paintings_where(|p| !p.archive))
    }

    async fn artist_paintings(&self, artist_id: ArtistId) -> AppResult<Vec<Painting>> {
        let inner = self.inner.read().await;
        Ok(inner.paintings_where(|p| p.artist_id == artist_id))
    }

    async fn tags_of(&self, painting_id: PaintingId) -> AppResult<HashSet<TagId>> {
        let inner = self.inner.read().await;
        Ok(inner.tag_ids_of(painting_id).collect())
    }

    async fn paintings_having_any_tag(
        &self,
        tag_ids: &HashSet<TagId>,
        excluding: Option<PaintingId>,
    ) -> AppResult<Vec<Painting>> {
        let inner = self.inner.read().await;
        Ok(inner.paintings_where(|p| {
            Some(p.id) != excluding && inner.tag_ids_of(p.id).any(|t| tag_ids.contains(&t))
        }))
    }

    async fn favorites_of(&self, user_id: UserId) -> AppResult<HashSet<PaintingId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .range((user_id, PaintingId::MIN)..=(user_id, PaintingId::MAX))
            .map(|((_, painting_id), _)| *painting_id)
            .collect())
    }

    async fn favorite_paintings(&self, user_id: UserId) -> AppResult<Vec<Painting>> {
        let inner = self.inner.read().await;
        let mut favorites: Vec<&Favorite> = inner
            .favorites
            .range((user_id, PaintingId::MIN)..=(user_id, PaintingId::MAX))
            .map(|(_, favorite)| favorite)
            .collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        Ok(favorites
            .into_iter()
            .filter_map(|f| inner.paintings.get(&f.painting_id))
            .map(|p| inner.hydrate(p))
            .collect())
    }

    async fn insert_favorite(
        &self,
        user_id: UserId,
        painting_id: PaintingId,
    ) -> AppResult<FavoriteInsert> {
        let mut inner = self.inner.write().await;
        if !inner.paintings.contains_key(&painting_id) {
            return Err(AppError::NotFound(format!("Painting {} not found", painting_id)));
        }

        if let Some(existing) = inner.favorites.get(&(user_id, painting_id)) {
            return Ok(FavoriteInsert {
                favorite: existing.clone(),
                created: false,
            });
        }

        let favorite = Favorite {
            id: inner.next_id(),
            user_id,
            painting_id,
            created_at: Utc::now(),
        };
        inner
            .favorites
            .insert((user_id, painting_id), favorite.clone());

        Ok(FavoriteInsert {
            favorite,
            created: true,
        })
    }

    async fn delete_favorite(&self, user_id: UserId, painting_id: PaintingId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.favorites.remove(&(user_id, painting_id)).is_some())
    }

    async fn artists(&self) -> AppResult<Vec<Artist>> {
        let inner = self.inner.read().await;
        let mut artists: Vec<Artist> = inner.artists.values().cloned().collect();
        artists.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(artists)
    }

    async fn artist(&self, id: ArtistId) -> AppResult<Option<Artist>> {
        let inner = self.inner.read().await;
        Ok(inner.artists.get(&id).cloned())
    }

    async fn tags(&self) -> AppResult<Vec<Tag>> {
        let inner = self.inner.read().await;
        let mut tags: Vec<Tag> = inner.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    fn new_painting(title: &str, artist_id: ArtistId) -> NewPainting {
        NewPainting {
            title: title.to_string(),
            artist_id,
            year: 1889,
            image: format!("paintings/{}.jpg", title.to_lowercase()),
            description: String::new(),
        }
    }

    #[test]
    fn test_tag_names_are_unique() {
        block_on(async {
            let store = MemoryCatalogStore::new();
            store.add_tag("cubism").await.unwrap();
            let err = store.add_tag("cubism").await.unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        });
    }

    #[test]
    fn test_painting_requires_existing_artist() {
        block_on(async {
            let store = MemoryCatalogStore::new();
            let err = store.add_painting(new_painting("Orphan", 42)).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)));
        });
    }

    #[test]
    fn test_tag_painting_pair_is_unique() {
        block_on(async {
            let store = MemoryCatalogStore::new();
            let artist = store.add_artist("Vincent van Gogh", "", "").await;
            let painting = store.add_painting(new_painting("Irises", artist.id)).await.unwrap();
            let tag = store.add_tag("flowers").await.unwrap();

            assert!(store.tag_painting(painting.id, tag.id).await.unwrap());
            assert!(!store.tag_painting(painting.id, tag.id).await.unwrap());
            assert_eq!(store.tags_of(painting.id).await.unwrap(), HashSet::from([tag.id]));
        });
    }

    #[test]
    fn test_archived_paintings_leave_listing_but_stay_candidates() {
        block_on(async {
            let store = MemoryCatalogStore::new();
            let artist = store.add_artist("Vincent van Gogh", "", "").await;
            let kept = store.add_painting(new_painting("Irises", artist.id)).await.unwrap();
            let hidden = store.add_painting(new_painting("Sunflowers", artist.id)).await.unwrap();
            let tag = store.add_tag("flowers").await.unwrap();
            store.tag_painting(kept.id, tag.id).await.unwrap();
            store.tag_painting(hidden.id, tag.id).await.unwrap();
            store.set_archived(hidden.id, true).await.unwrap();

            let listed: Vec<PaintingId> =
                store.listed_paintings().await.unwrap().iter().map(|p| p.id).collect();
            assert_eq!(listed, vec![kept.id]);

            let mut everything: Vec<PaintingId> =
                store.all_paintings().await.unwrap().iter().map(|p| p.id).collect();
            everything.sort();
            assert_eq!(everything, vec![kept.id, hidden.id]);

            let tagged = store
                .paintings_having_any_tag(&HashSet::from([tag.id]), Some(kept.id))
                .await
                .unwrap();
            assert_eq!(tagged.len(), 1);
            assert_eq!(tagged[0].id, hidden.id);
            assert!(tagged[0].archive);
        });
    }

    #[test]
    fn test_artist_paintings_only_that_artist() {
        block_on(async {
            let store = MemoryCatalogStore::new();
            let gogh = store.add_artist("Vincent van Gogh", "", "").await;
            let picasso = store.add_artist("Pablo Picasso", "", "").await;
            let irises = store.add_painting(new_painting("Irises", gogh.id)).await.unwrap();
            store.add_painting(new_painting("Guernica", picasso.id)).await.unwrap();
            store.set_archived(irises.id, true).await.unwrap();

            let paintings = store.artist_paintings(gogh.id).await.unwrap();
            assert_eq!(paintings.len(), 1);
            assert_eq!(paintings[0].id, irises.id);
            assert!(store.artist_paintings(404).await.unwrap().is_empty());
        });
    }

    #[test]
    fn test_paintings_having_any_tag_returns_each_painting_once() {
        block_on(async {
            let store = MemoryCatalogStore::new();
            let artist = store.add_artist("Vincent van Gogh", "", "").await;
            let painting = store.add_painting(new_painting("Irises", artist.id)).await.unwrap();
            let a = store.add_tag("flowers").await.unwrap();
            let b = store.add_tag("garden").await.unwrap();
            store.tag_painting(painting.id, a.id).await.unwrap();
            store.tag_painting(painting.id, b.id).await.unwrap();

            let found = store
                .paintings_having_any_tag(&HashSet::from([a.id, b.id]), None)
                .await
                .unwrap();
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].tags.len(), 2);

            let excluded = store
                .paintings_having_any_tag(&HashSet::from([a.id, b.id]), Some(painting.id))
                .await
                .unwrap();
            assert!(excluded.is_empty());
        });
    }

    #[test]
    fn test_insert_favorite_twice_keeps_one_row() {
        block_on(async {
            let store = MemoryCatalogStore::new();
            let artist = store.add_artist("Vincent van Gogh", "", "").await;
            let painting = store.add_painting(new_painting("Irises", artist.id)).await.unwrap();

            let first = store.insert_favorite(7, painting.id).await.unwrap();
            let second = store.insert_favorite(7, painting.id).await.unwrap();

            assert!(first.created);
            assert!(!second.created);
            assert_eq!(first.favorite, second.favorite);
            assert_eq!(store.favorite_count(7, painting.id).await, 1);
        });
    }

    #[test]
    fn test_delete_favorite_reports_absence() {
        block_on(async {
            let store = MemoryCatalogStore::new();
            let artist = store.add_artist("Vincent van Gogh", "", "").await;
            let painting = store.add_painting(new_painting("Irises", artist.id)).await.unwrap();

            assert!(!store.delete_favorite(7, painting.id).await.unwrap());
            store.insert_favorite(7, painting.id).await.unwrap();
            assert!(store.delete_favorite(7, painting.id).await.unwrap());
            assert!(store.favorites_of(7).await.unwrap().is_empty());
        });
    }

    #[test]
    fn test_tags_of_many_unions_tags() {
        block_on(async {
            let store = MemoryCatalogStore::new();
            let artist = store.add_artist("Vincent van Gogh", "", "").await;
            let first = store.add_painting(new_painting("Irises", artist.id)).await.unwrap();
            let second = store.add_painting(new_painting("Wheatfield", artist.id)).await.unwrap();
            let a = store.add_tag("flowers").await.unwrap();
            let b = store.add_tag("fields").await.unwrap();
            store.tag_painting(first.id, a.id).await.unwrap();
            store.tag_painting(second.id, a.id).await.unwrap();
            store.tag_painting(second.id, b.id).await.unwrap();

            let tags = store.tags_of_many(&[first.id, second.id]).await.unwrap();
            assert_eq!(tags, HashSet::from([a.id, b.id]));
        });
    }
}
