mod artist;
mod favorite;
mod painting;
mod tag;

pub use artist::{Artist, ArtistId, ArtistWithPaintings};
pub use favorite::{Favorite, FavoriteInsert, UserId};
pub use painting::{NewPainting, Painting, PaintingId, ScoredPainting};
pub use tag::{Tag, TagId};
