use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{Painting, ScoredPainting, TagId};

/// Scores each painting by how many of its tags appear in `reference` and
/// sorts the result: most shared tags first, then title, then ID.
///
/// Titles compare byte-wise, so ordering is case-sensitive.
pub fn rank_by_overlap<I>(paintings: I, reference: &HashSet<TagId>) -> Vec<ScoredPainting>
where
    I: IntoIterator<Item = Painting>,
{
    let mut scored: Vec<ScoredPainting> = paintings
        .into_iter()
        .map(|painting| ScoredPainting {
            shared_tags: painting.shared_tag_count(reference),
            painting,
        })
        .collect();

    scored.sort_by(ranking_order);
    scored
}

fn ranking_order(a: &ScoredPainting, b: &ScoredPainting) -> Ordering {
    b.shared_tags
        .cmp(&a.shared_tags)
        .then_with(|| a.painting.title.cmp(&b.painting.title))
        .then_with(|| a.painting.id.cmp(&b.painting.id))
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;

    use crate::models::{Painting, PaintingId, Tag, TagId};

    /// Builds a listed painting with the given tag IDs; tag names mirror the IDs
    pub fn painting(id: PaintingId, title: &str, tags: &[TagId]) -> Painting {
        Painting {
            id,
            title: title.to_string(),
            artist_id: 1,
            artist_name: "Unknown".to_string(),
            year: 1900,
            image: format!("paintings/{}.jpg", id),
            description: String::new(),
            tags: tags.iter().map(|t| Tag::new(*t, format!("tag-{}", t))).collect(),
            archive: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
