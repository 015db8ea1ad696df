use crate::ScoredItem;
use std::cmp::Ordering;

/// Top `limit` items by descending relevance.
///
/// The sort is stable, so equal scores keep their fetch order. An empty input
/// (or `limit == 0`) yields an empty output.
pub fn rank(mut items: Vec<ScoredItem>, limit: usize) -> Vec<ScoredItem> {
    items.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
    items.truncate(limit);
    tracing::debug!(kept = items.len(), limit, "ranked scored items");
    items
}

/// Score `items` against `topic` and keep the top `limit`.
pub fn score_and_rank(
    items: &[crate::DiscussionItem],
    topic: &str,
    limit: usize,
) -> Vec<ScoredItem> {
    rank(crate::score::score_items(items, topic), limit)
}
