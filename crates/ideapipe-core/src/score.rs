//! Topic relevance heuristic for discussion items.
//!
//! Scores are sums of keyword hits and a capped engagement bonus. They are not
//! normalized, so they are only comparable within one scoring run over the same topic.

use crate::{DiscussionItem, ScoredItem};

/// Upper bound of the `score / 100` component.
pub const MAX_SCORE_BONUS: f64 = 5.0;
/// Upper bound of the `num_comments / 50` component.
pub const MAX_COMMENTS_BONUS: f64 = 3.0;

pub fn engagement_bonus(item: &DiscussionItem) -> f64 {
    (item.score as f64 / 100.0).min(MAX_SCORE_BONUS)
        + (item.num_comments as f64 / 50.0).min(MAX_COMMENTS_BONUS)
}

/// Number of topic words that occur as substrings of the item's lowercased title+text.
///
/// Repeated topic words count once per repetition.
pub fn keyword_hits(item: &DiscussionItem, topic: &str) -> usize {
    let haystack = item.combined_text().to_lowercase();
    topic
        .to_lowercase()
        .split_whitespace()
        .filter(|w| haystack.contains(w))
        .count()
}

pub fn relevance_score(item: &DiscussionItem, topic: &str) -> f64 {
    keyword_hits(item, topic) as f64 + engagement_bonus(item)
}

/// Score every item against `topic`, preserving input order.
pub fn score_items(items: &[DiscussionItem], topic: &str) -> Vec<ScoredItem> {
    items
        .iter()
        .map(|item| ScoredItem {
            relevance_score: relevance_score(item, topic),
            item: item.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Source;
    use proptest::prelude::*;

    fn item(title: &str, text: &str, score: u64, comments: u64) -> DiscussionItem {
        DiscussionItem::new(title, text, score, comments, Source::Reddit)
    }

    #[test]
    fn fitness_scenario_scores_keyword_plus_engagement() {
        let a = item("fitness app needed", "", 50, 10);
        let b = item("unrelated", "", 0, 0);
        assert!((relevance_score(&a, "fitness") - 1.7).abs() < 1e-9);
        assert_eq!(relevance_score(&b, "fitness"), 0.0);
    }

    #[test]
    fn empty_topic_scores_engagement_only() {
        let a = item("anything", "at all", 250, 75);
        assert_eq!(keyword_hits(&a, ""), 0);
        assert!((relevance_score(&a, "") - (2.5 + 1.5)).abs() < 1e-9);
    }

    #[test]
    fn engagement_bonus_is_capped() {
        let a = item("x", "", 10_000, 10_000);
        assert_eq!(engagement_bonus(&a), MAX_SCORE_BONUS + MAX_COMMENTS_BONUS);
    }

    #[test]
    fn topic_words_match_as_substrings_case_insensitively() {
        let a = item("Fitness tracking", "for RUNNERS everywhere", 0, 0);
        // "run" is a substring of "runners".
        assert_eq!(keyword_hits(&a, "FITNESS run swim"), 2);
        // Title and text are joined with a space, so words never straddle the boundary.
        let b = item("fit", "ness", 0, 0);
        assert_eq!(keyword_hits(&b, "fitness"), 0);
    }

    #[test]
    fn score_items_preserves_order() {
        let items = vec![item("b", "", 0, 0), item("a fitness", "", 0, 0)];
        let scored = score_items(&items, "fitness");
        assert_eq!(scored[0].item.title, "b");
        assert_eq!(scored[1].relevance_score, 1.0);
    }

    proptest! {
        #[test]
        fn relevance_score_is_pure_and_non_negative(
            title in ".{0,40}",
            text in ".{0,80}",
            score in 0u64..1_000_000,
            comments in 0u64..1_000_000,
            topic in ".{0,30}",
        ) {
            let it = item(&title, &text, score, comments);
            let a = relevance_score(&it, &topic);
            let b = relevance_score(&it, &topic);
            prop_assert_eq!(a.to_bits(), b.to_bits());
            prop_assert!(a >= 0.0);
        }
    }
}
