//! Keyword frequency trends over a batch of discussions.

use crate::normalize::tokens;
use crate::DiscussionItem;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_KEYWORDS_PER_ITEM: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordTrend {
    pub keyword: String,
    /// Number of items whose top keywords include this one.
    pub frequency: usize,
}

/// Most frequent normalized tokens of `text`, ties broken by first occurrence.
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for t in tokens(text) {
        let c = counts.entry(t.clone()).or_insert(0);
        if *c == 0 {
            order.push(t);
        }
        *c += 1;
    }
    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|k| {
            let n = counts.get(&k).copied().unwrap_or(0);
            (k, n)
        })
        .collect();
    // Stable: equal counts keep first-occurrence order.
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out.truncate(top_n);
    out
}

/// Aggregate per-item top keywords into trends, most frequent first.
pub fn identify_trends(items: &[DiscussionItem], keywords_per_item: usize) -> Vec<KeywordTrend> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in items {
        for (kw, _) in extract_keywords(&item.combined_text(), keywords_per_item) {
            let c = counts.entry(kw.clone()).or_insert(0);
            if *c == 0 {
                order.push(kw);
            }
            *c += 1;
        }
    }
    let mut trends: Vec<KeywordTrend> = order
        .into_iter()
        .map(|keyword| KeywordTrend {
            frequency: counts.get(&keyword).copied().unwrap_or(0),
            keyword,
        })
        .collect();
    trends.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    trends
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Source;

    #[test]
    fn keywords_are_counted_and_ordered() {
        let kws = extract_keywords("gym app gym tracker app gym", 2);
        assert_eq!(kws, vec![("gym".to_string(), 3), ("app".to_string(), 2)]);
    }

    #[test]
    fn trends_count_items_not_occurrences() {
        let items = vec![
            DiscussionItem::new("meal prep", "meal prep meal", 0, 0, Source::Reddit),
            DiscussionItem::new("prep tips", "", 0, 0, Source::Quora),
        ];
        let trends = identify_trends(&items, DEFAULT_KEYWORDS_PER_ITEM);
        assert_eq!(trends[0].keyword, "prep");
        assert_eq!(trends[0].frequency, 2);
        assert!(trends.iter().any(|t| t.keyword == "meal" && t.frequency == 1));
    }

    #[test]
    fn empty_batch_has_no_trends() {
        assert!(identify_trends(&[], DEFAULT_KEYWORDS_PER_ITEM).is_empty());
    }
}
