//! Deterministic text normalization used by scoring, dedupe and keyword trends.

use std::collections::BTreeSet;

pub mod stopwords {
    /// Common English function words; enough to keep keyword trends readable.
    pub const ENGLISH: [&str; 127] = [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
        "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
        "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into",
        "is", "it", "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor",
        "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
        "ourselves", "out", "over", "own", "s", "same", "she", "should", "so", "some", "such",
        "t", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
        "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
        "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
        "why", "will", "with", "would", "you", "your", "yours", "yourself",
    ];

    pub fn is_stopword(w: &str) -> bool {
        ENGLISH.contains(&w)
    }
}

/// Lowercase, whitespace-split tokens that are entirely alphanumeric and not stop-words,
/// in input order (duplicates kept).
pub fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().all(char::is_alphanumeric))
        .filter(|w| !stopwords::is_stopword(w))
        .map(str::to_string)
        .collect()
}

/// Set form of [`tokens`].
pub fn word_set(text: &str) -> BTreeSet<String> {
    tokens(text).into_iter().collect()
}

/// Lowercase whitespace split with no filtering; punctuation stays attached.
pub fn raw_word_set(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
