//! Word-overlap duplicate detection for generated ideas.
//!
//! Cheap and embedding-free: two texts are near duplicates when they share more
//! than `threshold` of the larger word set. The first accepted text wins; later
//! near duplicates are dropped without error.

use crate::normalize::raw_word_set;
use std::collections::BTreeSet;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_MIN_IDEA_CHARS: usize = 30;

/// `|A ∩ B| / max(|A|, |B|)` over raw lowercase word sets.
///
/// Two empty sets are identical (1.0).
pub fn overlap_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let denom = a.len().max(b.len());
    if denom == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / denom as f64
}

pub fn text_similarity(a: &str, b: &str) -> f64 {
    overlap_similarity(&raw_word_set(a), &raw_word_set(b))
}

/// True when `candidate` overlaps no accepted text by more than `threshold`.
pub fn is_unique<S: AsRef<str>>(candidate: &str, accepted: &[S], threshold: f64) -> bool {
    if accepted.is_empty() {
        return true;
    }
    let cand = raw_word_set(candidate);
    accepted
        .iter()
        .all(|a| overlap_similarity(&cand, &raw_word_set(a.as_ref())) <= threshold)
}

/// Minimum-length gate applied before the uniqueness check.
pub fn passes_length_gate(candidate: &str, min_chars: usize) -> bool {
    candidate.trim().chars().count() > min_chars
}

/// Strip leading list markers ("1.", "-", "•", digits, spaces) from a model output line.
pub fn strip_list_marker(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | '•' | ' '))
}

/// Incrementally accepted texts for one generation batch.
#[derive(Debug, Clone)]
pub struct UniqueSet {
    threshold: f64,
    min_chars: usize,
    accepted: Vec<String>,
    words: Vec<BTreeSet<String>>,
}

impl Default for UniqueSet {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_MIN_IDEA_CHARS)
    }
}

impl UniqueSet {
    pub fn new(threshold: f64, min_chars: usize) -> Self {
        Self {
            threshold,
            min_chars,
            accepted: Vec::new(),
            words: Vec::new(),
        }
    }

    /// Accept `text` (trimmed) if it passes the length gate and is unique so far.
    pub fn try_accept(&mut self, text: &str) -> bool {
        let text = text.trim();
        if !passes_length_gate(text, self.min_chars) {
            tracing::debug!(chars = text.chars().count(), "idea rejected by length gate");
            return false;
        }
        let cand = raw_word_set(text);
        if self
            .words
            .iter()
            .any(|w| overlap_similarity(&cand, w) > self.threshold)
        {
            tracing::debug!("idea rejected as near duplicate");
            return false;
        }
        self.accepted.push(text.to_string());
        self.words.push(cand);
        true
    }

    pub fn accepted(&self) -> &[String] {
        &self.accepted
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    pub fn into_accepted(self) -> Vec<String> {
        self.accepted
    }
}

/// Order-preserving filter: keep texts that pass the gate and are unique against
/// everything kept before them.
pub fn dedupe_texts<I, S>(texts: I, threshold: f64, min_chars: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = UniqueSet::new(threshold, min_chars);
    for t in texts {
        set.try_accept(t.as_ref());
    }
    set.into_accepted()
}
