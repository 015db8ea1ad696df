use crate::dedupe::{DEFAULT_MIN_IDEA_CHARS, DEFAULT_SIMILARITY_THRESHOLD};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Single configuration surface for scoring, generation and dedupe knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// How many scored items survive ranking.
    pub rank_limit: usize,
    /// How many ranked items are embedded in a generation prompt.
    pub context_items: usize,
    /// Per-item character budget inside prompts.
    pub item_char_budget: usize,
    pub similarity_threshold: f64,
    /// Ideas must be strictly longer than this (trimmed chars).
    pub min_idea_chars: usize,
    /// Target idea count per source in the unique mode.
    pub ideas_per_source: usize,
    /// Upper bound on passes over the content list in the unique mode.
    pub max_generation_attempts: usize,
    /// Posts fetched per subreddit / Quora query.
    pub per_query_limit: usize,
    pub temperature: f64,
    pub retry_temperature: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rank_limit: 100,
            context_items: 50,
            item_char_budget: 400,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_idea_chars: DEFAULT_MIN_IDEA_CHARS,
            ideas_per_source: 10,
            max_generation_attempts: 20,
            per_query_limit: 10,
            temperature: 0.7,
            retry_temperature: 0.5,
        }
    }
}

impl PipelineConfig {
    /// Canonical text of every knob, for cache keys.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.rank_limit == 0 || self.context_items == 0 {
            return Err(Error::InvalidInput(
                "rank_limit and context_items must be > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::InvalidInput(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature)
            || !(0.0..=2.0).contains(&self.retry_temperature)
        {
            return Err(Error::InvalidInput(
                "temperatures must be within [0, 2]".to_string(),
            ));
        }
        Ok(())
    }
}
