use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod config;
pub mod dedupe;
pub mod normalize;
pub mod parse;
pub mod plan;
pub mod rank;
pub mod score;
pub mod trends;

pub use config::PipelineConfig;
pub use plan::{CategoryConstraints, QueryPlan};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("cache error: {0}")]
    Cache(String),
    #[error("llm failed: {0}")]
    Llm(String),
    #[error("parse failed: {0}")]
    Parse(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
    #[error("export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Where a discussion item (or an idea derived from it) came from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Reddit,
    Quora,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reddit => "reddit",
            Self::Quora => "quora",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fetched post/question with engagement metadata.
///
/// Missing fields deserialize as empty strings / zero so partially-populated
/// provider payloads never fail the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiscussionItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub source: Source,
    /// Permalink, when the provider exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Subreddit name or the Quora search query that produced this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_utc: Option<u64>,
}

impl DiscussionItem {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        score: u64,
        num_comments: u64,
        source: Source,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            score,
            num_comments,
            source,
            ..Default::default()
        }
    }

    /// `title` and `text` joined by a single space (not lowercased).
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.text)
    }
}

/// A discussion item plus its relevance for one topic query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: DiscussionItem,
    pub relevance_score: f64,
}

/// A short free-text idea produced by the per-source generation mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdeaCandidate {
    #[serde(rename = "idea")]
    pub text: String,
    pub source: Source,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Validation {
    #[serde(default)]
    pub target_users: String,
    #[serde(default)]
    pub entry_barrier: String,
    #[serde(default)]
    pub monetization: String,
    #[serde(default)]
    pub risks: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketAnalysis {
    #[serde(default)]
    pub tam: String,
    #[serde(default)]
    pub cagr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub market_trends: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompetitiveLandscape {
    #[serde(default)]
    pub differentiator: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub direct_competitors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indirect_competitors: Vec<String>,
}

/// Priority bucket of an enriched idea, derived from its mean score unless the model set one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Experimental,
    Medium,
    High,
}

impl PriorityTier {
    /// `>= 8` is high, `>= 6` medium, anything lower experimental.
    pub fn from_score(avg: f64) -> Self {
        if avg >= 8.0 {
            Self::High
        } else if avg >= 6.0 {
            Self::Medium
        } else {
            Self::Experimental
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Experimental => "experimental",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for PriorityTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "experimental" | "low" => Ok(Self::Experimental),
            other => Err(Error::Parse(format!("unknown priority tier {other:?}"))),
        }
    }
}

/// Model-supplied tiers come in any case or shape; anything unrecognized reads as absent.
fn lenient_tier<'de, D>(d: D) -> std::result::Result<Option<PriorityTier>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok()))
}

/// Badges for the first three enriched ideas after prioritization.
pub const WINNER_BADGES: [&str; 3] = ["🏆 TOP PICK", "🥈 RUNNER-UP", "🥉 STRONG CONTENDER"];

/// Structured idea record (basic and enriched generation modes).
///
/// Every field is optional on the wire: models routinely omit keys, and a
/// missing key must not turn an otherwise usable response into a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IdeaRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idea: Option<String>,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub target_market: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub differentiator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub novelty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniqueness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_timing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mvp_suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_to_market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partnerships: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_tier",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority_tier: Option<PriorityTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_badge: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_analysis: Option<MarketAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_landscape: Option<CompetitiveLandscape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

/// Problem field of the degraded-service placeholder.
pub const SERVICE_UNAVAILABLE: &str = "Service Temporarily Unavailable";

impl IdeaRecord {
    /// Fixed-shape record substituted when the completion service is unusable.
    pub fn service_unavailable() -> Self {
        Self {
            problem: SERVICE_UNAVAILABLE.to_string(),
            solution: "We're experiencing technical difficulties".to_string(),
            target_market: "Please try again later".to_string(),
            features: vec!["Service will be restored shortly".to_string()],
            ..Default::default()
        }
    }

    /// Filler used when the model returns fewer records than requested.
    pub fn pending(index: usize) -> Self {
        Self {
            problem: "Additional opportunity identified".to_string(),
            solution: "Analysis in progress".to_string(),
            target_market: "Market research ongoing".to_string(),
            features: vec![format!("Feature analysis pending (#{index})")],
            ..Default::default()
        }
    }

    /// Record built from one plain line of a simplified retry response.
    pub fn from_plain_line(index: usize, line: &str) -> Self {
        Self {
            problem: format!("Trend Analysis #{index}"),
            solution: line.trim().to_string(),
            target_market: "Market analysis in progress".to_string(),
            features: vec!["Detailed features coming soon".to_string()],
            ..Default::default()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.problem == SERVICE_UNAVAILABLE
    }

    /// Mean of the scores the record carries (novelty, uniqueness, business value,
    /// market timing); `None` when it has none.
    pub fn avg_score(&self) -> Option<f64> {
        let scores: Vec<f64> = [
            self.novelty,
            self.uniqueness,
            self.business_value,
            self.market_timing,
        ]
        .into_iter()
        .flatten()
        .collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    /// `problem: solution`, the one-line form used for display and enrichment prompts.
    pub fn headline(&self) -> String {
        match &self.idea {
            Some(s) if !s.trim().is_empty() => s.clone(),
            _ => format!("{}: {}", self.problem, self.solution),
        }
    }
}

/// One entry of the ranked-ideas generation mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RankedIdea {
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub potential: String,
    #[serde(default)]
    pub source_insight: String,
}

/// Deep trend analysis over a batch of discussions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrendAnalysis {
    #[serde(default)]
    pub market_trends: Vec<String>,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
}

impl TrendAnalysis {
    pub fn pending() -> Self {
        Self {
            market_trends: vec!["Currently analyzing market trends...".to_string()],
            pain_points: vec!["Processing user feedback...".to_string()],
            opportunities: vec!["Identifying business opportunities...".to_string()],
            themes: vec!["Extracting common themes...".to_string()],
        }
    }

    pub fn unavailable() -> Self {
        Self {
            market_trends: vec!["Analysis temporarily unavailable".to_string()],
            pain_points: vec!["Service disruption".to_string()],
            opportunities: vec!["Please try again later".to_string()],
            themes: vec!["System recovery in progress".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Basic,
    Enriched,
    Unique,
    Ranked,
}

impl GenerationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Enriched => "enriched",
            Self::Unique => "unique",
            Self::Ranked => "ranked",
        }
    }
}

impl FromStr for GenerationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "enriched" => Ok(Self::Enriched),
            "unique" => Ok(Self::Unique),
            "ranked" => Ok(Self::Ranked),
            other => Err(Error::InvalidInput(format!(
                "unknown generation mode {other:?} (allowed: basic, enriched, unique, ranked)"
            ))),
        }
    }
}

/// Ideas produced by one generation run; the shape depends on the mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", content = "ideas", rename_all = "lowercase")]
pub enum GeneratedIdeas {
    Basic(Vec<IdeaRecord>),
    Enriched(Vec<IdeaRecord>),
    Unique(Vec<IdeaCandidate>),
    Ranked(Vec<RankedIdea>),
}

impl GeneratedIdeas {
    pub fn len(&self) -> usize {
        match self {
            Self::Basic(v) | Self::Enriched(v) => v.len(),
            Self::Unique(v) => v.len(),
            Self::Ranked(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn mode(&self) -> GenerationMode {
        match self {
            Self::Basic(_) => GenerationMode::Basic,
            Self::Enriched(_) => GenerationMode::Enriched,
            Self::Unique(_) => GenerationMode::Unique,
            Self::Ranked(_) => GenerationMode::Ranked,
        }
    }

    /// Structured records, if this mode produces them.
    pub fn records(&self) -> Option<&[IdeaRecord]> {
        match self {
            Self::Basic(v) | Self::Enriched(v) => Some(v),
            _ => None,
        }
    }
}

/// What a caller asks a discussion source for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    pub topic: String,
    /// Subreddit names or search queries, depending on the source.
    pub queries: Vec<String>,
    pub per_query_limit: usize,
    /// Timeout for each underlying request.
    pub timeout_ms: Option<u64>,
}

/// A query a source gave up on; the batch continues without it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedQuery {
    pub query: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub items: Vec<DiscussionItem>,
    pub skipped: Vec<SkippedQuery>,
}

#[async_trait::async_trait]
pub trait DiscussionSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn source(&self) -> Source;
    async fn fetch(&self, req: &FetchRequest) -> Result<FetchOutcome>;
}

/// Opaque text-completion service (OpenAI-compatible chat endpoint or a test double).
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    fn name(&self) -> &str;
    async fn complete(&self, system_prompt: &str, user_prompt: &str, temperature: f64)
        -> Result<String>;
}

/// Key/value store with an implementation-defined TTL.
///
/// Purely a performance optimization: a miss, an expired entry and a disabled
/// cache all look the same (`Ok(None)`).
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;
    fn put(&self, key: &str, value: &serde_json::Value) -> Result<()>;
}

/// Stable cache key for one generation request.
///
/// The topic is lowercased with whitespace collapsed; word order and repeated
/// words are kept since prompts, queries and keyword hits depend on them.
/// `variant` carries everything else that shapes the output (run switches,
/// config fingerprint).
pub fn cache_key(mode: GenerationMode, topic: &str, limit: usize, variant: &str) -> String {
    let topic = topic
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    format!("v2|{}|{}|{}|{}", mode.as_str(), limit, variant, topic)
}
