//! Deterministic query planning and topic-category constraints.

use serde::{Deserialize, Serialize};

/// Where to look for discussions about a topic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryPlan {
    #[serde(default)]
    pub subreddits: Vec<String>,
    #[serde(default)]
    pub quora_queries: Vec<String>,
}

impl QueryPlan {
    /// Cap both lists and drop blanks and case-insensitive duplicates (first wins).
    pub fn bounded(mut self, max_each: usize) -> Self {
        self.subreddits = dedupe_case_insensitive(self.subreddits, max_each);
        self.quora_queries = dedupe_case_insensitive(self.quora_queries, max_each);
        self
    }
}

fn dedupe_case_insensitive(v: Vec<String>, max: usize) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    v.into_iter()
        .map(|s| s.trim().trim_start_matches("r/").to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_ascii_lowercase()))
        .take(max)
        .collect()
}

/// Startup communities that are worth scanning for any topic.
pub const BASE_SUBREDDITS: [&str; 15] = [
    "YCombinator",
    "startups",
    "Entrepreneur",
    "business",
    "SideProject",
    "indiehackers",
    "smallbusiness",
    "BusinessIdeas",
    "investing",
    "technology",
    "artificial",
    "MachineLearning",
    "marketing",
    "ecommerce",
    "cryptocurrency",
];

const TOPIC_SUBREDDITS: [(&[&str], &[&str]); 5] = [
    (
        &["ai", "artificial", "machine", "tech"],
        &["artificial", "MachineLearning", "technology", "SaaS", "indiehackers"],
    ),
    (
        &["fitness", "health", "wellness"],
        &["fitness", "health", "nutrition", "bodyweightfitness", "loseit"],
    ),
    (
        &["sustainable", "eco", "green", "environment"],
        &["ZeroWaste", "sustainability", "environment", "renewable", "climatechange"],
    ),
    (
        &["finance", "money", "fintech"],
        &["investing", "SecurityAnalysis", "financialindependence", "personalfinance"],
    ),
    (
        &["education", "learning", "course"],
        &["OnlineEducation", "GetStudying", "studytips", "teachers"],
    ),
];

const DEFAULT_TOPIC_SUBREDDITS: [&str; 4] =
    ["innovation", "smallbusiness", "growmybusiness", "BusinessIdeas"];

/// Topic-specific subreddits: the first category whose trigger words occur in the topic.
pub fn topic_subreddits(topic: &str) -> Vec<String> {
    let t = topic.to_lowercase();
    TOPIC_SUBREDDITS
        .iter()
        .find(|(triggers, _)| triggers.iter().any(|w| t.contains(*w)))
        .map(|(_, subs)| subs.to_vec())
        .unwrap_or_else(|| DEFAULT_TOPIC_SUBREDDITS.to_vec())
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn quora_queries(topic: &str) -> Vec<String> {
    let t = topic.trim();
    vec![
        format!("Y Combinator {t} startup ideas"),
        format!("successful {t} business models"),
        format!("best {t} business ideas"),
        format!("profitable {t} niches"),
        format!("unicorn {t} startups"),
        format!("bootstrapped {t} businesses"),
        format!("{t} market opportunities"),
        format!("{t} SaaS business"),
        format!("{t} AI applications"),
        format!("{t} fintech solutions"),
    ]
}

/// Deterministic plan: base subreddits followed by topic subreddits (duplicates removed),
/// plus templated Quora queries.
pub fn plan_queries(topic: &str) -> QueryPlan {
    let mut subreddits: Vec<String> = BASE_SUBREDDITS.iter().map(|s| s.to_string()).collect();
    subreddits.extend(topic_subreddits(topic));
    QueryPlan {
        subreddits,
        quora_queries: quora_queries(topic),
    }
    .bounded(usize::MAX)
}

/// Domain focus and market-size ranges used to steer enriched generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryConstraints {
    pub category: String,
    pub domains: Vec<String>,
    pub exclude: Vec<String>,
    /// Total addressable market range, in billions of USD.
    pub tam_billion_usd: (u32, u32),
    /// Compound annual growth rate range, in percent.
    pub cagr_percent: (u32, u32),
}

impl CategoryConstraints {
    fn new(
        category: &str,
        domains: &[&str],
        exclude: &[&str],
        tam: (u32, u32),
        cagr: (u32, u32),
    ) -> Self {
        Self {
            category: category.to_string(),
            domains: domains.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            tam_billion_usd: tam,
            cagr_percent: cagr,
        }
    }

    /// Market analysis filled from the category ranges (used when the model omits one).
    pub fn market_analysis(&self, topic: &str) -> crate::MarketAnalysis {
        let (tam_lo, tam_hi) = self.tam_billion_usd;
        let (cagr_lo, cagr_hi) = self.cagr_percent;
        crate::MarketAnalysis {
            tam: format!("${tam_lo}B-${tam_hi}B ({} market)", topic.trim()),
            cagr: format!("{cagr_lo}-{cagr_hi}% (2024-2029)"),
            source: Some(format!("{} category estimate", self.category)),
            market_trends: Vec::new(),
        }
    }
}

pub fn category_constraints(topic: &str) -> CategoryConstraints {
    let t = topic.to_lowercase();
    if t.contains("sustainable") {
        CategoryConstraints::new(
            "sustainable",
            &[
                "renewable energy",
                "circular economy",
                "eco-products",
                "sustainable agriculture",
                "green transportation",
                "waste reduction",
            ],
            &["fast food", "crypto", "retail (unless eco-focused)", "gaming"],
            (50, 500),
            (8, 25),
        )
    } else if t.contains("fitness") {
        CategoryConstraints::new(
            "fitness",
            &[
                "wearables",
                "training platforms",
                "connected equipment",
                "nutrition tech",
                "recovery solutions",
            ],
            &["unrelated apps", "generic software", "non-health retail"],
            (30, 200),
            (12, 30),
        )
    } else if t.contains("remote work") {
        CategoryConstraints::new(
            "remote work",
            &[
                "collaboration tools",
                "productivity software",
                "virtual office",
                "team management",
                "digital nomad services",
            ],
            &["physical products", "location-based services"],
            (40, 300),
            (15, 35),
        )
    } else if t.contains("ai") {
        CategoryConstraints::new(
            "ai",
            &[
                "automation tools",
                "data analytics",
                "machine learning platforms",
                "AI assistants",
                "computer vision",
            ],
            &["generic software", "simple apps"],
            (100, 800),
            (20, 45),
        )
    } else {
        CategoryConstraints::new(
            "general",
            &["technology", "services", "platforms"],
            &["generic ideas"],
            (20, 400),
            (10, 30),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitness_topic_adds_fitness_communities_after_base() {
        let p = plan_queries("home fitness");
        assert_eq!(p.subreddits[0], "YCombinator");
        assert!(p.subreddits.contains(&"bodyweightfitness".to_string()));
        assert_eq!(p.quora_queries.len(), 10);
        assert!(p.quora_queries[0].contains("home fitness"));
    }

    #[test]
    fn plan_has_no_case_insensitive_duplicates() {
        // "artificial" and "MachineLearning" are in both the base and the ai lists.
        let p = plan_queries("ai tools");
        let mut lower: Vec<String> = p.subreddits.iter().map(|s| s.to_lowercase()).collect();
        let n = lower.len();
        lower.sort();
        lower.dedup();
        assert_eq!(lower.len(), n);
    }

    #[test]
    fn unknown_topic_uses_default_communities() {
        assert_eq!(topic_subreddits("pottery")[0], "innovation");
    }

    #[test]
    fn bounded_strips_prefix_and_caps() {
        let p = QueryPlan {
            subreddits: vec!["r/startups".into(), "Startups".into(), " ".into(), "a".into()],
            quora_queries: vec!["q".into(); 3],
        }
        .bounded(2);
        assert_eq!(p.subreddits, vec!["startups", "a"]);
        assert_eq!(p.quora_queries, vec!["q"]);
    }

    #[test]
    fn category_constraints_match_first_category_and_fill_market_ranges() {
        let c = category_constraints("Remote Work tools");
        assert_eq!(c.category, "remote work");
        let m = c.market_analysis("remote work");
        assert_eq!(m.tam, "$40B-$300B (remote work market)");
        assert_eq!(m.cagr, "15-35% (2024-2029)");
        assert_eq!(category_constraints("knitting").category, "general");
    }
}
