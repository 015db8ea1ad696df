//! End-to-end run: plan → fetch → score/rank → generate → dedupe, with an optional cache.

use crate::orchestrator::{prioritize, Orchestrator};
use ideapipe_core::dedupe::UniqueSet;
use ideapipe_core::plan::plan_queries;
use ideapipe_core::rank::score_and_rank;
use ideapipe_core::trends::{identify_trends, KeywordTrend, DEFAULT_KEYWORDS_PER_ITEM};
use ideapipe_core::{
    cache_key, DiscussionItem, DiscussionSource, Error, FetchRequest, GeneratedIdeas,
    GenerationMode, IdeaRecord, QueryPlan, Result, ResultCache, ScoredItem, SkippedQuery, Source,
    TrendAnalysis,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

pub const REPORT_SCHEMA_VERSION: u32 = 1;
/// Ranked items kept in the report for display.
pub const REPORT_TOP_ITEMS: usize = 10;
pub const REPORT_KEYWORD_TRENDS: usize = 20;

/// Everything one generation run produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationReport {
    pub schema_version: u32,
    pub topic: String,
    pub mode: GenerationMode,
    pub limit: usize,
    pub plan: QueryPlan,
    pub items_fetched: usize,
    #[serde(default)]
    pub skipped: Vec<SkippedQuery>,
    #[serde(default)]
    pub top_items: Vec<ScoredItem>,
    #[serde(default)]
    pub keyword_trends: Vec<KeywordTrend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_analysis: Option<TrendAnalysis>,
    pub generated: GeneratedIdeas,
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Set on the copy returned from the cache, never on the stored one.
    #[serde(default)]
    pub from_cache: bool,
    #[serde(default)]
    pub elapsed_ms: u64,
}

/// Per-run switches; the knobs live in `PipelineConfig`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub use_cache: bool,
    /// Ask the completion service for the query plan instead of the deterministic one.
    pub llm_planning: bool,
    /// Also run the model-backed trend analysis.
    pub analyze_trends: bool,
}

impl RunOptions {
    /// The switches that change what a run produces; `use_cache` does not.
    fn cache_variant(&self) -> String {
        format!(
            "plan={},trends={}",
            if self.llm_planning { "llm" } else { "static" },
            self.analyze_trends
        )
    }
}

pub struct Pipeline {
    sources: Vec<Arc<dyn DiscussionSource>>,
    orchestrator: Orchestrator,
    cache: Option<Arc<dyn ResultCache>>,
    fetch_timeout_ms: Option<u64>,
}

impl Pipeline {
    pub fn new(sources: Vec<Arc<dyn DiscussionSource>>, orchestrator: Orchestrator) -> Self {
        Self {
            sources,
            orchestrator,
            cache: None,
            fetch_timeout_ms: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_fetch_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.fetch_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Run the whole pipeline for `topic`.
    ///
    /// Only caller mistakes (blank topic, zero limit, invalid config) are errors.
    /// Fetch, completion and cache failures surface as `warnings`.
    pub async fn run(
        &self,
        topic: &str,
        mode: GenerationMode,
        limit: usize,
        opts: RunOptions,
    ) -> Result<GenerationReport> {
        let t0 = Instant::now();
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::InvalidInput("topic must be non-empty".to_string()));
        }
        if limit == 0 {
            return Err(Error::InvalidInput("limit must be >= 1".to_string()));
        }
        let config = self.orchestrator.config().clone();
        config.validate()?;

        let variant = format!("{}|{}", opts.cache_variant(), config.fingerprint());
        let key = cache_key(mode, topic, limit, &variant);
        let mut warnings: Vec<String> = Vec::new();
        if opts.use_cache {
            if let Some(cache) = &self.cache {
                match cache.get(&key) {
                    Ok(Some(v)) => match serde_json::from_value::<GenerationReport>(v) {
                        Ok(mut cached) => {
                            tracing::debug!(%key, "report served from cache");
                            cached.from_cache = true;
                            cached.elapsed_ms = t0.elapsed().as_millis() as u64;
                            return Ok(cached);
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "ignoring undecodable cache entry");
                            warnings.push("cache_entry_invalid".to_string());
                        }
                    },
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "cache read failed");
                        warnings.push("cache_read_failed".to_string());
                    }
                }
            }
        }

        let plan = if opts.llm_planning {
            let p = self.orchestrator.plan_queries_with_llm(topic).await;
            warnings.extend(p.warnings.iter().map(|w| w.to_string()));
            p.value
        } else {
            plan_queries(topic)
        };

        let (items, skipped) = self.fetch_all(topic, &plan, &config, &mut warnings).await;
        let ranked = score_and_rank(&items, topic, config.rank_limit);
        tracing::info!(topic, fetched = items.len(), ranked = ranked.len(), "discussions ranked");

        let generated = match mode {
            GenerationMode::Basic => {
                let out = self.orchestrator.generate_ideas(topic, &ranked, limit).await;
                warnings.extend(out.warnings.iter().map(|w| w.to_string()));
                GeneratedIdeas::Basic(self.dedupe_records(out.value, &mut warnings))
            }
            GenerationMode::Enriched => {
                let out = self
                    .orchestrator
                    .generate_enriched_ideas(topic, &ranked, limit)
                    .await;
                warnings.extend(out.warnings.iter().map(|w| w.to_string()));
                let mut records = self.dedupe_records(out.value, &mut warnings);
                // Dedupe may have dropped a badged record.
                prioritize(&mut records);
                let enriched = self.orchestrator.enrich_market(records).await;
                warnings.extend(enriched.warnings.iter().map(|w| w.to_string()));
                GeneratedIdeas::Enriched(enriched.value)
            }
            GenerationMode::Unique => {
                let (reddit, quora): (Vec<&ScoredItem>, Vec<&ScoredItem>) =
                    ranked.iter().partition(|s| s.item.source == Source::Reddit);
                let reddit: Vec<DiscussionItem> =
                    reddit.into_iter().map(|s| s.item.clone()).collect();
                let quora: Vec<DiscussionItem> =
                    quora.into_iter().map(|s| s.item.clone()).collect();
                let per_source = limit.div_ceil(2).min(config.ideas_per_source).max(1);
                let out = self
                    .orchestrator
                    .generate_unique_ideas(topic, &reddit, &quora, per_source)
                    .await;
                warnings.extend(out.warnings.iter().map(|w| w.to_string()));
                let mut ideas = out.value;
                ideas.truncate(limit);
                GeneratedIdeas::Unique(ideas)
            }
            GenerationMode::Ranked => {
                let out = self.orchestrator.rank_final_ideas(topic, &ranked, limit).await;
                warnings.extend(out.warnings.iter().map(|w| w.to_string()));
                GeneratedIdeas::Ranked(out.value)
            }
        };

        let trend_analysis = if opts.analyze_trends {
            let t = self.orchestrator.analyze_trends(topic, &ranked).await;
            warnings.extend(t.warnings.iter().map(|w| w.to_string()));
            Some(t.value)
        } else {
            None
        };

        let mut keyword_trends = identify_trends(&items, DEFAULT_KEYWORDS_PER_ITEM);
        keyword_trends.truncate(REPORT_KEYWORD_TRENDS);

        let mut report = GenerationReport {
            schema_version: REPORT_SCHEMA_VERSION,
            topic: topic.to_string(),
            mode,
            limit,
            plan,
            items_fetched: items.len(),
            skipped,
            top_items: ranked.into_iter().take(REPORT_TOP_ITEMS).collect(),
            keyword_trends,
            trend_analysis,
            generated,
            warnings,
            from_cache: false,
            elapsed_ms: 0,
        };
        report.elapsed_ms = t0.elapsed().as_millis() as u64;

        if opts.use_cache {
            if let Some(cache) = &self.cache {
                let stored = serde_json::to_value(&report).map_err(|e| Error::Cache(e.to_string()));
                if let Err(e) = stored.and_then(|v| cache.put(&key, &v)) {
                    tracing::warn!(error = %e, "cache write failed");
                    report.warnings.push("cache_write_failed".to_string());
                }
            }
        }
        Ok(report)
    }

    async fn fetch_all(
        &self,
        topic: &str,
        plan: &QueryPlan,
        config: &ideapipe_core::PipelineConfig,
        warnings: &mut Vec<String>,
    ) -> (Vec<DiscussionItem>, Vec<SkippedQuery>) {
        let mut items = Vec::new();
        let mut skipped = Vec::new();
        for src in &self.sources {
            let queries = match src.source() {
                Source::Reddit => plan.subreddits.clone(),
                Source::Quora => plan.quora_queries.clone(),
            };
            if queries.is_empty() {
                continue;
            }
            let req = FetchRequest {
                topic: topic.to_string(),
                queries,
                per_query_limit: config.per_query_limit,
                timeout_ms: self.fetch_timeout_ms,
            };
            match src.fetch(&req).await {
                Ok(out) => {
                    if !out.skipped.is_empty() {
                        warnings.push(format!("{}_queries_skipped", src.name()));
                    }
                    items.extend(out.items);
                    skipped.extend(out.skipped);
                }
                Err(e) => {
                    tracing::warn!(source = src.name(), error = %e, "source failed; continuing without it");
                    warnings.push(format!("{}_unavailable", src.name()));
                }
            }
        }
        if items.is_empty() {
            warnings.push("no_discussions_fetched".to_string());
        }
        (items, skipped)
    }

    /// Drop near-duplicate records by headline. Repeated placeholders and
    /// padding records collapse to one, like any other duplicate.
    fn dedupe_records(
        &self,
        records: Vec<IdeaRecord>,
        warnings: &mut Vec<String>,
    ) -> Vec<IdeaRecord> {
        let config = self.orchestrator.config();
        let mut set = UniqueSet::new(config.similarity_threshold, 0);
        let before = records.len();
        let kept: Vec<IdeaRecord> = records
            .into_iter()
            .filter(|r| set.try_accept(&r.headline()))
            .collect();
        if kept.len() < before {
            warnings.push("duplicate_ideas_dropped".to_string());
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::testing::ScriptedLlm;
    use crate::MemoryCache;
    use ideapipe_core::{FetchOutcome, PipelineConfig};
    use std::time::Duration;

    struct FixedSource {
        source: Source,
        items: Vec<DiscussionItem>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl DiscussionSource for FixedSource {
        fn name(&self) -> &'static str {
            self.source.as_str()
        }

        fn source(&self) -> Source {
            self.source
        }

        async fn fetch(&self, req: &FetchRequest) -> Result<FetchOutcome> {
            if self.fail {
                return Err(Error::Fetch("offline".to_string()));
            }
            assert!(!req.queries.is_empty());
            Ok(FetchOutcome {
                items: self.items.clone(),
                skipped: vec![SkippedQuery {
                    query: "dead".to_string(),
                    reason: "HTTP 404".to_string(),
                }],
            })
        }
    }

    fn sources(fail_quora: bool) -> Vec<Arc<dyn DiscussionSource>> {
        vec![
            Arc::new(FixedSource {
                source: Source::Reddit,
                items: vec![
                    DiscussionItem::new(
                        "Best fitness apps?",
                        "looking for one",
                        0,
                        0,
                        Source::Reddit,
                    ),
                    DiscussionItem::new("Cooking tips", "pasta", 500, 300, Source::Reddit),
                ],
                fail: false,
            }),
            Arc::new(FixedSource {
                source: Source::Quora,
                items: Vec::new(),
                fail: fail_quora,
            }),
        ]
    }

    fn pipeline(llm: &Arc<ScriptedLlm>, fail_quora: bool) -> Pipeline {
        Pipeline::new(
            sources(fail_quora),
            Orchestrator::new(llm.clone(), PipelineConfig::default()),
        )
    }

    #[tokio::test]
    async fn caller_errors_are_rejected() {
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let p = pipeline(&llm, false);
        assert!(matches!(
            p.run("   ", GenerationMode::Basic, 5, RunOptions::default()).await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            p.run("ai", GenerationMode::Basic, 0, RunOptions::default()).await,
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn failures_become_warnings_and_placeholders() {
        let llm = Arc::new(ScriptedLlm::new(vec![Err("down")]));
        let report = pipeline(&llm, true)
            .run("fitness", GenerationMode::Basic, 2, RunOptions::default())
            .await
            .unwrap();
        assert_eq!(report.items_fetched, 2);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.warnings.contains(&"quora_unavailable".to_string()));
        assert!(report.warnings.contains(&"reddit_queries_skipped".to_string()));
        assert!(report.warnings.contains(&"llm_unavailable".to_string()));
        // Identical placeholders collapse to one record.
        let records = report.generated.records().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_placeholder());
        assert!(report.warnings.contains(&"duplicate_ideas_dropped".to_string()));
    }

    #[tokio::test]
    async fn ranking_uses_topic_and_engagement() {
        let llm = Arc::new(ScriptedLlm::new(vec![Ok("[]")]));
        let report = pipeline(&llm, false)
            .run("fitness", GenerationMode::Basic, 1, RunOptions::default())
            .await
            .unwrap();
        // 5.0 + 3.0 engagement beats a single keyword hit.
        assert_eq!(report.top_items[0].item.title, "Cooking tips");
        assert_eq!(report.top_items[0].relevance_score, 8.0);
        assert_eq!(report.top_items[1].relevance_score, 1.0);
    }

    #[tokio::test]
    async fn near_duplicate_records_are_dropped() {
        let reply = r#"[
            {"problem":"Trainers lack clients","solution":"Build a marketplace for local fitness trainers to sell sessions online"},
            {"problem":"Trainers lack clients","solution":"Build a marketplace for local yoga trainers to sell sessions online"},
            {"problem":"Recovery is expensive","solution":"Rent percussion massagers by the week"}
        ]"#;
        let llm = Arc::new(ScriptedLlm::new(vec![Ok(reply)]));
        let report = pipeline(&llm, false)
            .run("fitness", GenerationMode::Basic, 3, RunOptions::default())
            .await
            .unwrap();
        let records = report.generated.records().unwrap();
        assert_eq!(records.len(), 2);
        assert!(report.warnings.contains(&"duplicate_ideas_dropped".to_string()));
    }

    #[tokio::test]
    async fn second_run_is_served_from_cache() {
        let llm = Arc::new(ScriptedLlm::new(vec![Ok(r#"[{"problem":"p","solution":"s"}]"#)]));
        let p = pipeline(&llm, false)
            .with_cache(Arc::new(MemoryCache::new(Duration::from_secs(60))));
        let opts = RunOptions {
            use_cache: true,
            ..Default::default()
        };
        let first = p.run("Fitness", GenerationMode::Basic, 1, opts).await.unwrap();
        let second = p.run("fitness", GenerationMode::Basic, 1, opts).await.unwrap();
        assert_eq!(llm.call_count(), 1);
        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.generated, second.generated);

        // Cache bypass goes back to the service (which is now exhausted).
        let third = p
            .run("fitness", GenerationMode::Basic, 1, RunOptions::default())
            .await
            .unwrap();
        assert!(third.generated.records().unwrap()[0].is_placeholder());
    }

    #[tokio::test]
    async fn cache_does_not_merge_reordered_topics() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok(r#"[{"problem":"Remote teams drift","solution":"Async standup tool"}]"#),
            Ok(r#"[{"problem":"Desks are idle","solution":"Office sublet market"}]"#),
        ]));
        let p = pipeline(&llm, false)
            .with_cache(Arc::new(MemoryCache::new(Duration::from_secs(60))));
        let opts = RunOptions {
            use_cache: true,
            ..Default::default()
        };
        let a = p.run("remote work", GenerationMode::Basic, 1, opts).await.unwrap();
        let b = p.run("work remote", GenerationMode::Basic, 1, opts).await.unwrap();
        assert_eq!(llm.call_count(), 2);
        assert!(!b.from_cache);
        assert_eq!(b.topic, "work remote");
        assert_ne!(a.generated, b.generated);

        let again = p.run("Remote  Work", GenerationMode::Basic, 1, opts).await.unwrap();
        assert!(again.from_cache);
        assert_eq!(again.generated, a.generated);
    }

    #[tokio::test]
    async fn cache_keeps_runs_with_different_switches_apart() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok(r#"[{"problem":"p","solution":"s"}]"#),
            Ok(r#"[{"problem":"p","solution":"s"}]"#),
            Ok(r#"{"market_trends":["home gyms"],"pain_points":[],"opportunities":[],"themes":[]}"#),
        ]));
        let p = pipeline(&llm, false)
            .with_cache(Arc::new(MemoryCache::new(Duration::from_secs(60))));
        let plain = RunOptions {
            use_cache: true,
            ..Default::default()
        };
        let first = p.run("fitness", GenerationMode::Basic, 1, plain).await.unwrap();
        assert!(first.trend_analysis.is_none());

        let analyzed = RunOptions {
            analyze_trends: true,
            ..plain
        };
        let second = p.run("fitness", GenerationMode::Basic, 1, analyzed).await.unwrap();
        assert!(!second.from_cache);
        let trends = second.trend_analysis.expect("trend analysis requested");
        assert_eq!(trends.market_trends, vec!["home gyms".to_string()]);

        let third = p.run("fitness", GenerationMode::Basic, 1, analyzed).await.unwrap();
        assert!(third.from_cache);
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn cache_keeps_runs_with_different_config_apart() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok(r#"[{"problem":"p","solution":"s"}]"#),
            Ok(r#"[{"problem":"q","solution":"t"}]"#),
        ]));
        let cache: Arc<dyn ResultCache> = Arc::new(MemoryCache::new(Duration::from_secs(60)));
        let opts = RunOptions {
            use_cache: true,
            ..Default::default()
        };
        let wide = Pipeline::new(
            sources(false),
            Orchestrator::new(llm.clone(), PipelineConfig::default()),
        )
        .with_cache(cache.clone());
        let narrow = Pipeline::new(
            sources(false),
            Orchestrator::new(
                llm.clone(),
                PipelineConfig {
                    rank_limit: 1,
                    ..Default::default()
                },
            ),
        )
        .with_cache(cache);
        wide.run("fitness", GenerationMode::Basic, 1, opts).await.unwrap();
        let n = narrow.run("fitness", GenerationMode::Basic, 1, opts).await.unwrap();
        assert!(!n.from_cache);
        assert_eq!(n.top_items.len(), 1);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn enriched_badges_survive_dedupe() {
        let reply = r#"[
            {"problem":"Trainers lack clients","solution":"Build a marketplace for local fitness trainers to sell sessions online","novelty":9,"uniqueness":9,"business_value":9,"market_timing":9},
            {"problem":"Trainers lack clients","solution":"Build a marketplace for local yoga trainers to sell sessions online","novelty":9,"uniqueness":9,"business_value":9,"market_timing":8},
            {"problem":"Recovery is expensive","solution":"Rent percussion massagers by the week"}
        ]"#;
        let llm = Arc::new(ScriptedLlm::new(vec![Ok(reply), Err("enrichment down")]));
        let report = pipeline(&llm, false)
            .run("fitness", GenerationMode::Enriched, 3, RunOptions::default())
            .await
            .unwrap();
        let records = report.generated.records().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].solution.contains("fitness trainers"));
        assert_eq!(records[0].winner_badge.as_deref(), Some(ideapipe_core::WINNER_BADGES[0]));
        assert_eq!(records[1].winner_badge.as_deref(), Some(ideapipe_core::WINNER_BADGES[1]));
    }

    #[tokio::test]
    async fn unique_mode_splits_sources_and_respects_limit() {
        let llm = Arc::new(ScriptedLlm::new(vec![Ok(
            "1. Marketplace pairing physiotherapists with weekend football leagues\n\
             2. Subscription service renting smart rowing machines to apartment dwellers",
        )]));
        let report = pipeline(&llm, false)
            .run("fitness", GenerationMode::Unique, 3, RunOptions::default())
            .await
            .unwrap();
        let GeneratedIdeas::Unique(ideas) = &report.generated else {
            panic!("expected unique ideas");
        };
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[0].source, Source::Reddit);
        assert_eq!(ideas[1].source, Source::Reddit);
        assert_eq!(ideas[2].source, Source::Quora);
    }
}
