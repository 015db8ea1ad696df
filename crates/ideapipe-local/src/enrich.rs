//! Batch market enrichment of generated ideas.

use crate::orchestrator::{Completed, Orchestrator};
use ideapipe_core::parse::slice_json_object;
use ideapipe_core::{CompetitiveLandscape, IdeaRecord, MarketAnalysis};
use serde::{Deserialize, Serialize};

const ENRICHMENT_TEMPERATURE: f64 = 0.3;
pub const ANALYSIS_FAILED: &str = "Analysis Failed";

#[derive(Debug, Default, Deserialize)]
struct EnrichmentResponse {
    #[serde(default)]
    enriched_ideas: Vec<EnrichmentEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct EnrichmentEntry {
    #[serde(default)]
    market_analysis: Option<MarketAnalysis>,
    #[serde(default)]
    competitive_landscape: Option<CompetitiveLandscape>,
}

#[derive(Debug, Serialize)]
struct IdeaBrief<'a> {
    idea: String,
    problem: &'a str,
    solution: &'a str,
    target_market: &'a str,
}

impl Orchestrator {
    /// Merge model-estimated market size and competition into `ideas`, by position.
    ///
    /// Malformed JSON marks every idea as "Analysis Failed"; a service error or a
    /// reply with no JSON object leaves the ideas untouched.
    pub async fn enrich_market(&self, mut ideas: Vec<IdeaRecord>) -> Completed<Vec<IdeaRecord>> {
        if ideas.iter().all(IdeaRecord::is_placeholder) {
            return Completed {
                value: ideas,
                warnings: Vec::new(),
            };
        }
        let briefs: Vec<IdeaBrief<'_>> = ideas
            .iter()
            .map(|r| IdeaBrief {
                idea: r.headline(),
                problem: &r.problem,
                solution: &r.solution,
                target_market: &r.target_market,
            })
            .collect();
        let listing = serde_json::to_string_pretty(&briefs).unwrap_or_default();
        let system = "You are a YC-tier startup analyst. For each business idea provided, enrich it with essential market intelligence.\n\
Return ONLY a valid JSON object with a single key \"enriched_ideas\", a list with one object per original idea, in the same order.\n\
Each object must have this exact structure:\n\
{\"original_idea\": \"...\", \"market_analysis\": {\"tam\": \"...\", \"cagr\": \"...\", \"market_trends\": [\"...\"]}, \
\"competitive_landscape\": {\"differentiator\": \"...\", \"direct_competitors\": [\"...\"], \"indirect_competitors\": [\"...\"]}}";
        let user = format!(
            "Analyze these business ideas and provide comprehensive market intelligence for each:\n{listing}"
        );

        let raw = match self.complete(system, &user, ENRICHMENT_TEMPERATURE).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "market enrichment failed");
                return Completed {
                    value: ideas,
                    warnings: vec!["market_enrichment_failed"],
                };
            }
        };
        let Some(obj) = slice_json_object(&raw) else {
            return Completed {
                value: ideas,
                warnings: vec!["market_enrichment_unparsed"],
            };
        };
        match serde_json::from_str::<EnrichmentResponse>(obj) {
            Ok(resp) => {
                for (idea, entry) in ideas.iter_mut().zip(resp.enriched_ideas) {
                    if entry.market_analysis.is_some() {
                        idea.market_analysis = entry.market_analysis;
                    }
                    if entry.competitive_landscape.is_some() {
                        idea.competitive_landscape = entry.competitive_landscape;
                    }
                }
                Completed {
                    value: ideas,
                    warnings: Vec::new(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "malformed market enrichment");
                for idea in &mut ideas {
                    idea.market_analysis = Some(MarketAnalysis {
                        tam: ANALYSIS_FAILED.to_string(),
                        cagr: "N/A".to_string(),
                        ..Default::default()
                    });
                    idea.competitive_landscape = Some(CompetitiveLandscape {
                        differentiator: ANALYSIS_FAILED.to_string(),
                        ..Default::default()
                    });
                }
                Completed {
                    value: ideas,
                    warnings: vec!["market_enrichment_malformed"],
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::orchestrator::testing::ScriptedLlm;
    use crate::orchestrator::Orchestrator;
    use ideapipe_core::{IdeaRecord, PipelineConfig};
    use std::sync::Arc;

    fn ideas() -> Vec<IdeaRecord> {
        ["a", "b"]
            .iter()
            .map(|p| IdeaRecord {
                problem: p.to_string(),
                solution: format!("{p} solution"),
                ..Default::default()
            })
            .collect()
    }

    fn orch(llm: &Arc<ScriptedLlm>) -> Orchestrator {
        Orchestrator::new(llm.clone(), PipelineConfig::default())
    }

    #[tokio::test]
    async fn merges_by_position_and_tolerates_short_lists() {
        let reply = r#"{"enriched_ideas": [
            {"original_idea": "a", "market_analysis": {"tam": "$5B", "cagr": "12%"},
             "competitive_landscape": {"differentiator": "local first", "direct_competitors": ["X"]}}
        ]}"#;
        let llm = Arc::new(ScriptedLlm::new(vec![Ok(reply)]));
        let out = orch(&llm).enrich_market(ideas()).await;
        assert!(out.warnings.is_empty());
        assert_eq!(out.value[0].market_analysis.as_ref().unwrap().tam, "$5B");
        assert_eq!(
            out.value[0].competitive_landscape.as_ref().unwrap().direct_competitors,
            vec!["X"]
        );
        assert!(out.value[1].market_analysis.is_none());

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls[0].2, 0.3);
        assert!(calls[0].1.contains("a: a solution"));
    }

    #[tokio::test]
    async fn malformed_json_marks_every_idea_failed() {
        let llm = Arc::new(ScriptedLlm::new(vec![Ok("{\"enriched_ideas\": [oops]}")]));
        let out = orch(&llm).enrich_market(ideas()).await;
        assert!(out
            .value
            .iter()
            .all(|r| r.market_analysis.as_ref().unwrap().tam == super::ANALYSIS_FAILED));
        assert_eq!(out.warnings, vec!["market_enrichment_malformed"]);
    }

    #[tokio::test]
    async fn service_error_leaves_ideas_unchanged() {
        let llm = Arc::new(ScriptedLlm::new(vec![Err("boom")]));
        let out = orch(&llm).enrich_market(ideas()).await;
        assert_eq!(out.value, ideas());
        assert_eq!(out.warnings, vec!["market_enrichment_failed"]);
    }

    #[tokio::test]
    async fn placeholders_are_not_sent() {
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let out = orch(&llm)
            .enrich_market(vec![IdeaRecord::service_unavailable()])
            .await;
        assert_eq!(llm.call_count(), 0);
        assert_eq!(out.value.len(), 1);
    }
}
