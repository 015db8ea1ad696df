//! JSON / CSV export of generation reports.

use crate::pipeline::GenerationReport;
use ideapipe_core::trends::KeywordTrend;
use ideapipe_core::{DiscussionItem, Error, GeneratedIdeas, Result, Source, TrendAnalysis};
use serde::{Deserialize, Serialize};

pub const SUMMARY_TOP_N: usize = 10;

pub fn to_json(report: &GenerationReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| Error::Export(e.to_string()))
}

/// One CSV row per idea; columns that a mode does not produce stay empty.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rank: usize,
    problem: &'a str,
    solution: &'a str,
    target_market: &'a str,
    differentiator: &'a str,
    novelty: Option<f64>,
    uniqueness: Option<f64>,
    business_value: Option<f64>,
    tam: &'a str,
    cagr: &'a str,
    source: &'a str,
}

impl<'a> CsvRow<'a> {
    fn bare(rank: usize, solution: &'a str) -> Self {
        Self {
            rank,
            problem: "",
            solution,
            target_market: "",
            differentiator: "",
            novelty: None,
            uniqueness: None,
            business_value: None,
            tam: "",
            cagr: "",
            source: "",
        }
    }
}

pub fn to_csv(ideas: &GeneratedIdeas) -> Result<String> {
    let mut rows: Vec<CsvRow<'_>> = Vec::new();
    match ideas {
        GeneratedIdeas::Basic(records) | GeneratedIdeas::Enriched(records) => {
            for (i, r) in records.iter().enumerate() {
                let market = r.market_analysis.as_ref();
                rows.push(CsvRow {
                    problem: &r.problem,
                    target_market: &r.target_market,
                    differentiator: r
                        .differentiator
                        .as_deref()
                        .or(r.competitive_landscape.as_ref().map(|c| c.differentiator.as_str()))
                        .unwrap_or(""),
                    novelty: r.novelty,
                    uniqueness: r.uniqueness,
                    business_value: r.business_value,
                    tam: market.map(|m| m.tam.as_str()).unwrap_or(""),
                    cagr: market.map(|m| m.cagr.as_str()).unwrap_or(""),
                    source: r.source.map(Source::as_str).unwrap_or(""),
                    ..CsvRow::bare(i + 1, &r.solution)
                });
            }
        }
        GeneratedIdeas::Unique(candidates) => {
            for (i, c) in candidates.iter().enumerate() {
                rows.push(CsvRow {
                    source: c.source.as_str(),
                    ..CsvRow::bare(i + 1, &c.text)
                });
            }
        }
        GeneratedIdeas::Ranked(ranked) => {
            for r in ranked {
                rows.push(CsvRow {
                    problem: &r.problem,
                    target_market: &r.market,
                    ..CsvRow::bare(r.rank as usize, &r.solution)
                });
            }
        }
    }

    let mut w = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        // Header-only output for an empty run.
        w.write_record([
            "rank",
            "problem",
            "solution",
            "target_market",
            "differentiator",
            "novelty",
            "uniqueness",
            "business_value",
            "tam",
            "cagr",
            "source",
        ])
        .map_err(|e| Error::Export(e.to_string()))?;
    }
    for row in &rows {
        w.serialize(row).map_err(|e| Error::Export(e.to_string()))?;
    }
    let bytes = w.into_inner().map_err(|e| Error::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopPost {
    pub title: String,
    pub score: u64,
    pub source: Source,
}

/// Headline numbers of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportSummary {
    pub generated_at_epoch_s: u64,
    pub posts_analyzed: usize,
    pub trending_topics: Vec<String>,
    pub top_posts: Vec<TopPost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_analysis: Option<TrendAnalysis>,
}

pub fn export_summary(
    items: &[DiscussionItem],
    trends: &[KeywordTrend],
    deep_analysis: Option<TrendAnalysis>,
) -> ExportSummary {
    let mut by_score: Vec<&DiscussionItem> = items.iter().collect();
    by_score.sort_by(|a, b| b.score.cmp(&a.score));
    ExportSummary {
        generated_at_epoch_s: crate::now_epoch_s(),
        posts_analyzed: items.len(),
        trending_topics: trends
            .iter()
            .take(SUMMARY_TOP_N)
            .map(|t| t.keyword.clone())
            .collect(),
        top_posts: by_score
            .into_iter()
            .take(SUMMARY_TOP_N)
            .map(|i| TopPost {
                title: i.title.clone(),
                score: i.score,
                source: i.source,
            })
            .collect(),
        deep_analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideapipe_core::{IdeaCandidate, IdeaRecord, MarketAnalysis, RankedIdea};

    #[test]
    fn csv_has_fixed_columns_and_quotes_commas() {
        let ideas = GeneratedIdeas::Enriched(vec![IdeaRecord {
            problem: "Gyms are crowded, expensive".into(),
            solution: "Home pods".into(),
            target_market: "Renters".into(),
            novelty: Some(8.0),
            market_analysis: Some(MarketAnalysis {
                tam: "$30B".into(),
                cagr: "12%".into(),
                ..Default::default()
            }),
            ..Default::default()
        }]);
        let csv = to_csv(&ideas).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "rank,problem,solution,target_market,differentiator,novelty,uniqueness,business_value,tam,cagr,source"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,\"Gyms are crowded, expensive\",Home pods,Renters,,8.0,,,$30B,12%,"
        );
    }

    #[test]
    fn unique_and_ranked_modes_flatten_too() {
        let unique = GeneratedIdeas::Unique(vec![IdeaCandidate {
            text: "Idea text".into(),
            source: Source::Quora,
        }]);
        assert!(to_csv(&unique).unwrap().contains("1,,Idea text,,,,,,,,quora"));

        let ranked = GeneratedIdeas::Ranked(vec![RankedIdea {
            rank: 3,
            problem: "p".into(),
            solution: "s".into(),
            market: "m".into(),
            ..Default::default()
        }]);
        assert!(to_csv(&ranked).unwrap().contains("3,p,s,m,"));
    }

    #[test]
    fn empty_ideas_still_write_a_header() {
        let csv = to_csv(&GeneratedIdeas::Basic(Vec::new())).unwrap();
        assert!(csv.starts_with("rank,problem"));
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn summary_takes_top_posts_by_score() {
        let items: Vec<DiscussionItem> = (0..15)
            .map(|i| DiscussionItem::new(format!("post {i}"), "", i, 0, Source::Reddit))
            .collect();
        let trends = vec![KeywordTrend {
            keyword: "gym".into(),
            frequency: 3,
        }];
        let s = export_summary(&items, &trends, None);
        assert_eq!(s.posts_analyzed, 15);
        assert_eq!(s.top_posts.len(), SUMMARY_TOP_N);
        assert_eq!(s.top_posts[0].score, 14);
        assert_eq!(s.trending_topics, vec!["gym"]);
    }
}
