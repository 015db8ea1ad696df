use html_scraper::{Html, Selector};
use ideapipe_core::{
    DiscussionItem, DiscussionSource, Error, FetchOutcome, FetchRequest, Result, SkippedQuery,
    Source,
};

// Quora serves a stripped page to unknown agents.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Question texts scraped from Quora search result pages.
///
/// Quora exposes no engagement numbers on the search page, so items carry
/// `score = 0` and `num_comments = 0` and rank on keyword hits alone.
#[derive(Debug, Clone)]
pub struct QuoraSource {
    client: reqwest::Client,
    endpoint: String,
}

impl QuoraSource {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_env(client: reqwest::Client) -> Self {
        Self::new(client, crate::config::quora_endpoint())
    }

    fn search_url(&self, query: &str) -> Result<url::Url> {
        let base = format!("{}/search", self.endpoint.trim_end_matches('/'));
        url::Url::parse_with_params(&base, &[("q", query)])
            .map_err(|e| Error::InvalidInput(format!("bad quora endpoint {base:?}: {e}")))
    }

    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        timeout_ms: u64,
    ) -> Result<Vec<DiscussionItem>> {
        let resp = self
            .client
            .get(self.search_url(query)?)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("quora search HTTP {status}")));
        }
        let body = resp.text().await.map_err(|e| Error::Fetch(e.to_string()))?;
        let items = parse_search_page(&body, limit)?
            .into_iter()
            .map(|title| DiscussionItem {
                text: title.clone(),
                title,
                source: Source::Quora,
                community: Some(query.to_string()),
                ..Default::default()
            })
            .collect();
        Ok(items)
    }
}

/// Trimmed, non-empty texts of `div.q-text` blocks, first `limit` in page order.
pub fn parse_search_page(html: &str, limit: usize) -> Result<Vec<String>> {
    let sel = Selector::parse("div.q-text").map_err(|e| Error::Parse(e.to_string()))?;
    let doc = Html::parse_document(html);
    Ok(doc
        .select(&sel)
        .map(|el| {
            el.text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|t| !t.is_empty())
        .take(limit)
        .collect())
}

#[async_trait::async_trait]
impl DiscussionSource for QuoraSource {
    fn name(&self) -> &'static str {
        "quora"
    }

    fn source(&self) -> Source {
        Source::Quora
    }

    async fn fetch(&self, req: &FetchRequest) -> Result<FetchOutcome> {
        let timeout_ms = req.timeout_ms.unwrap_or(10_000).clamp(1_000, 60_000);
        let mut out = FetchOutcome::default();
        for q in &req.queries {
            match self.search(q, req.per_query_limit, timeout_ms).await {
                Ok(items) => out.items.extend(items),
                Err(e) => {
                    tracing::warn!(query = %q, error = %e, "skipping quora query");
                    out.skipped.push(SkippedQuery {
                        query: q.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(out)
    }
}
