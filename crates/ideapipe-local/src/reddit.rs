use ideapipe_core::{
    DiscussionItem, DiscussionSource, Error, FetchOutcome, FetchRequest, Result, SkippedQuery,
    Source,
};
use serde::Deserialize;

fn timeout_ms_from_request(req: &FetchRequest) -> u64 {
    req.timeout_ms.unwrap_or(15_000).clamp(1_000, 60_000)
}

/// Hot posts from public subreddit JSON listings (no OAuth).
#[derive(Debug, Clone)]
pub struct RedditSource {
    client: reqwest::Client,
    endpoint: String,
}

impl RedditSource {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_env(client: reqwest::Client) -> Self {
        Self::new(client, crate::config::reddit_endpoint())
    }

    fn endpoint_hot(&self, subreddit: &str) -> String {
        let sub = subreddit.trim().trim_start_matches("r/");
        format!("{}/r/{sub}/hot.json", self.endpoint.trim_end_matches('/'))
    }

    /// One subreddit's hot listing, at most `limit` posts.
    pub async fn hot(
        &self,
        subreddit: &str,
        limit: usize,
        timeout_ms: u64,
    ) -> Result<Vec<DiscussionItem>> {
        let resp = self
            .client
            .get(self.endpoint_hot(subreddit))
            .query(&[("limit", limit.to_string())])
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("reddit r/{subreddit} HTTP {status}")));
        }
        let listing: Listing = resp
            .json()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;
        Ok(listing
            .data
            .children
            .into_iter()
            .take(limit)
            .map(|c| c.data.into_item(subreddit))
            .collect())
    }
}

#[async_trait::async_trait]
impl DiscussionSource for RedditSource {
    fn name(&self) -> &'static str {
        "reddit"
    }

    fn source(&self) -> Source {
        Source::Reddit
    }

    async fn fetch(&self, req: &FetchRequest) -> Result<FetchOutcome> {
        let timeout_ms = timeout_ms_from_request(req);
        let mut out = FetchOutcome::default();
        for sub in &req.queries {
            match self.hot(sub, req.per_query_limit, timeout_ms).await {
                Ok(items) => {
                    tracing::debug!(subreddit = %sub, n = items.len(), "reddit listing fetched");
                    out.items.extend(items);
                }
                Err(e) => {
                    tracing::warn!(subreddit = %sub, error = %e, "skipping subreddit");
                    out.skipped.push(SkippedQuery {
                        query: sub.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    // Negative for downvoted posts.
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: u64,
    #[serde(default)]
    permalink: Option<String>,
    #[serde(default)]
    created_utc: Option<f64>,
}

impl Post {
    fn into_item(self, subreddit: &str) -> DiscussionItem {
        // Link posts have no body; the title is all the signal there is.
        let text = if self.selftext.trim().is_empty() {
            self.title.clone()
        } else {
            self.selftext
        };
        DiscussionItem {
            title: self.title,
            text,
            score: self.score.max(0) as u64,
            num_comments: self.num_comments,
            source: Source::Reddit,
            url: self
                .permalink
                .map(|p| format!("https://www.reddit.com{p}")),
            community: Some(subreddit.trim_start_matches("r/").to_string()),
            created_utc: self.created_utc.filter(|t| *t >= 0.0).map(|t| t as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use std::net::SocketAddr;

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn listing() -> serde_json::Value {
        serde_json::json!({
            "kind": "Listing",
            "data": {"children": [
                {"kind": "t3", "data": {
                    "title": "Need a fitness app", "selftext": "home workouts are hard",
                    "score": 250, "num_comments": 40, "permalink": "/r/fitness/comments/x/",
                    "created_utc": 1700000000.0
                }},
                {"kind": "t3", "data": {"title": "Link post", "selftext": "", "score": -3}}
            ]}
        })
    }

    #[tokio::test]
    async fn failing_subreddit_is_skipped_and_the_rest_collected() {
        let app = Router::new().route(
            "/r/:sub/hot.json",
            get(|Path(sub): Path<String>| async move {
                if sub == "private" {
                    Err(StatusCode::FORBIDDEN)
                } else {
                    Ok(Json(listing()))
                }
            }),
        );
        let addr = serve(app).await;
        let src = RedditSource::new(reqwest::Client::new(), format!("http://{addr}"));
        let out = src
            .fetch(&FetchRequest {
                topic: "fitness".into(),
                queries: vec!["fitness".into(), "private".into()],
                per_query_limit: 10,
                timeout_ms: Some(2_000),
            })
            .await
            .unwrap();

        assert_eq!(out.items.len(), 2);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].query, "private");
        assert!(out.skipped[0].reason.contains("403"));

        let first = &out.items[0];
        assert_eq!(first.score, 250);
        assert_eq!(first.community.as_deref(), Some("fitness"));
        assert_eq!(first.created_utc, Some(1_700_000_000));
        assert_eq!(
            first.url.as_deref(),
            Some("https://www.reddit.com/r/fitness/comments/x/")
        );

        let link = &out.items[1];
        assert_eq!(link.score, 0);
        assert_eq!(link.text, "Link post");
    }

    #[tokio::test]
    async fn limit_is_forwarded_and_enforced() {
        let app = Router::new().route(
            "/r/:sub/hot.json",
            get(
                |axum::extract::Query(q): axum::extract::Query<std::collections::HashMap<String, String>>| async move {
                    assert_eq!(q.get("limit").map(String::as_str), Some("1"));
                    Json(listing())
                },
            ),
        );
        let addr = serve(app).await;
        let src = RedditSource::new(reqwest::Client::new(), format!("http://{addr}/"));
        let items = src.hot("r/startups", 1, 2_000).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].community.as_deref(), Some("startups"));
    }
}
