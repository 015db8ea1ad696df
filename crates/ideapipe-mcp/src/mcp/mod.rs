use super::{
    build_orchestrator, build_pipeline, plan_payload, score_payload, DEFAULT_LIMIT, MAX_LIMIT,
};
use ideapipe_core::plan::plan_queries;
use ideapipe_core::{DiscussionItem, GenerationMode};
use ideapipe_local::config;
use ideapipe_local::pipeline::RunOptions;
use rmcp::{
    handler::server::router::tool::ToolRouter as RmcpToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::stdio,
    ErrorData as McpError, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::time::Instant;

mod envelope;
use envelope::*;

const SCHEMA_VERSION: u64 = 1;

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct IdeaGenerateArgs {
    /// Topic to mine discussions for, e.g. "fitness" or "sustainable packaging".
    topic: String,
    /// basic | enriched | unique | ranked (default: basic).
    #[serde(default)]
    mode: Option<String>,
    /// Number of ideas (default 5, max 50).
    #[serde(default)]
    limit: Option<usize>,
    /// Read/write the on-disk report cache (default: true).
    #[serde(default)]
    use_cache: Option<bool>,
    /// Ask the model for the subreddit/query plan (default: false).
    #[serde(default)]
    llm_planning: Option<bool>,
    /// Also run the model-backed trend analysis (default: false).
    #[serde(default)]
    analyze_trends: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct IdeaScoreArgs {
    topic: String,
    /// Discussion items: objects with `title`, `text`, `score`, `num_comments`, `source`.
    #[serde(default)]
    items: Vec<serde_json::Value>,
    /// Keep at most this many ranked items (default: the configured rank limit).
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct IdeaPlanArgs {
    topic: String,
    /// Ask the model for the plan; falls back to the built-in plan on failure (default: false).
    #[serde(default)]
    use_llm: Option<bool>,
}

fn tool_result(payload: serde_json::Value) -> CallToolResult {
    // Structured content for machine consumers plus a text copy for clients that only read `content[0].text`.
    let mut r = CallToolResult::structured(payload.clone());
    r.content = vec![Content::text(payload.to_string())];
    r
}

fn error_result(
    kind: &str,
    request: serde_json::Value,
    code: ErrorCode,
    message: impl ToString,
    hint: impl ToString,
    t0: Instant,
) -> CallToolResult {
    let mut payload = serde_json::json!({
        "ok": false,
        "request": request,
        "error": error_obj(code, message, hint),
    });
    add_envelope_fields(&mut payload, kind, t0.elapsed().as_millis());
    tool_result(payload)
}

fn core_error_result(
    kind: &str,
    request: serde_json::Value,
    e: ideapipe_core::Error,
    t0: Instant,
) -> CallToolResult {
    let code = ErrorCode::from_error(&e);
    error_result(kind, request, code, e, code.default_hint(), t0)
}

#[derive(Clone)]
pub(crate) struct IdeapipeMcp {
    tool_router: RmcpToolRouter<Self>,
    http: reqwest::Client,
}

#[tool_router]
impl IdeapipeMcp {
    pub(crate) fn new() -> Result<Self, McpError> {
        let http = ideapipe_local::http_client()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(Self {
            tool_router: Self::tool_router(),
            http,
        })
    }

    #[tool(description = "Report ideapipe configuration + version (no secrets)")]
    async fn ideapipe_meta(&self) -> Result<CallToolResult, McpError> {
        let t0 = Instant::now();
        let mut payload = serde_json::json!({
            "ok": true,
            "name": "ideapipe",
            "version": env!("CARGO_PKG_VERSION"),
            "configured": {
                "llm": {
                    "api_key": config::llm_api_key().is_some(),
                    "base_url": config::llm_base_url(),
                    "model": config::llm_model(),
                },
                "reddit_endpoint": config::reddit_endpoint(),
                "quora_endpoint": config::quora_endpoint(),
                "cache_dir": config::cache_dir().display().to_string(),
            },
            "pipeline": config::pipeline_config_from_env(),
            "modes": ["basic", "enriched", "unique", "ranked"],
            "tools": ["idea_generate", "idea_score", "idea_plan", "ideapipe_meta"],
        });
        add_envelope_fields(&mut payload, "ideapipe_meta", t0.elapsed().as_millis());
        Ok(tool_result(payload))
    }

    #[tool(
        description = "Fetch Reddit/Quora discussions for a topic, rank them, and generate startup ideas (basic|enriched|unique|ranked)"
    )]
    async fn idea_generate(
        &self,
        params: Parameters<Option<IdeaGenerateArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let t0 = Instant::now();
        let kind = "idea_generate";
        let args = params.0.unwrap_or_default();
        let topic = args.topic.trim().to_string();
        let limit = args.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let request = serde_json::json!({
            "topic": topic,
            "mode": args.mode,
            "limit": limit,
        });
        if topic.is_empty() {
            return Ok(error_result(
                kind,
                request,
                ErrorCode::InvalidParams,
                "topic must be non-empty",
                "Provide a topic, e.g. \"fitness\".",
                t0,
            ));
        }
        let mode = match args
            .mode
            .as_deref()
            .unwrap_or("basic")
            .parse::<GenerationMode>()
        {
            Ok(m) => m,
            Err(e) => return Ok(core_error_result(kind, request, e, t0)),
        };
        let pipeline = match build_pipeline(self.http.clone()) {
            Ok(p) => p,
            Err(e) => return Ok(core_error_result(kind, request, e, t0)),
        };
        let opts = RunOptions {
            use_cache: args.use_cache.unwrap_or(true),
            llm_planning: args.llm_planning.unwrap_or(false),
            analyze_trends: args.analyze_trends.unwrap_or(false),
        };
        match pipeline.run(&topic, mode, limit, opts).await {
            Ok(report) => {
                let mut payload = serde_json::json!({
                    "ok": true,
                    "request": request,
                    "warnings": report.warnings,
                    "warning_hints": warning_hints_from(&report.warnings),
                    "report": report,
                });
                add_envelope_fields(&mut payload, kind, t0.elapsed().as_millis());
                Ok(tool_result(payload))
            }
            Err(e) => Ok(core_error_result(kind, request, e, t0)),
        }
    }

    #[tool(description = "Score and rank caller-supplied discussion items for a topic (offline)")]
    async fn idea_score(
        &self,
        params: Parameters<Option<IdeaScoreArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let t0 = Instant::now();
        let kind = "idea_score";
        let args = params.0.unwrap_or_default();
        let topic = args.topic.trim().to_string();
        let limit = args
            .limit
            .unwrap_or_else(|| config::pipeline_config_from_env().rank_limit);
        let request = serde_json::json!({
            "topic": topic,
            "items": args.items.len(),
            "limit": limit,
        });
        if topic.is_empty() {
            return Ok(error_result(
                kind,
                request,
                ErrorCode::InvalidParams,
                "topic must be non-empty",
                "Provide the topic the items should be scored against.",
                t0,
            ));
        }
        let items: Vec<DiscussionItem> =
            match serde_json::from_value(serde_json::Value::Array(args.items)) {
                Ok(v) => v,
                Err(e) => {
                    return Ok(error_result(
                        kind,
                        request,
                        ErrorCode::InvalidParams,
                        format!("invalid items: {e}"),
                        "Each item needs string title/text, non-negative score/num_comments and source reddit|quora.",
                        t0,
                    ))
                }
            };

        let mut payload = score_payload(&topic, &items, limit);
        payload["ok"] = serde_json::json!(true);
        payload["request"] = request;
        add_envelope_fields(&mut payload, kind, t0.elapsed().as_millis());
        Ok(tool_result(payload))
    }

    #[tool(description = "Show the subreddits and Quora queries a topic would be searched with")]
    async fn idea_plan(
        &self,
        params: Parameters<Option<IdeaPlanArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let t0 = Instant::now();
        let kind = "idea_plan";
        let args = params.0.unwrap_or_default();
        let topic = args.topic.trim().to_string();
        let use_llm = args.use_llm.unwrap_or(false);
        let request = serde_json::json!({ "topic": topic, "use_llm": use_llm });
        if topic.is_empty() {
            return Ok(error_result(
                kind,
                request,
                ErrorCode::InvalidParams,
                "topic must be non-empty",
                "Provide a topic, e.g. \"remote work\".",
                t0,
            ));
        }

        let mut payload = if use_llm {
            let orchestrator = match build_orchestrator(self.http.clone()) {
                Ok(o) => o,
                Err(e) => return Ok(core_error_result(kind, request, e, t0)),
            };
            let planned = orchestrator.plan_queries_with_llm(&topic).await;
            plan_payload(&topic, &planned.value, "llm", &planned.warnings)
        } else {
            plan_payload(&topic, &plan_queries(&topic), "builtin", &[])
        };
        payload["ok"] = serde_json::json!(true);
        payload["request"] = request;
        add_envelope_fields(&mut payload, kind, t0.elapsed().as_millis());
        Ok(tool_result(payload))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for IdeapipeMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Startup idea mining over Reddit/Quora discussions. idea_score and idea_plan are offline; idea_generate needs a completion API key. Outputs are JSON and schema-versioned."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub(crate) async fn serve_stdio() -> Result<(), McpError> {
    let svc = IdeapipeMcp::new()?;
    let running = svc
        .serve(stdio())
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    // Keep the stdio server alive until the client closes.
    running
        .waiting()
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p<T>(v: T) -> Parameters<Option<T>> {
        Parameters(Some(v))
    }

    fn payload(r: &CallToolResult) -> serde_json::Value {
        r.structured_content.clone().unwrap_or_default()
    }

    #[tokio::test]
    async fn idea_score_rejects_blank_topic() {
        let svc = IdeapipeMcp::new().unwrap();
        let r = svc
            .idea_score(p(IdeaScoreArgs {
                topic: "  ".into(),
                ..Default::default()
            }))
            .await
            .unwrap();
        let v = payload(&r);
        assert_eq!(v["ok"].as_bool(), Some(false));
        assert_eq!(v["kind"].as_str(), Some("idea_score"));
        assert_eq!(
            v["error"]["code"].as_str(),
            Some(ErrorCode::InvalidParams.as_str())
        );
    }

    #[tokio::test]
    async fn idea_score_ranks_supplied_items() {
        let svc = IdeapipeMcp::new().unwrap();
        let r = svc
            .idea_score(p(IdeaScoreArgs {
                topic: "fitness".into(),
                items: vec![
                    serde_json::json!({"title": "unrelated", "source": "reddit"}),
                    serde_json::json!({"title": "fitness app needed", "score": 50, "num_comments": 10, "source": "reddit"}),
                ],
                limit: Some(1),
            }))
            .await
            .unwrap();
        let v = payload(&r);
        assert_eq!(v["ok"].as_bool(), Some(true));
        assert_eq!(v["ranked"][0]["title"].as_str(), Some("fitness app needed"));
        assert!((v["ranked"][0]["relevance_score"].as_f64().unwrap() - 1.7).abs() < 1e-9);
        assert_eq!(v["ranked"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn idea_score_reports_bad_items_as_invalid_params() {
        let svc = IdeapipeMcp::new().unwrap();
        let r = svc
            .idea_score(p(IdeaScoreArgs {
                topic: "fitness".into(),
                items: vec![serde_json::json!({"title": "x", "score": -3})],
                limit: None,
            }))
            .await
            .unwrap();
        let v = payload(&r);
        assert_eq!(v["ok"].as_bool(), Some(false));
        assert_eq!(v["error"]["code"].as_str(), Some("invalid_params"));
    }

    #[tokio::test]
    async fn idea_generate_rejects_unknown_mode_before_any_io() {
        let svc = IdeapipeMcp::new().unwrap();
        let r = svc
            .idea_generate(p(IdeaGenerateArgs {
                topic: "fitness".into(),
                mode: Some("wild".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        let v = payload(&r);
        assert_eq!(v["ok"].as_bool(), Some(false));
        assert_eq!(v["error"]["code"].as_str(), Some("invalid_params"));
        assert_eq!(v["request"]["limit"].as_u64(), Some(DEFAULT_LIMIT as u64));
    }

    #[tokio::test]
    async fn idea_plan_builtin_is_offline() {
        let svc = IdeapipeMcp::new().unwrap();
        let r = svc
            .idea_plan(p(IdeaPlanArgs {
                topic: "home fitness".into(),
                use_llm: None,
            }))
            .await
            .unwrap();
        let v = payload(&r);
        assert_eq!(v["ok"].as_bool(), Some(true));
        assert_eq!(v["planner"].as_str(), Some("builtin"));
        assert_eq!(v["constraints"]["category"].as_str(), Some("fitness"));
        assert_eq!(v["schema_version"].as_u64(), Some(SCHEMA_VERSION));
    }
}
