use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ideapipe_core::plan::{category_constraints, plan_queries};
use ideapipe_core::rank::score_and_rank;
use ideapipe_core::trends::{identify_trends, DEFAULT_KEYWORDS_PER_ITEM};
use ideapipe_core::{DiscussionItem, DiscussionSource, GenerationMode, QueryPlan};
use ideapipe_local::config;
use ideapipe_local::export;
use ideapipe_local::openai_compat::OpenAiCompatClient;
use ideapipe_local::orchestrator::Orchestrator;
use ideapipe_local::pipeline::{GenerationReport, Pipeline, RunOptions, REPORT_KEYWORD_TRENDS};
use ideapipe_local::quora::QuoraSource;
use ideapipe_local::reddit::RedditSource;
use ideapipe_local::FsCache;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "stdio")]
mod mcp;

pub(crate) const DEFAULT_LIMIT: usize = 5;
pub(crate) const MAX_LIMIT: usize = 50;

#[derive(Parser, Debug)]
#[command(name = "ideapipe")]
#[command(
    about = "Mine Reddit/Quora discussions for startup ideas (CLI + MCP stdio server)",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as an MCP stdio server (for Cursor / MCP clients).
    #[cfg(feature = "stdio")]
    McpStdio,
    /// Fetch discussions for a topic and generate ideas (json report).
    Generate(GenerateCmd),
    /// Score and rank a JSON file of discussion items, offline (json).
    Score(ScoreCmd),
    /// Show where a topic would be searched (json).
    Plan(PlanCmd),
    /// Re-export a saved generation report as json, csv or a summary.
    Export(ExportCmd),
    /// Diagnose configuration issues (json; no secrets).
    Doctor(DoctorCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug)]
struct GenerateCmd {
    #[arg(long)]
    topic: String,
    /// basic | enriched | unique | ranked
    #[arg(long, default_value = "basic")]
    mode: String,
    /// Number of ideas to generate.
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
    /// Skip the on-disk report cache (neither read nor written).
    #[arg(long)]
    no_cache: bool,
    /// Ask the model for the subreddit/query plan instead of the built-in one.
    #[arg(long)]
    llm_plan: bool,
    /// Also run the model-backed trend analysis.
    #[arg(long)]
    analyze: bool,
    /// Write the report here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct ScoreCmd {
    #[arg(long)]
    topic: String,
    /// JSON array of discussion items (`title`, `text`, `score`, `num_comments`, `source`).
    #[arg(long)]
    items: PathBuf,
    /// Keep at most this many ranked items (default: IDEAPIPE_RANK_LIMIT or 100).
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
struct PlanCmd {
    #[arg(long)]
    topic: String,
    /// Ask the model for the plan (needs an API key; falls back to the built-in plan).
    #[arg(long)]
    llm: bool,
}

#[derive(clap::Args, Debug)]
struct ExportCmd {
    /// Report written by `generate --out`.
    #[arg(long)]
    report: PathBuf,
    /// json | csv | summary
    #[arg(long, default_value = "json")]
    format: String,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct DoctorCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

pub(crate) fn build_orchestrator(client: reqwest::Client) -> ideapipe_core::Result<Orchestrator> {
    let llm = OpenAiCompatClient::from_env(client, None)?;
    Ok(Orchestrator::new(
        Arc::new(llm),
        config::pipeline_config_from_env(),
    ))
}

/// Reddit + Quora sources, the env-configured model and the on-disk report cache.
pub(crate) fn build_pipeline(client: reqwest::Client) -> ideapipe_core::Result<Pipeline> {
    let orchestrator = build_orchestrator(client.clone())?;
    let sources: Vec<Arc<dyn DiscussionSource>> = vec![
        Arc::new(RedditSource::from_env(client.clone())),
        Arc::new(QuoraSource::from_env(client)),
    ];
    let cache = FsCache::new(config::cache_dir(), Some(config::cache_ttl_s()));
    Ok(Pipeline::new(sources, orchestrator).with_cache(Arc::new(cache)))
}

pub(crate) fn score_payload(
    topic: &str,
    items: &[DiscussionItem],
    limit: usize,
) -> serde_json::Value {
    let ranked = score_and_rank(items, topic, limit);
    let mut trends = identify_trends(items, DEFAULT_KEYWORDS_PER_ITEM);
    trends.truncate(REPORT_KEYWORD_TRENDS);
    serde_json::json!({
        "topic": topic,
        "items": items.len(),
        "limit": limit,
        "ranked": ranked,
        "keyword_trends": trends,
    })
}

pub(crate) fn plan_payload(
    topic: &str,
    plan: &QueryPlan,
    planner: &str,
    warnings: &[&'static str],
) -> serde_json::Value {
    serde_json::json!({
        "topic": topic,
        "planner": planner,
        "plan": plan,
        "constraints": category_constraints(topic),
        "warnings": warnings,
    })
}

fn load_items(path: &Path) -> Result<Vec<DiscussionItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read items file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of discussion items", path.display()))
}

fn write_output(out: Option<&Path>, body: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, body).with_context(|| format!("write {}", path.display()))
        }
        None => {
            if body.ends_with('\n') {
                print!("{body}");
            } else {
                println!("{body}");
            }
            Ok(())
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("IDEAPIPE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // stdout carries JSON output and the MCP transport.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads `IDEAPIPE_ENV_FILE` if set; variables already in the process env win.
fn load_env_file() -> Option<String> {
    let p = std::env::var("IDEAPIPE_ENV_FILE").ok()?;
    let p = p.trim();
    if p.is_empty() {
        return None;
    }
    dotenvy::from_path(p)
        .err()
        .map(|e| format!("IDEAPIPE_ENV_FILE {p}: {e}"))
}

fn doctor_payload(t0: std::time::Instant) -> serde_json::Value {
    let cache_dir = config::cache_dir();
    let cache_ok = (|| -> Result<()> {
        std::fs::create_dir_all(&cache_dir)?;
        let probe = cache_dir.join(format!("ideapipe-doctor-{}.probe", std::process::id()));
        std::fs::write(&probe, b"ok")?;
        let _ = std::fs::remove_file(&probe);
        Ok(())
    })();
    let pipeline_config = config::pipeline_config_from_env();
    let config_ok = pipeline_config.validate();
    let llm_configured = config::llm_api_key().is_some();

    let checks = vec![
        serde_json::json!({
            "name": "cache_dir_writable",
            "ok": cache_ok.is_ok(),
            "error": cache_ok.err().map(|e| e.to_string()),
        }),
        serde_json::json!({
            "name": "pipeline_config_valid",
            "ok": config_ok.is_ok(),
            "error": config_ok.err().map(|e| e.to_string()),
        }),
        serde_json::json!({
            "name": "llm_api_key",
            "ok": llm_configured,
            "error": (!llm_configured).then_some("set IDEAPIPE_LLM_API_KEY (or DEEPSEEK_API_KEY)"),
        }),
    ];
    let ok = checks.iter().all(|c| c["ok"].as_bool() == Some(true));
    let elapsed_ms = t0.elapsed().as_millis();

    serde_json::json!({
        "schema_version": 1,
        "kind": "doctor",
        "ok": ok,
        "name": "ideapipe",
        "version": env!("CARGO_PKG_VERSION"),
        "elapsed_ms": elapsed_ms,
        "features": { "stdio": cfg!(feature = "stdio") },
        "configured": {
            "llm": {
                "api_key": llm_configured,
                "base_url": config::llm_base_url(),
                "model": config::llm_model(),
                "timeout_ms": config::llm_timeout_ms(),
            },
            "reddit_endpoint": config::reddit_endpoint(),
            "quora_endpoint": config::quora_endpoint(),
            "cache_dir": cache_dir.display().to_string(),
            "cache_ttl_s": config::cache_ttl_s(),
        },
        "pipeline": pipeline_config,
        "checks": checks,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_file_error = load_env_file();
    init_logging();
    if let Some(e) = env_file_error {
        tracing::warn!("{e}");
    }

    let cli = Cli::parse();

    match cli.command {
        #[cfg(feature = "stdio")]
        Commands::McpStdio => {
            mcp::serve_stdio()
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        }
        Commands::Generate(args) => {
            let mode: GenerationMode = args.mode.parse()?;
            let pipeline = build_pipeline(ideapipe_local::http_client()?)?;
            let opts = RunOptions {
                use_cache: !args.no_cache,
                llm_planning: args.llm_plan,
                analyze_trends: args.analyze,
            };
            let report = pipeline.run(&args.topic, mode, args.limit, opts).await?;
            for w in &report.warnings {
                tracing::info!(warning = %w, "generation warning");
            }
            write_output(args.out.as_deref(), &export::to_json(&report)?)?;
            if let Some(path) = &args.out {
                println!(
                    "{}",
                    serde_json::json!({
                        "schema_version": 1,
                        "kind": "generate",
                        "ok": true,
                        "out": path.display().to_string(),
                        "ideas": report.generated.len(),
                        "from_cache": report.from_cache,
                        "warnings": report.warnings,
                    })
                );
            }
        }
        Commands::Score(args) => {
            let topic = args.topic.trim();
            if topic.is_empty() {
                anyhow::bail!("--topic must be non-empty");
            }
            let items = load_items(&args.items)?;
            let limit = args
                .limit
                .unwrap_or_else(|| config::pipeline_config_from_env().rank_limit);
            let mut payload = score_payload(topic, &items, limit);
            payload["schema_version"] = serde_json::json!(1);
            payload["kind"] = serde_json::json!("score");
            payload["ok"] = serde_json::json!(true);
            println!("{payload}");
        }
        Commands::Plan(args) => {
            let topic = args.topic.trim();
            if topic.is_empty() {
                anyhow::bail!("--topic must be non-empty");
            }
            let mut payload = if args.llm {
                let orchestrator = build_orchestrator(ideapipe_local::http_client()?)?;
                let planned = orchestrator.plan_queries_with_llm(topic).await;
                plan_payload(topic, &planned.value, "llm", &planned.warnings)
            } else {
                plan_payload(topic, &plan_queries(topic), "builtin", &[])
            };
            payload["schema_version"] = serde_json::json!(1);
            payload["kind"] = serde_json::json!("plan");
            payload["ok"] = serde_json::json!(true);
            println!("{payload}");
        }
        Commands::Export(args) => {
            let raw = std::fs::read_to_string(&args.report)
                .with_context(|| format!("read report {}", args.report.display()))?;
            let report: GenerationReport = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a generation report", args.report.display()))?;
            let body = match args.format.to_ascii_lowercase().as_str() {
                "json" => export::to_json(&report)?,
                "csv" => export::to_csv(&report.generated)?,
                "summary" => {
                    let items: Vec<DiscussionItem> =
                        report.top_items.iter().map(|s| s.item.clone()).collect();
                    let mut summary = export::export_summary(
                        &items,
                        &report.keyword_trends,
                        report.trend_analysis.clone(),
                    );
                    summary.posts_analyzed = report.items_fetched;
                    serde_json::to_string_pretty(&summary)?
                }
                other => {
                    anyhow::bail!("unknown export format {other:?} (allowed: json, csv, summary)")
                }
            };
            write_output(args.out.as_deref(), &body)?;
        }
        Commands::Doctor(args) => {
            let payload = doctor_payload(std::time::Instant::now());
            match args.output.to_ascii_lowercase().as_str() {
                "text" => {
                    println!(
                        "ideapipe {} ({})",
                        env!("CARGO_PKG_VERSION"),
                        if payload["ok"].as_bool() == Some(true) { "ok" } else { "needs attention" }
                    );
                    if let Some(checks) = payload["checks"].as_array() {
                        for c in checks {
                            let name = c["name"].as_str().unwrap_or("?");
                            let ok = c["ok"].as_bool().unwrap_or(false);
                            println!("- {}: {}", name, if ok { "ok" } else { "fail" });
                        }
                    }
                }
                _ => println!("{payload}"),
            }
        }
        Commands::Version(args) => {
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "version",
                "ok": true,
                "name": "ideapipe",
                "version": env!("CARGO_PKG_VERSION"),
            });
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("ideapipe {}", env!("CARGO_PKG_VERSION")),
                _ => println!("{}", v),
            }
        }
    }
    Ok(())
}
