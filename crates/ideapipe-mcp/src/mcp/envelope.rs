use serde::Serialize;

pub(crate) fn warning_hint(code: &str) -> Option<&'static str> {
    let hint = match code {
        "llm_unavailable" => {
            "The completion service failed or timed out; placeholder ideas were returned. Check IDEAPIPE_LLM_BASE_URL / IDEAPIPE_LLM_API_KEY and retry."
        }
        "ideas_padded" => {
            "The model returned fewer ideas than requested; the rest are filler records (\"Additional opportunity identified\" in basic mode, \"Market Gap Analysis #n\" in enriched mode)."
        }
        "llm_parse_retry" => {
            "The first reply was not a JSON array, so ideas were regenerated as plain lines (problem/solution are less structured)."
        }
        "llm_retry_unusable" => {
            "Neither the JSON reply nor the plain-line retry was usable; placeholder ideas were returned."
        }
        "llm_fallback_ideas" => {
            "Enriched generation failed; ideas were built from the category template instead of the model."
        }
        "generic_ideas_filled" => {
            "Not enough distinct ideas survived the uniqueness filter; remaining slots hold generic numbered ideas. Try a broader topic."
        }
        "trend_analysis_unparsed" => {
            "The trend analysis reply had no JSON object; a \"Currently analyzing...\" placeholder was returned."
        }
        "trend_analysis_unavailable" => {
            "The completion service failed during trend analysis; a placeholder was returned."
        }
        "plan_fallback" => {
            "Model-backed query planning failed; the built-in subreddit/query plan was used."
        }
        "market_enrichment_failed" => {
            "Market enrichment call failed; ideas are returned without market analysis."
        }
        "market_enrichment_unparsed" => {
            "Market enrichment reply had no JSON object; ideas are returned without market analysis."
        }
        "market_enrichment_malformed" => {
            "Market enrichment reply was malformed JSON; every idea is marked \"Analysis Failed\"."
        }
        "cache_entry_invalid" => {
            "A cached report could not be decoded and was ignored; the run was recomputed."
        }
        "cache_read_failed" | "cache_write_failed" => {
            "The report cache is not usable. Check IDEAPIPE_CACHE_DIR permissions, or pass use_cache=false."
        }
        "no_discussions_fetched" => {
            "No discussions were fetched, so ideas are generated without market context. Check network access and IDEAPIPE_REDDIT_ENDPOINT / IDEAPIPE_QUORA_ENDPOINT."
        }
        "duplicate_ideas_dropped" => {
            "Near-duplicate ideas were dropped, so fewer ideas than requested may be returned."
        }
        "reddit_queries_skipped" | "quora_queries_skipped" => {
            "Some subreddits or search queries failed and were skipped; see report.skipped for reasons."
        }
        "reddit_unavailable" | "quora_unavailable" => {
            "A discussion source failed entirely; ideas are based on the remaining source."
        }
        _ => return None,
    };
    Some(hint)
}

pub(crate) fn warning_hints_from(codes: &[String]) -> serde_json::Value {
    let mut m = serde_json::Map::new();
    for c in codes {
        if let Some(h) = warning_hint(c) {
            m.insert(c.clone(), serde_json::json!(h));
        }
    }
    serde_json::Value::Object(m)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidParams,
    NotConfigured,
    FetchFailed,
    LlmFailed,
    CacheError,
    ParseFailed,
    ExportFailed,
}

impl ErrorCode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParams => "invalid_params",
            Self::NotConfigured => "not_configured",
            Self::FetchFailed => "fetch_failed",
            Self::LlmFailed => "llm_failed",
            Self::CacheError => "cache_error",
            Self::ParseFailed => "parse_failed",
            Self::ExportFailed => "export_failed",
        }
    }

    pub(crate) fn retryable(self) -> bool {
        match self {
            Self::FetchFailed | Self::LlmFailed | Self::CacheError => true,
            // Needs a different input or configuration first.
            Self::InvalidParams | Self::NotConfigured | Self::ParseFailed | Self::ExportFailed => {
                false
            }
        }
    }

    pub(crate) fn from_error(e: &ideapipe_core::Error) -> Self {
        use ideapipe_core::Error;
        match e {
            Error::InvalidInput(_) => Self::InvalidParams,
            Error::NotConfigured(_) => Self::NotConfigured,
            Error::Fetch(_) => Self::FetchFailed,
            Error::Llm(_) => Self::LlmFailed,
            Error::Cache(_) => Self::CacheError,
            Error::Parse(_) => Self::ParseFailed,
            Error::Export(_) => Self::ExportFailed,
        }
    }

    pub(crate) fn default_hint(self) -> &'static str {
        match self {
            Self::InvalidParams => "Check the tool arguments (non-empty topic, limit >= 1, known mode).",
            Self::NotConfigured => {
                "Set IDEAPIPE_LLM_API_KEY (or DEEPSEEK_API_KEY) in the server env, or point IDEAPIPE_ENV_FILE at a file that does."
            }
            Self::FetchFailed => "Discussion fetch failed; retry later.",
            Self::LlmFailed => "The completion service failed; retry later.",
            Self::CacheError => "Retry with use_cache=false.",
            Self::ParseFailed => "The upstream response could not be parsed.",
            Self::ExportFailed => "The report could not be serialized.",
        }
    }
}

pub(crate) fn add_envelope_fields(payload: &mut serde_json::Value, kind: &str, elapsed_ms: u128) {
    payload["schema_version"] = serde_json::json!(super::SCHEMA_VERSION);
    payload["kind"] = serde_json::json!(kind);
    payload["elapsed_ms"] = serde_json::json!(elapsed_ms);
    if payload.get("request").is_none() {
        payload["request"] = serde_json::Value::Null;
    }
    if payload.get("warnings").is_none() {
        payload["warnings"] = serde_json::json!([]);
    }
}

pub(crate) fn error_obj(
    code: ErrorCode,
    message: impl ToString,
    hint: impl ToString,
) -> serde_json::Value {
    #[derive(Serialize)]
    struct ErrorObject {
        code: &'static str,
        message: String,
        hint: String,
        retryable: bool,
    }

    let e = ErrorObject {
        code: code.as_str(),
        message: message.to_string(),
        hint: hint.to_string(),
        retryable: code.retryable(),
    };
    match serde_json::to_value(e) {
        Ok(v) => v,
        Err(_) => serde_json::json!({
            "code": code.as_str(),
            "message": message.to_string(),
            "hint": hint.to_string(),
            "retryable": code.retryable()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_map_from_core_errors() {
        let e = ideapipe_core::Error::NotConfigured("missing key".into());
        let code = ErrorCode::from_error(&e);
        assert_eq!(code, ErrorCode::NotConfigured);
        let v = error_obj(code, e, code.default_hint());
        assert_eq!(v["code"].as_str(), Some("not_configured"));
        assert_eq!(v["retryable"].as_bool(), Some(false));
        assert!(v["message"].as_str().unwrap().contains("missing key"));

        assert!(ErrorCode::from_error(&ideapipe_core::Error::Llm("503".into())).retryable());
    }

    #[test]
    fn hints_cover_dynamic_source_warnings() {
        let hints = warning_hints_from(&[
            "quora_unavailable".to_string(),
            "reddit_queries_skipped".to_string(),
            "something_new".to_string(),
        ]);
        let m = hints.as_object().unwrap();
        assert_eq!(m.len(), 2);
        assert!(m.contains_key("quora_unavailable"));
    }

    #[test]
    fn envelope_keeps_existing_request() {
        let mut p = serde_json::json!({"ok": true, "request": {"topic": "ai"}});
        add_envelope_fields(&mut p, "idea_plan", 3);
        assert_eq!(p["schema_version"].as_u64(), Some(super::super::SCHEMA_VERSION));
        assert_eq!(p["request"]["topic"].as_str(), Some("ai"));
        assert_eq!(p["warnings"], serde_json::json!([]));
    }
}
