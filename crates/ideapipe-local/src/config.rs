//! Environment-driven settings (`IDEAPIPE_*`).

use ideapipe_core::PipelineConfig;
use std::path::PathBuf;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.sambanova.ai";
pub const DEFAULT_LLM_MODEL: &str = "Llama-4-Maverick-17B-128E-Instruct";
pub const DEFAULT_LLM_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_REDDIT_ENDPOINT: &str = "https://www.reddit.com";
pub const DEFAULT_QUORA_ENDPOINT: &str = "https://www.quora.com";
pub const DEFAULT_CACHE_TTL_S: u64 = 3600;

pub(crate) fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

pub fn llm_base_url() -> String {
    env("IDEAPIPE_LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string())
}

pub fn llm_api_key() -> Option<String> {
    env("IDEAPIPE_LLM_API_KEY").or_else(|| env("DEEPSEEK_API_KEY"))
}

pub fn llm_model() -> String {
    env("IDEAPIPE_LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string())
}

pub fn llm_timeout_ms() -> u64 {
    env_parse("IDEAPIPE_LLM_TIMEOUT_MS").unwrap_or(DEFAULT_LLM_TIMEOUT_MS)
}

pub fn reddit_endpoint() -> String {
    env("IDEAPIPE_REDDIT_ENDPOINT").unwrap_or_else(|| DEFAULT_REDDIT_ENDPOINT.to_string())
}

pub fn quora_endpoint() -> String {
    env("IDEAPIPE_QUORA_ENDPOINT").unwrap_or_else(|| DEFAULT_QUORA_ENDPOINT.to_string())
}

pub fn cache_dir() -> PathBuf {
    env("IDEAPIPE_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("ideapipe-cache"))
}

pub fn cache_ttl_s() -> u64 {
    env_parse("IDEAPIPE_CACHE_TTL_S").unwrap_or(DEFAULT_CACHE_TTL_S)
}

/// `PipelineConfig::default()` with `IDEAPIPE_*` overrides applied.
///
/// Unparseable values are logged and ignored.
pub fn pipeline_config_from_env() -> PipelineConfig {
    let mut c = PipelineConfig::default();
    if let Some(v) = env_parse("IDEAPIPE_RANK_LIMIT") {
        c.rank_limit = v;
    }
    if let Some(v) = env_parse("IDEAPIPE_CONTEXT_ITEMS") {
        c.context_items = v;
    }
    if let Some(v) = env_parse("IDEAPIPE_ITEM_CHAR_BUDGET") {
        c.item_char_budget = v;
    }
    if let Some(v) = env_parse("IDEAPIPE_SIMILARITY_THRESHOLD") {
        c.similarity_threshold = v;
    }
    if let Some(v) = env_parse("IDEAPIPE_MIN_IDEA_CHARS") {
        c.min_idea_chars = v;
    }
    if let Some(v) = env_parse("IDEAPIPE_IDEAS_PER_SOURCE") {
        c.ideas_per_source = v;
    }
    if let Some(v) = env_parse("IDEAPIPE_PER_QUERY_LIMIT") {
        c.per_query_limit = v;
    }
    if let Some(v) = env_parse("IDEAPIPE_TEMPERATURE") {
        c.temperature = v;
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EnvGuard {
        k: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(k: &'static str, v: &str) -> Self {
            let prev = std::env::var(k).ok();
            std::env::set_var(k, v);
            Self { k, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(v) = self.prev.take() {
                std::env::set_var(self.k, v);
            } else {
                std::env::remove_var(self.k);
            }
        }
    }

    #[test]
    fn pipeline_overrides_apply_and_garbage_is_ignored() {
        let _a = EnvGuard::set("IDEAPIPE_RANK_LIMIT", " 12 ");
        let _b = EnvGuard::set("IDEAPIPE_SIMILARITY_THRESHOLD", "not-a-number");
        let c = pipeline_config_from_env();
        assert_eq!(c.rank_limit, 12);
        assert_eq!(c.similarity_threshold, 0.5);
    }

    #[test]
    fn blank_endpoint_falls_back_to_default() {
        let _g = EnvGuard::set("IDEAPIPE_QUORA_ENDPOINT", "   ");
        assert_eq!(quora_endpoint(), DEFAULT_QUORA_ENDPOINT);
    }

    #[test]
    fn api_key_falls_back_to_legacy_variable() {
        let _a = EnvGuard::set("IDEAPIPE_LLM_API_KEY", "");
        let _b = EnvGuard::set("DEEPSEEK_API_KEY", "sk-legacy");
        assert_eq!(llm_api_key().as_deref(), Some("sk-legacy"));
    }
}
