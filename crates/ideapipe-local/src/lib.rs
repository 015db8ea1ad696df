use ideapipe_core::{Error, ResultCache, Result};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub mod config;
pub mod enrich;
pub mod export;
pub mod openai_compat;
pub mod orchestrator;
pub mod pipeline;
pub mod quora;
pub mod reddit;

const USER_AGENT: &str = "ideapipe-local/0.1";

/// Shared HTTP client with "never hang forever" defaults.
///
/// Per-request timeouts can still override the overall timeout.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| Error::Fetch(e.to_string()))
}

fn now_epoch_s() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs()
}

/// On-disk TTL cache: one JSON file per key under a sha256 fan-out layout.
#[derive(Debug, Clone)]
pub struct FsCache {
    root: PathBuf,
    ttl_s: Option<u64>,
}

impl FsCache {
    pub fn new(root: PathBuf, ttl_s: Option<u64>) -> Self {
        Self { root, ttl_s }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn hashed(key: &str) -> String {
        let mut h = Sha256::new();
        h.update(b"key:");
        h.update(key.as_bytes());
        hex::encode(h.finalize())
    }

    fn path(&self, key: &str) -> PathBuf {
        let k = Self::hashed(key);
        self.root.join(&k[0..2]).join(format!("{k}.json"))
    }
}

impl ResultCache for FsCache {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let p = self.path(key);
        if !p.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&p).map_err(|e| Error::Cache(e.to_string()))?;
        let mut entry: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| Error::Cache(e.to_string()))?;
        let stored_at = entry
            .get("stored_at_epoch_s")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        if let Some(ttl_s) = self.ttl_s {
            if now_epoch_s().saturating_sub(stored_at) > ttl_s {
                return Ok(None);
            }
        }
        Ok(entry.get_mut("value").map(serde_json::Value::take))
    }

    fn put(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let p = self.path(key);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Cache(e.to_string()))?;
        }
        let entry = serde_json::json!({
            "schema_version": 1,
            "stored_at_epoch_s": now_epoch_s(),
            "key": key,
            "value": value,
        });
        let bytes = serde_json::to_vec(&entry).map_err(|e| Error::Cache(e.to_string()))?;
        fs::write(&p, bytes).map_err(|e| Error::Cache(e.to_string()))
    }
}

/// In-process TTL cache (per server/process lifetime).
#[derive(Debug)]
pub struct MemoryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, serde_json::Value)>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let mut m = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match m.get(key) {
            Some((at, v)) if at.elapsed() <= self.ttl => Ok(Some(v.clone())),
            Some(_) => {
                m.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let mut m = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        m.insert(key.to_string(), (Instant::now(), value.clone()));
        Ok(())
    }
}
