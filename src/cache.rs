use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::api::GeneratedPoem;
use crate::topic::{LineCount, Topic};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResponseCacheKey {
    pub request_hash: String,
}

impl ResponseCacheKey {
    pub fn new(topic: &Topic, lines: LineCount) -> Self {
        Self {
            request_hash: compute_request_hash(topic, lines),
        }
    }
}

/// Last successful poem per (topic, line count).
pub struct ResponseCache {
    cache_dir: PathBuf,
}

impl ResponseCache {
    pub async fn new() -> Result<Self> {
        Self::at(get_cache_directory()?).await
    }

    pub async fn at(cache_dir: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&cache_dir)
            .await
            .context("Failed to create cache directory")?;

        Ok(Self { cache_dir })
    }

    pub async fn get(&self, key: &ResponseCacheKey) -> Option<GeneratedPoem> {
        match cacache::read(&self.cache_dir, &key.request_hash).await {
            Ok(data) => serde_json::from_slice(&data)
                .inspect_err(|err| warn!(error = %err, "Discarding unreadable cached poem"))
                .ok(),
            Err(err) => {
                debug!(error = %err, "No cached poem");
                None
            }
        }
    }

    pub async fn insert(&self, key: ResponseCacheKey, value: &GeneratedPoem) {
        let serialized = match serde_json::to_vec(value) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(error = %err, "Failed to serialize poem for cache");
                return;
            }
        };
        if let Err(err) = cacache::write(&self.cache_dir, &key.request_hash, serialized).await {
            warn!(error = %err, "Failed to write poem to cache");
        }
    }
}

fn get_cache_directory() -> Result<PathBuf> {
    let cache_base = dirs::cache_dir().context("Failed to determine cache directory")?;
    Ok(cache_base.join(env!("CARGO_CRATE_NAME")))
}

pub fn compute_request_hash(topic: &Topic, lines: LineCount) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(topic.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update([lines.count()]);
    format!("{:x}", hasher.finalize())
}
