//! Caching layer for generator responses.
//!
//! Prompts are rendered from a fixed template, so the same search text
//! always yields the same prompt. Responses are cached by prompt; failures
//! are never cached. A pass-through variant keeps one type whether or not
//! caching is switched on.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use super::{GenerateError, TextGenerator};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Generator with caching.
///
/// Wraps any [`TextGenerator`] and caches successful responses by prompt.
pub struct CachedGenerator<G> {
    inner: G,
    responses: Option<MokaCache<String, String>>,
}

impl<G: TextGenerator> CachedGenerator<G> {
    /// Create a new cached generator.
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let responses = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            responses: Some(responses),
        }
    }

    /// Wrap a generator without caching.
    pub fn passthrough(inner: G) -> Self {
        Self {
            inner,
            responses: None,
        }
    }

    /// Returns true if responses are cached.
    pub fn is_caching(&self) -> bool {
        self.responses.is_some()
    }

    /// The wrapped generator.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.responses.as_ref().map_or(0, |r| r.entry_count())
    }

    /// Apply pending inserts and evictions so that counts are current.
    pub async fn run_pending_tasks(&self) {
        if let Some(responses) = &self.responses {
            responses.run_pending_tasks().await;
        }
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        if let Some(responses) = &self.responses {
            responses.invalidate_all();
        }
    }
}

impl<G: TextGenerator> TextGenerator for CachedGenerator<G> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let Some(responses) = &self.responses else {
            return self.inner.generate(prompt).await;
        };

        if let Some(cached) = responses.get(prompt).await {
            trace!("generator cache hit");
            return Ok(cached);
        }

        let response = self.inner.generate(prompt).await?;
        responses.insert(prompt.to_string(), response.clone()).await;
        Ok(response)
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }
}
