//! Configuration for the filter service.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::generate::{CacheConfig, SEARCH_INPUT_PLACEHOLDER};
use crate::merge::FilterDefaults;
use crate::sanitize::PASSENGER_RANGE;

/// Prompt used when none is configured.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Extract travel search filters from the text below. \
Reply with a single JSON object using only these keys: from, to, fromDate, toDate \
(YYYY-MM-DD), passengers (1-10), trip (\"One-Way\" or \"Round-Trip\"), searchContext. \
Omit keys you cannot determine.\n\nText: {searchInput}";

/// Configuration parameters for building filters.
///
/// Every field has a default, so a config file need only name what it
/// changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Prompt template containing `{searchInput}`.
    pub prompt_template: String,

    /// Read the prompt template from this file instead.
    pub prompt_template_path: Option<PathBuf>,

    /// How long to wait for the generator (seconds).
    pub generator_timeout_secs: u64,

    /// Cache generator responses by prompt.
    pub cache_enabled: bool,

    /// TTL for cached responses (seconds).
    pub cache_ttl_secs: u64,

    /// Maximum number of cached responses.
    pub cache_max_capacity: u64,

    /// Filters used when the generator supplies nothing.
    pub defaults: FilterDefaults,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            prompt_template_path: None,
            generator_timeout_secs: 30,
            cache_enabled: false,
            cache_ttl_secs: 300,
            cache_max_capacity: 1000,
            defaults: FilterDefaults::default(),
        }
    }
}

impl FilterConfig {
    /// Set the prompt template.
    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self.prompt_template_path = None;
        self
    }

    /// Set the generator timeout.
    pub fn with_generator_timeout(mut self, secs: u64) -> Self {
        self.generator_timeout_secs = secs;
        self
    }

    /// Enable response caching with the given TTL.
    pub fn with_cache(mut self, ttl_secs: u64) -> Self {
        self.cache_enabled = true;
        self.cache_ttl_secs = ttl_secs;
        self
    }

    /// Set the default filters.
    pub fn with_defaults(mut self, defaults: FilterDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Returns the generator timeout as a Duration.
    pub fn generator_timeout(&self) -> Duration {
        Duration::from_secs(self.generator_timeout_secs)
    }

    /// Returns the cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Returns the cache settings.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: self.cache_ttl(),
            max_capacity: self.cache_max_capacity,
        }
    }

    /// Parse a config from JSON, then load and check it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.resolved()
    }

    /// Read a config from a JSON file, then load and check it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load the prompt template file, if one is named, and validate.
    pub fn resolved(mut self) -> Result<Self, ConfigError> {
        if let Some(path) = self.prompt_template_path.take() {
            self.prompt_template =
                std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
            self.prompt_template_path = Some(path);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the settings are usable together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.prompt_template.contains(SEARCH_INPUT_PLACEHOLDER) {
            return Err(ConfigError::Invalid(
                "prompt template must contain {searchInput}",
            ));
        }
        if self.generator_timeout_secs == 0 {
            return Err(ConfigError::Invalid("generator timeout must be positive"));
        }
        if self.cache_enabled && (self.cache_ttl_secs == 0 || self.cache_max_capacity == 0) {
            return Err(ConfigError::Invalid(
                "cache TTL and capacity must be positive when caching is enabled",
            ));
        }
        if !PASSENGER_RANGE.contains(&i64::from(self.defaults.passengers)) {
            return Err(ConfigError::Invalid(
                "default passengers must be between 1 and 10",
            ));
        }
        if self.defaults.return_offset_days < self.defaults.departure_offset_days {
            return Err(ConfigError::Invalid(
                "default return must not be before default departure",
            ));
        }
        Ok(())
    }
}
