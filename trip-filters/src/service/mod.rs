//! The filter service: search text in, complete filter set out.
//!
//! Two entry points build filters with the help of a text generator:
//!
//! - [`FilterService::filters_from_raw_text`] takes the text as it is.
//! - [`FilterService::filters_from_screened_text`] screens it first and
//!   refuses text that fails screening.
//!
//! The generator call is the only await point. It is bounded by the
//! configured timeout, and any failure falls back to the default filters.
//! [`FilterService::rule_based`] is the deterministic path with no generator.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::FilterConfig;
use crate::domain::TravelFilterSet;
use crate::error::FilterError;
use crate::extract;
use crate::generate::{CachedGenerator, GenerateError, TextGenerator, render_prompt};
use crate::guard;
use crate::merge::FilterMerger;

/// Builds travel filters from search text.
pub struct FilterService<G> {
    generator: CachedGenerator<G>,
    config: FilterConfig,
    merger: FilterMerger,
}

impl<G: TextGenerator> FilterService<G> {
    /// Create a service. Responses are cached if the config enables it.
    pub fn new(generator: G, config: FilterConfig) -> Self {
        let generator = if config.cache_enabled {
            CachedGenerator::new(generator, &config.cache_config())
        } else {
            CachedGenerator::passthrough(generator)
        };
        let merger = FilterMerger::new(config.defaults.clone());

        Self {
            generator,
            config,
            merger,
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn generator(&self) -> &CachedGenerator<G> {
        &self.generator
    }

    /// Build filters from unscreened text.
    ///
    /// Without input the defaults are returned and the generator is not
    /// called. This never fails.
    pub async fn filters_from_raw_text(
        &self,
        input: Option<&str>,
        today: NaiveDate,
    ) -> TravelFilterSet {
        let Some(input) = input else {
            info!("no search input, using default filters");
            return self.merger.build_filters(None, None, today);
        };

        let response = self.ai_response(input).await;
        self.merger
            .build_filters(Some(input), response.as_deref(), today)
    }

    /// Screen the text, then build filters from it.
    ///
    /// Screening warnings are attached to the result.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InputRejected`] with every screening error if
    /// the text is rejected. The generator is not called in that case.
    pub async fn filters_from_screened_text(
        &self,
        input: &str,
        today: NaiveDate,
    ) -> Result<TravelFilterSet, FilterError> {
        let report = guard::screen(input);
        if !report.is_valid() {
            info!(errors = report.errors.len(), "search input rejected");
            return Err(FilterError::InputRejected {
                errors: report.errors,
            });
        }

        let mut filters = self.filters_from_raw_text(Some(input), today).await;
        filters.warnings = report.warnings;
        Ok(filters)
    }

    /// Build filters from the text alone, without the generator.
    pub fn rule_based(&self, input: &str, reference_date: NaiveDate) -> TravelFilterSet {
        extract::extract(input, reference_date)
    }

    /// Ask the generator about `search_input`; `None` on any failure.
    async fn ai_response(&self, search_input: &str) -> Option<String> {
        if !self.generator.is_available() {
            debug!("text generator unavailable, using fallback values");
            return None;
        }

        let prompt = render_prompt(&self.config.prompt_template, search_input);
        let timeout = self.config.generator_timeout();
        let result = tokio::time::timeout(timeout, self.generator.generate(&prompt))
            .await
            .unwrap_or(Err(GenerateError::Timeout(timeout)));

        match result {
            Ok(response) => {
                debug!(length = response.len(), "text generator responded");
                Some(response)
            }
            Err(err) => {
                warn!(error = %err, "text generator failed, using fallback values");
                None
            }
        }
    }
}

#[cfg(test)]
mod service_tests;
