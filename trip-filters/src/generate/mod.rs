//! The seam to an external text generator.
//!
//! The filter pipeline never talks to a model directly. It renders a prompt,
//! hands it to a [`TextGenerator`] and treats any failure as "no response".

mod cache;
mod error;

pub use cache::{CacheConfig, CachedGenerator};
pub use error::GenerateError;

use std::future::Future;

/// Placeholder replaced by the user's search text in a prompt template.
pub const SEARCH_INPUT_PLACEHOLDER: &str = "{searchInput}";

/// Trait for producing text from a prompt.
///
/// This abstraction allows the service to be tested without a model.
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    fn generate(&self, prompt: &str)
    -> impl Future<Output = Result<String, GenerateError>> + Send;

    /// Returns false if calls are known to fail, so callers can skip them.
    fn is_available(&self) -> bool {
        true
    }
}

/// Substitute `search_input` for every placeholder in `template`.
///
/// # Examples
///
/// ```
/// use trip_filters::generate::render_prompt;
///
/// let prompt = render_prompt("Extract from: {searchInput} and analyze {searchInput}", "Rome");
/// assert_eq!(prompt, "Extract from: Rome and analyze Rome");
/// ```
pub fn render_prompt(template: &str, search_input: &str) -> String {
    template.replace(SEARCH_INPUT_PLACEHOLDER, search_input)
}

/// A generator for deployments without a backend. Every call fails.
#[derive(Debug, Clone, Default)]
pub struct Unconfigured;

impl TextGenerator for Unconfigured {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        Err(GenerateError::NotConfigured(
            "no text generator backend".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }
}
