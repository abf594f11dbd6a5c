//! Text generator error types.

use std::time::Duration;

/// Errors from a text generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// No backend is configured (missing credentials, disabled feature)
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// The backend did not answer in time
    #[error("generator timed out after {0:?}")]
    Timeout(Duration),

    /// Rate limited by the backend
    #[error("rate limited by generator backend")]
    RateLimited,

    /// The backend answered with an error
    #[error("generator backend error: {0}")]
    Upstream(String),
}
