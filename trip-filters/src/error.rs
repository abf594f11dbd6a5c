//! Error types surfaced to callers.
//!
//! Most failures in this crate are absorbed into fallbacks. These are the
//! ones a caller has to handle.

use std::path::PathBuf;

/// Errors from building filters on the screened path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// Screening rejected the search text
    #[error("input rejected: {}", errors.join("; "))]
    InputRejected { errors: Vec<String> },
}

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading a file failed
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this structure
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Settings that cannot work together
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FilterError::InputRejected {
            errors: vec![
                "Input must contain at least 5 words".into(),
                "Input contains potential SQL injection attempt".into(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "input rejected: Input must contain at least 5 words; \
             Input contains potential SQL injection attempt"
        );

        let err = ConfigError::Invalid("generator timeout must be positive");
        assert_eq!(
            err.to_string(),
            "invalid config: generator timeout must be positive"
        );
    }
}
