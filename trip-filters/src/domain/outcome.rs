//! Validation outcomes.

/// Result of validating untrusted input.
///
/// There is no partial success: a value is either fully usable or carries
/// the reason it was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T> {
    /// The input passed every check.
    Valid(T),
    /// The input was rejected.
    Invalid(String),
}

impl<T> ValidationOutcome<T> {
    /// Create a rejection with the given reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        ValidationOutcome::Invalid(reason.into())
    }

    /// Returns true if the input was accepted.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    /// Returns the accepted value, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            ValidationOutcome::Valid(data) => Some(data),
            ValidationOutcome::Invalid(_) => None,
        }
    }

    /// Consumes the outcome, returning the accepted value if any.
    pub fn into_data(self) -> Option<T> {
        match self {
            ValidationOutcome::Valid(data) => Some(data),
            ValidationOutcome::Invalid(_) => None,
        }
    }

    /// Returns the rejection reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Valid(_) => None,
            ValidationOutcome::Invalid(reason) => Some(reason),
        }
    }

    /// Transform the accepted value, keeping a rejection as-is.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationOutcome<U> {
        match self {
            ValidationOutcome::Valid(data) => ValidationOutcome::Valid(f(data)),
            ValidationOutcome::Invalid(reason) => ValidationOutcome::Invalid(reason),
        }
    }

    /// Convert into a `Result`, with the rejection reason as the error.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            ValidationOutcome::Valid(data) => Ok(data),
            ValidationOutcome::Invalid(reason) => Err(reason),
        }
    }
}
