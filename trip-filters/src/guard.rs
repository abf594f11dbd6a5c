//! Screening of raw search text.
//!
//! Runs before anything else on the screened entry point. Every applicable
//! rule is evaluated so the caller sees all problems at once; only blank
//! input short-circuits.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::ValidationOutcome;

/// Shortest accepted input, in characters.
pub const MIN_LENGTH: usize = 3;

/// Longest accepted input, in characters.
pub const MAX_LENGTH: usize = 500;

/// Fewest whitespace-separated words accepted.
pub const MIN_WORDS: usize = 5;

/// Inputs longer than this are expected to mention travel.
const KEYWORD_CHECK_MIN_LENGTH: usize = 20;

static SQL_INJECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)union|select|insert|update|delete|drop|create|alter|exec|execute|script|javascript|vbscript|onload|onerror",
    )
    .expect("SQL pattern must compile")
});

static XSS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<script|</script|<iframe|</iframe|<object|</object|<embed|</embed|javascript:|vbscript:|onload=|onerror=|onclick=",
    )
    .expect("XSS pattern must compile")
});

static EXCESS_SPECIAL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[<>"'&;{}\[\]]{5,}"#).expect("special character pattern must compile")
});

static VALID_CHARACTERS: LazyLock<Regex> = LazyLock::new(|| {
    // ASCII whitespace only; a no-break space is unusual
    Regex::new(r"^[a-zA-Z0-9 \t\n\r\x0B\x0C\-,.():/]+$")
        .expect("character pattern must compile")
});

static TRAVEL_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:to|from|flight|trip|travel|hotel|car rental|vacation|destination)\b")
        .expect("keyword pattern must compile")
});

/// Result of screening one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenReport {
    /// Fatal problems. Empty iff the input is acceptable.
    pub errors: Vec<String>,
    /// Non-fatal observations; may be present on valid input.
    pub warnings: Vec<String>,
}

impl ScreenReport {
    /// Returns true if no rule rejected the input.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Pair the report with the text it describes.
    ///
    /// A rejection joins all error messages with `"; "`.
    pub fn into_outcome(self, text: &str) -> ValidationOutcome<SanitizedText> {
        if self.is_valid() {
            ValidationOutcome::Valid(SanitizedText {
                text: text.to_string(),
                warnings: self.warnings,
            })
        } else {
            ValidationOutcome::Invalid(self.errors.join("; "))
        }
    }
}

/// Search text that passed screening, with any warnings it raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedText {
    text: String,
    warnings: Vec<String>,
}

impl SanitizedText {
    /// The text as submitted.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Warnings raised while screening.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Check raw search text against the length, word-count, security and
/// content rules.
///
/// # Examples
///
/// ```
/// use trip_filters::guard::screen;
///
/// let report = screen("SELECT * FROM users");
/// assert!(!report.is_valid());
/// assert!(report.errors.iter().any(|e| e.contains("SQL injection")));
///
/// let report = screen("I want to book a flight from New York to London in July");
/// assert!(report.is_valid());
/// assert!(report.warnings.is_empty());
/// ```
pub fn screen(input: &str) -> ScreenReport {
    let mut report = ScreenReport::default();

    if input.trim().is_empty() {
        report
            .errors
            .push("Search input cannot be empty".to_string());
        return report;
    }

    let length = input.chars().count();
    if length < MIN_LENGTH {
        report
            .errors
            .push(format!("Input must be at least {MIN_LENGTH} characters long"));
    } else if length > MAX_LENGTH {
        report
            .errors
            .push(format!("Input cannot exceed {MAX_LENGTH} characters"));
    }

    if input.split_whitespace().count() < MIN_WORDS {
        report
            .errors
            .push(format!("Input must contain at least {MIN_WORDS} words"));
    }

    if SQL_INJECTION.is_match(input) {
        report
            .errors
            .push("Input contains potential SQL injection attempt".to_string());
    }
    if XSS.is_match(input) {
        report
            .errors
            .push("Input contains potential XSS attack attempt".to_string());
    }
    if EXCESS_SPECIAL_CHARS.is_match(input) {
        report
            .errors
            .push("Input contains excessive special characters".to_string());
    }

    if !VALID_CHARACTERS.is_match(input) {
        report
            .warnings
            .push("Input contains unusual characters".to_string());
    }
    if length > KEYWORD_CHECK_MIN_LENGTH && !TRAVEL_KEYWORDS.is_match(input) {
        report
            .warnings
            .push("No travel-related keywords detected in input".to_string());
    }

    report
}

/// Screen `input` and pair the verdict with the text.
pub fn screen_text(input: &str) -> ValidationOutcome<SanitizedText> {
    screen(input).into_outcome(input)
}
