//! Validation of text produced by the generator.
//!
//! Generator output is untrusted. Every entry point here locates a JSON
//! payload, screens it for markup and code keywords, parses it and checks
//! it against a schema. Failures come back as
//! [`ValidationOutcome::Invalid`] with one of a small set of fixed messages,
//! so nothing from the response is ever echoed to the caller.

pub mod json;
mod schema;

pub use json::{contains_unsafe_content, extract_json};
pub use schema::{
    GenericResponse, LocationExtraction, PASSENGER_RANGE, RESPONSE_TYPES, Schema,
    StructuredFilters, TravelAdvice,
};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::ValidationOutcome;

/// Longest free text accepted, in characters.
pub const MAX_FREE_TEXT_CHARS: usize = 10_000;

pub const NO_JSON: &str = "No valid JSON found in AI response";
pub const UNSAFE_CONTENT: &str = "Invalid response content detected";
pub const MALFORMED_JSON: &str = "Invalid JSON format in AI response";
pub const EMPTY_RESPONSE: &str = "AI response is empty";
pub const TOO_LONG: &str = "AI response exceeds maximum length";
pub const NO_CONTENT: &str = "No valid content found in AI response";

/// Locate the payload and screen it. Parsing is left to the caller.
fn screened_json<'a>(response: &'a str, kind: &str) -> Result<&'a str, &'static str> {
    let json = extract_json(response).ok_or(NO_JSON)?;
    if contains_unsafe_content(json) {
        warn!(kind, "unsafe content in generated response");
        return Err(UNSAFE_CONTENT);
    }
    Ok(json)
}

fn parse<T: DeserializeOwned>(json: &str, kind: &str) -> Result<T, &'static str> {
    serde_json::from_str(json).map_err(|err| {
        // Position only: the error text can quote the payload
        debug!(
            kind,
            line = err.line(),
            column = err.column(),
            category = ?err.classify(),
            "generated response did not parse"
        );
        MALFORMED_JSON
    })
}

/// Collapse schema violations into an outcome.
///
/// The message format is `"Validation errors: m1; m2; "`.
fn checked<T: Schema>(value: T) -> ValidationOutcome<T> {
    let violations = value.violations();
    if violations.is_empty() {
        return ValidationOutcome::Valid(value);
    }
    let mut message = String::from("Validation errors: ");
    for violation in &violations {
        message.push_str(violation);
        message.push_str("; ");
    }
    ValidationOutcome::Invalid(message)
}

/// Extract, screen, parse and schema-check a typed response.
pub fn validate_schema<T>(response: &str, kind: &str) -> ValidationOutcome<T>
where
    T: DeserializeOwned + Schema,
{
    match screened_json(response, kind).and_then(|json| parse::<T>(json, kind)) {
        Ok(value) => checked(value),
        Err(reason) => ValidationOutcome::invalid(reason),
    }
}

/// Validate travel search filters.
///
/// # Examples
///
/// ```
/// use trip_filters::sanitize::validate_structured;
///
/// let outcome = validate_structured(r#"{"from": "Boston", "to": "Seattle", "passengers": 2}"#);
/// let filters = outcome.data().unwrap();
/// assert_eq!(filters.from.as_deref(), Some("Boston"));
/// assert_eq!(filters.passengers, Some(2));
///
/// let outcome = validate_structured(r#"{"passengers": 15}"#);
/// assert_eq!(
///     outcome.reason(),
///     Some("Validation errors: Passengers cannot exceed 10; ")
/// );
/// ```
pub fn validate_structured(response: &str) -> ValidationOutcome<StructuredFilters> {
    validate_schema(response, "travel search filters")
}

/// Validate a single extracted location.
pub fn validate_location(response: &str) -> ValidationOutcome<LocationExtraction> {
    validate_schema(response, "location extraction")
}

/// Validate a typed generic response envelope.
pub fn validate_generic_response(response: &str) -> ValidationOutcome<GenericResponse> {
    validate_schema(response, "generic response")
}

/// Validate travel advice.
///
/// Advice may also arrive as plain prose. Text with no JSON payload is
/// screened and wrapped with [`TravelAdvice::from_plain_text`].
pub fn validate_advice(response: &str) -> ValidationOutcome<TravelAdvice> {
    const KIND: &str = "travel advice";

    if extract_json(response).is_some() {
        return validate_schema(response, KIND);
    }
    if response.trim().is_empty() {
        return ValidationOutcome::invalid(NO_CONTENT);
    }
    if contains_unsafe_content(response) {
        warn!(kind = KIND, "unsafe content in generated response");
        return ValidationOutcome::invalid(UNSAFE_CONTENT);
    }
    debug!("treating plain-text response as general advice");
    checked(TravelAdvice::from_plain_text(response))
}

/// Parse the payload as a JSON object without a schema.
///
/// Values are not inspected beyond the unsafe-content screen; the merge
/// step filters individual entries.
pub fn validate_generic_map(response: &str) -> ValidationOutcome<Map<String, Value>> {
    const KIND: &str = "generic map";

    match screened_json(response, KIND).and_then(|json| parse(json, KIND)) {
        Ok(map) => ValidationOutcome::Valid(map),
        Err(reason) => ValidationOutcome::invalid(reason),
    }
}

/// Accept plain text that is non-empty, short enough and safe.
///
/// The accepted text is trimmed. The length ceiling is checked before the
/// content screen, so over-long text is rejected whatever it contains.
pub fn validate_free_text(response: &str) -> ValidationOutcome<String> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return ValidationOutcome::invalid(EMPTY_RESPONSE);
    }
    if response.chars().count() > MAX_FREE_TEXT_CHARS {
        return ValidationOutcome::invalid(TOO_LONG);
    }
    if contains_unsafe_content(response) {
        warn!(kind = "free text", "unsafe content in generated response");
        return ValidationOutcome::invalid(UNSAFE_CONTENT);
    }
    ValidationOutcome::Valid(trimmed.to_string())
}
