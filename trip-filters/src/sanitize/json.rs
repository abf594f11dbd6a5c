//! Locating and screening JSON inside model output.

use std::sync::LazyLock;

use regex::Regex;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fence pattern must compile")
});

static UNSAFE_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)script|javascript|<|>|eval|exec|system|cmd")
        .expect("unsafe content pattern must compile")
});

/// Find the JSON payload in a model response.
///
/// A fenced code block (with or without a `json` tag) wins. Otherwise the
/// trimmed response is used if it looks like a single object or array.
/// Returns `None` when neither applies.
///
/// # Examples
///
/// ```
/// use trip_filters::sanitize::extract_json;
///
/// let fenced = "Here you go:\n```json\n{\"to\": \"Rome\"}\n```";
/// assert_eq!(extract_json(fenced), Some("{\"to\": \"Rome\"}"));
///
/// assert_eq!(extract_json("  [1, 2]  "), Some("[1, 2]"));
/// assert_eq!(extract_json("no json here"), None);
/// ```
pub fn extract_json(response: &str) -> Option<&str> {
    if response.trim().is_empty() {
        return None;
    }

    if let Some(inner) = CODE_FENCE.captures(response).and_then(|c| c.get(1)) {
        return Some(inner.as_str().trim());
    }

    let trimmed = response.trim();
    let object = trimmed.starts_with('{') && trimmed.ends_with('}');
    let array = trimmed.starts_with('[') && trimmed.ends_with(']');
    (object || array).then_some(trimmed)
}

/// Returns true if the content carries markup or code-execution keywords.
pub fn contains_unsafe_content(content: &str) -> bool {
    UNSAFE_CONTENT.is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_with_tag() {
        let response = "```json\n{\"from\": \"Paris\", \"to\": \"Rome\"}\n```";
        assert_eq!(
            extract_json(response),
            Some("{\"from\": \"Paris\", \"to\": \"Rome\"}")
        );
    }

    #[test]
    fn fenced_block_without_tag() {
        let response = "Sure!\n```\n{\"a\": 1}\n```\nAnything else?";
        assert_eq!(extract_json(response), Some("{\"a\": 1}"));
    }

    #[test]
    fn fence_preferred_over_surrounding_braces() {
        let response = "{ preamble ```json {\"inner\": true} ``` }";
        assert_eq!(extract_json(response), Some("{\"inner\": true}"));
    }

    #[test]
    fn bare_object_or_array() {
        assert_eq!(extract_json("\n {\"a\": 1} \n"), Some("{\"a\": 1}"));
        assert_eq!(extract_json("[{\"a\": 1}]"), Some("[{\"a\": 1}]"));
    }

    #[test]
    fn mismatched_brackets_rejected() {
        assert_eq!(extract_json("{\"a\": 1]"), None);
        assert_eq!(extract_json("[1, 2}"), None);
        assert_eq!(extract_json("{ \"from\": \"Paris\", \"to\": incomplete"), None);
    }

    #[test]
    fn blank_or_prose_has_no_json() {
        assert_eq!(extract_json(""), None);
        assert_eq!(extract_json("   "), None);
        assert_eq!(extract_json("Paris is lovely in spring."), None);
    }

    #[test]
    fn unsafe_content_detection() {
        assert!(contains_unsafe_content("<script>alert(1)</script>"));
        assert!(contains_unsafe_content("eval('x')"));
        assert!(contains_unsafe_content("run CMD.exe"));
        assert!(contains_unsafe_content("a > b"));
        assert!(contains_unsafe_content("operating SYSTEM"));
        assert!(!contains_unsafe_content("{\"from\": \"Boston\", \"to\": \"Seattle\"}"));
    }
}
