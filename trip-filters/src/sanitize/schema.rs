//! Typed shapes expected from the text generator, with their constraints.
//!
//! Deserialization only checks JSON types; [`Schema::violations`] checks
//! everything else. Unknown fields are ignored.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TripType;

const MAX_LOCATION_CHARS: usize = 100;
const MAX_SEARCH_CONTEXT_CHARS: usize = 500;
const MAX_ADVICE_CHARS: usize = 2000;
const MAX_CATEGORY_CHARS: usize = 100;
const MAX_RECOMMENDATION_CHARS: usize = 200;
const MAX_WARNING_CHARS: usize = 200;
const MAX_CONTENT_CHARS: usize = 5000;
const MAX_ERROR_CHARS: usize = 100;

/// Passenger counts accepted from the generator.
pub const PASSENGER_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// Response kinds a generic response may declare.
pub const RESPONSE_TYPES: [&str; 4] = [
    "travel_search",
    "location_extraction",
    "travel_advice",
    "explanation",
];

static COORDINATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]{1,3}\.[0-9]{1,10}$").expect("coordinate pattern must compile")
});

/// Field-level constraints for a deserialized response.
pub trait Schema {
    /// Every constraint the value breaks, in field order. Empty if valid.
    fn violations(&self) -> Vec<&'static str>;
}

fn too_long(value: &Option<String>, max: usize) -> bool {
    value.as_ref().is_some_and(|s| s.chars().count() > max)
}

fn blank(value: &Option<String>) -> bool {
    value.as_ref().is_none_or(|s| s.trim().is_empty())
}

fn confidence_out_of_range(value: Option<f64>) -> bool {
    value.is_some_and(|c| !(0.0..=1.0).contains(&c))
}

fn bad_coordinate(value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|s| !COORDINATE.is_match(s))
}

/// Travel search filters as proposed by the generator.
///
/// Every field is optional; present fields are bounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredFilters {
    pub from: Option<String>,
    pub to: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub passengers: Option<i64>,
    pub trip: Option<String>,
    pub search_context: Option<String>,
}

impl StructuredFilters {
    /// The trip type, if present and well-formed.
    pub fn trip_type(&self) -> Option<TripType> {
        self.trip.as_deref().and_then(|t| TripType::parse(t).ok())
    }

    /// The passenger count, if present and in range.
    pub fn passenger_count(&self) -> Option<u32> {
        self.passengers
            .filter(|n| PASSENGER_RANGE.contains(n))
            .and_then(|n| u32::try_from(n).ok())
    }
}

impl Schema for StructuredFilters {
    fn violations(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if too_long(&self.from, MAX_LOCATION_CHARS) {
            out.push("From location must be less than 100 characters");
        }
        if too_long(&self.to, MAX_LOCATION_CHARS) {
            out.push("To location must be less than 100 characters");
        }
        if let Some(n) = self.passengers {
            if n < *PASSENGER_RANGE.start() {
                out.push("Passengers must be at least 1");
            } else if n > *PASSENGER_RANGE.end() {
                out.push("Passengers cannot exceed 10");
            }
        }
        if self.trip.is_some() && self.trip_type().is_none() {
            out.push("Trip type must be 'One-Way' or 'Round-Trip'");
        }
        if too_long(&self.search_context, MAX_SEARCH_CONTEXT_CHARS) {
            out.push("Search context must be less than 500 characters");
        }
        out
    }
}

/// A single place extracted from a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationExtraction {
    pub location: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    /// Signed decimal degrees, e.g. `"48.8566"`.
    pub latitude: Option<String>,
    /// Signed decimal degrees, e.g. `"-2.3522"`.
    pub longitude: Option<String>,
    pub confidence: Option<f64>,
}

impl Schema for LocationExtraction {
    fn violations(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if blank(&self.location) {
            out.push("Location name is required");
        }
        if too_long(&self.location, MAX_LOCATION_CHARS) {
            out.push("Location name must be less than 100 characters");
        }
        if too_long(&self.country, MAX_LOCATION_CHARS) {
            out.push("Country must be less than 100 characters");
        }
        if too_long(&self.city, MAX_LOCATION_CHARS) {
            out.push("City must be less than 100 characters");
        }
        if bad_coordinate(&self.latitude) {
            out.push("Invalid latitude format");
        }
        if bad_coordinate(&self.longitude) {
            out.push("Invalid longitude format");
        }
        if confidence_out_of_range(self.confidence) {
            out.push("Confidence must be between 0 and 1");
        }
        out
    }
}

/// Free-form travel advice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelAdvice {
    pub response: Option<String>,
    pub category: Option<String>,
    pub recommendations: Option<Vec<String>>,
    pub confidence: Option<f64>,
    pub warning: Option<String>,
}

impl TravelAdvice {
    /// Category given to advice that arrived as plain text.
    pub const PLAIN_TEXT_CATEGORY: &'static str = "general";

    /// Confidence given to advice that arrived as plain text.
    pub const PLAIN_TEXT_CONFIDENCE: f64 = 0.8;

    /// Wrap plain text as advice with the default category and confidence.
    pub fn from_plain_text(text: &str) -> Self {
        Self {
            response: Some(text.trim().to_string()),
            category: Some(Self::PLAIN_TEXT_CATEGORY.to_string()),
            recommendations: None,
            confidence: Some(Self::PLAIN_TEXT_CONFIDENCE),
            warning: None,
        }
    }
}

impl Schema for TravelAdvice {
    fn violations(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if blank(&self.response) {
            out.push("Response text is required");
        }
        if too_long(&self.response, MAX_ADVICE_CHARS) {
            out.push("Response text must be less than 2000 characters");
        }
        if too_long(&self.category, MAX_CATEGORY_CHARS) {
            out.push("Category must be less than 100 characters");
        }
        let long_recommendation = self
            .recommendations
            .iter()
            .flatten()
            .any(|r| r.chars().count() > MAX_RECOMMENDATION_CHARS);
        if long_recommendation {
            out.push("Recommendation must be less than 200 characters");
        }
        if confidence_out_of_range(self.confidence) {
            out.push("Confidence must be between 0 and 1");
        }
        if too_long(&self.warning, MAX_WARNING_CHARS) {
            out.push("Warning must be less than 200 characters");
        }
        out
    }
}

/// A typed envelope around any generator output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericResponse {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Option<String>,
    pub confidence: Option<f64>,
    pub error: Option<String>,
    pub data: Option<Value>,
}

impl Schema for GenericResponse {
    fn violations(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        match self.kind.as_deref() {
            None => out.push("Response type is required"),
            Some(kind) if !RESPONSE_TYPES.contains(&kind) => out.push("Invalid response type"),
            Some(_) => {}
        }
        if blank(&self.content) {
            out.push("Content is required");
        }
        if too_long(&self.content, MAX_CONTENT_CHARS) {
            out.push("Content must be less than 5000 characters");
        }
        if confidence_out_of_range(self.confidence) {
            out.push("Confidence must be between 0 and 1");
        }
        if too_long(&self.error, MAX_ERROR_CHARS) {
            out.push("Error message must be less than 100 characters");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_filters_within_bounds() {
        let filters = StructuredFilters {
            from: Some("New York".into()),
            to: Some("London".into()),
            passengers: Some(2),
            trip: Some("Round-Trip".into()),
            ..Default::default()
        };
        assert!(filters.violations().is_empty());
        assert_eq!(filters.trip_type(), Some(TripType::RoundTrip));
        assert_eq!(filters.passenger_count(), Some(2));
    }

    #[test]
    fn structured_filters_report_every_violation() {
        let filters = StructuredFilters {
            from: Some("x".repeat(101)),
            passengers: Some(11),
            trip: Some("Multi-City".into()),
            search_context: Some("y".repeat(501)),
            ..Default::default()
        };
        assert_eq!(
            filters.violations(),
            vec![
                "From location must be less than 100 characters",
                "Passengers cannot exceed 10",
                "Trip type must be 'One-Way' or 'Round-Trip'",
                "Search context must be less than 500 characters",
            ]
        );
    }

    #[test]
    fn passenger_lower_bound() {
        let filters = StructuredFilters {
            passengers: Some(0),
            ..Default::default()
        };
        assert_eq!(filters.violations(), vec!["Passengers must be at least 1"]);
        assert_eq!(filters.passenger_count(), None);
    }

    #[test]
    fn length_limits_are_inclusive() {
        let filters = StructuredFilters {
            to: Some("z".repeat(100)),
            ..Default::default()
        };
        assert!(filters.violations().is_empty());
    }

    #[test]
    fn location_requires_name_and_valid_coordinates() {
        let location = LocationExtraction {
            location: Some("  ".into()),
            latitude: Some("48.8566".into()),
            longitude: Some("east".into()),
            confidence: Some(1.5),
            ..Default::default()
        };
        assert_eq!(
            location.violations(),
            vec![
                "Location name is required",
                "Invalid longitude format",
                "Confidence must be between 0 and 1",
            ]
        );
    }

    #[test]
    fn coordinate_format() {
        for good in ["0.0", "-33.8688", "151.2093", "-180.0000000001"] {
            assert!(!bad_coordinate(&Some(good.into())), "{good}");
        }
        for bad in ["48", "48.", ".5", "1234.5", "48.12345678901", "+1.5", "1,5"] {
            assert!(bad_coordinate(&Some(bad.into())), "{bad}");
        }
    }

    #[test]
    fn confidence_bounds_inclusive() {
        assert!(!confidence_out_of_range(Some(0.0)));
        assert!(!confidence_out_of_range(Some(1.0)));
        assert!(!confidence_out_of_range(None));
        assert!(confidence_out_of_range(Some(-0.01)));
        assert!(confidence_out_of_range(Some(1.01)));
    }

    #[test]
    fn advice_from_plain_text() {
        let advice = TravelAdvice::from_plain_text("  Pack an umbrella.  ");
        assert_eq!(advice.response.as_deref(), Some("Pack an umbrella."));
        assert_eq!(advice.category.as_deref(), Some("general"));
        assert_eq!(advice.confidence, Some(0.8));
        assert!(advice.violations().is_empty());
    }

    #[test]
    fn advice_checks_each_recommendation() {
        let advice = TravelAdvice {
            response: Some("Go in spring".into()),
            recommendations: Some(vec!["short".into(), "r".repeat(201)]),
            ..Default::default()
        };
        assert_eq!(
            advice.violations(),
            vec!["Recommendation must be less than 200 characters"]
        );
    }

    #[test]
    fn generic_response_type_enumeration() {
        let mut response = GenericResponse {
            kind: Some("explanation".into()),
            content: Some("Because.".into()),
            ..Default::default()
        };
        assert!(response.violations().is_empty());

        response.kind = Some("poem".into());
        assert_eq!(response.violations(), vec!["Invalid response type"]);

        response.kind = None;
        response.content = None;
        assert_eq!(
            response.violations(),
            vec!["Response type is required", "Content is required"]
        );
    }

    #[test]
    fn generic_response_reads_type_key() {
        let parsed: GenericResponse =
            serde_json::from_str(r#"{"type": "travel_advice", "content": "hi", "data": [1]}"#)
                .unwrap();
        assert_eq!(parsed.kind.as_deref(), Some("travel_advice"));
        assert_eq!(parsed.data, Some(serde_json::json!([1])));
    }
}
