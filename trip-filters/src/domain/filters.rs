//! The travel filter set returned to callers.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TripType;

/// Length of a return trip when nothing says otherwise.
pub const DEFAULT_TRIP_DAYS: u64 = 7;

/// Wire names of the typed filter keys.
pub mod keys {
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
    pub const FROM_DATE: &str = "fromDate";
    pub const TO_DATE: &str = "toDate";
    pub const PASSENGERS: &str = "passengers";
    pub const TRIP: &str = "trip";
    pub const SEARCH_CONTEXT: &str = "searchContext";
    pub const WARNINGS: &str = "warnings";

    /// Every key with a typed field. Nothing else may shadow these.
    pub const TYPED: [&str; 8] = [
        FROM,
        TO,
        FROM_DATE,
        TO_DATE,
        PASSENGERS,
        TRIP,
        SEARCH_CONTEXT,
        WARNINGS,
    ];
}

/// A complete set of travel search filters.
///
/// Serializes as a flat JSON object:
///
/// ```json
/// {"from": "New York", "to": "London", "fromDate": "2025-01-01",
///  "toDate": "2025-01-15", "passengers": 1, "trip": "Round-Trip"}
/// ```
///
/// `toDate` is always written, as `null` for one-way trips. `searchContext`
/// and `warnings` are written only when present. Keys accepted from a
/// generic AI response that have no typed field live in `extra` and are
/// flattened into the same object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelFilterSet {
    /// Origin location.
    pub from: String,

    /// Destination location.
    pub to: String,

    /// Departure date.
    pub from_date: NaiveDate,

    /// Return date; `None` for one-way trips.
    pub to_date: Option<NaiveDate>,

    /// Number of travellers.
    pub passengers: u32,

    /// One-way or round trip.
    pub trip: TripType,

    /// Free-text description of the search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_context: Option<String>,

    /// Non-fatal input warnings (screened path only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Additional accepted keys without a typed field.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TravelFilterSet {
    /// Create a filter set with no context, warnings or extra keys.
    ///
    /// The return date is dropped for one-way trips.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        from_date: NaiveDate,
        to_date: Option<NaiveDate>,
        passengers: u32,
        trip: TripType,
    ) -> Self {
        let mut filters = Self {
            from: from.into(),
            to: to.into(),
            from_date,
            to_date,
            passengers,
            trip,
            search_context: None,
            warnings: Vec::new(),
            extra: BTreeMap::new(),
        };
        filters.normalize_trip();
        filters
    }

    /// Restore the invariant that `to_date` is absent iff the trip is one-way.
    ///
    /// A round trip without a return date gets the default trip length. A
    /// return date that is present is kept as it is.
    pub fn normalize_trip(&mut self) {
        match (self.trip, self.to_date) {
            (TripType::OneWay, _) => self.to_date = None,
            (TripType::RoundTrip, Some(_)) => {}
            (TripType::RoundTrip, None) => {
                let to_date = self
                    .from_date
                    .checked_add_days(Days::new(DEFAULT_TRIP_DAYS))
                    .unwrap_or(self.from_date);
                self.to_date = Some(to_date);
            }
        }
    }

    /// Returns the value stored under a wire key, as it would serialize.
    pub fn value(&self, key: &str) -> Option<Value> {
        match key {
            keys::FROM => Some(Value::from(self.from.as_str())),
            keys::TO => Some(Value::from(self.to.as_str())),
            keys::FROM_DATE => Some(Value::from(self.from_date.to_string())),
            keys::TO_DATE => Some(
                self.to_date
                    .map_or(Value::Null, |d| Value::from(d.to_string())),
            ),
            keys::PASSENGERS => Some(Value::from(self.passengers)),
            keys::TRIP => Some(Value::from(self.trip.as_str())),
            keys::SEARCH_CONTEXT => self.search_context.as_deref().map(Value::from),
            keys::WARNINGS if !self.warnings.is_empty() => Some(Value::from(self.warnings.clone())),
            keys::WARNINGS => None,
            other => self.extra.get(other).cloned(),
        }
    }

    /// Serialize as a JSON object.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Serialize as JSON indented with four spaces.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
