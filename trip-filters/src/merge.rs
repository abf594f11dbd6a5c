//! Folding a generator response onto default filters.
//!
//! The fallback chain is structured filters, then a filtered generic map,
//! then the defaults untouched. Nothing here fails: every path returns a
//! complete filter set.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::{TravelFilterSet, TripType, keys};
use crate::sanitize::{self, PASSENGER_RANGE, StructuredFilters};

/// Longest generic-map key accepted.
pub const MAX_KEY_LENGTH: usize = 50;

/// Longest stringified generic-map value accepted, in characters.
pub const MAX_VALUE_LENGTH: usize = 200;

const FORBIDDEN_VALUE_CHARS: [char; 6] = ['<', '>', '"', '\'', '&', ';'];

static FILTER_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("filter key pattern must compile")
});

/// The filters used when nothing better is known.
///
/// Dates are offsets from "today" so that one value serves every request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    pub from: String,
    pub to: String,
    /// Days from today to departure.
    pub departure_offset_days: u64,
    /// Days from today to return.
    pub return_offset_days: u64,
    pub passengers: u32,
    pub trip: TripType,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            from: "New York".to_string(),
            to: "Los Angeles".to_string(),
            departure_offset_days: 7,
            return_offset_days: 14,
            passengers: 1,
            trip: TripType::RoundTrip,
        }
    }
}

impl FilterDefaults {
    /// The default filter set for a given day.
    pub fn filters_for(&self, today: NaiveDate) -> TravelFilterSet {
        let offset = |days| today.checked_add_days(Days::new(days)).unwrap_or(today);
        TravelFilterSet::new(
            self.from.clone(),
            self.to.clone(),
            offset(self.departure_offset_days),
            Some(offset(self.return_offset_days)),
            self.passengers,
            self.trip,
        )
    }
}

/// Which link of the fallback chain supplied the merged values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeSource {
    Structured,
    GenericMap,
    Defaults,
}

/// Builds filter sets from defaults, raw input and generator output.
#[derive(Debug, Clone, Default)]
pub struct FilterMerger {
    defaults: FilterDefaults,
}

impl FilterMerger {
    pub fn new(defaults: FilterDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &FilterDefaults {
        &self.defaults
    }

    /// Build filters for `raw_input`, improved by `ai_response` if usable.
    ///
    /// Without raw input the defaults are returned as they are. Otherwise
    /// the response is merged and, if it supplied no search context, the
    /// raw input becomes the context.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use trip_filters::merge::FilterMerger;
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    /// let merger = FilterMerger::default();
    ///
    /// let filters = merger.build_filters(
    ///     Some("Boston to Seattle for 2"),
    ///     Some(r#"{"from":"Boston","to":"Seattle","passengers":2}"#),
    ///     today,
    /// );
    /// assert_eq!(filters.from, "Boston");
    /// assert_eq!(filters.passengers, 2);
    /// assert_eq!(filters.search_context.as_deref(), Some("Boston to Seattle for 2"));
    /// ```
    pub fn build_filters(
        &self,
        raw_input: Option<&str>,
        ai_response: Option<&str>,
        today: NaiveDate,
    ) -> TravelFilterSet {
        let mut filters = self.defaults.filters_for(today);
        let Some(raw_input) = raw_input else {
            return filters;
        };

        if let Some(response) = ai_response {
            merge_response(&mut filters, response);
        }
        if filters.search_context.is_none() {
            filters.search_context = Some(raw_input.to_string());
        }
        filters
    }
}

/// Merge one generator response onto `filters` in place.
///
/// Structured filters win outright. If they fail validation the response
/// is read as a generic map and only safe entries are taken. If that also
/// fails, `filters` is left as it was.
pub fn merge_response(filters: &mut TravelFilterSet, response: &str) -> MergeSource {
    let structured = sanitize::validate_structured(response);
    let source = match structured.into_result() {
        Ok(structured) => {
            apply_structured(filters, &structured);
            info!("merged structured response into filters");
            MergeSource::Structured
        }
        Err(reason) => {
            debug!(%reason, "structured validation failed, trying generic map");
            match sanitize::validate_generic_map(response).into_result() {
                Ok(map) => {
                    let accepted = apply_generic(filters, map);
                    info!(accepted, "merged generic response into filters");
                    MergeSource::GenericMap
                }
                Err(reason) => {
                    debug!(%reason, "generic map validation failed, keeping defaults");
                    MergeSource::Defaults
                }
            }
        }
    };
    filters.normalize_trip();
    source
}

fn apply_structured(filters: &mut TravelFilterSet, structured: &StructuredFilters) {
    if let Some(from) = &structured.from {
        filters.from.clone_from(from);
    }
    if let Some(to) = &structured.to {
        filters.to.clone_from(to);
    }
    if let Some(from_date) = structured.from_date {
        filters.from_date = from_date;
    }
    if let Some(to_date) = structured.to_date {
        filters.to_date = Some(to_date);
    }
    if let Some(passengers) = structured.passenger_count() {
        filters.passengers = passengers;
    }
    if let Some(trip) = structured.trip_type() {
        filters.trip = trip;
    }
    if let Some(context) = &structured.search_context {
        filters.search_context = Some(context.clone());
    }
}

/// Apply every acceptable entry; returns how many were taken.
fn apply_generic(filters: &mut TravelFilterSet, map: Map<String, Value>) -> usize {
    let mut accepted = 0;
    for (key, value) in map {
        if !is_valid_filter_key(&key) || !is_valid_filter_value(&value) {
            debug!(key_length = key.len(), "skipping unsafe generic entry");
            continue;
        }
        if apply_entry(filters, key, value) {
            accepted += 1;
        }
    }
    accepted
}

/// Store one entry under its typed field, or in `extra` if it has none.
///
/// Returns false if a typed key's value has the wrong shape.
fn apply_entry(filters: &mut TravelFilterSet, key: String, value: Value) -> bool {
    match key.as_str() {
        keys::FROM => set_from_str(&value, |s| filters.from = s.to_string()),
        keys::TO => set_from_str(&value, |s| filters.to = s.to_string()),
        keys::SEARCH_CONTEXT => {
            set_from_str(&value, |s| filters.search_context = Some(s.to_string()))
        }
        keys::FROM_DATE => match as_date(&value) {
            Some(date) => {
                filters.from_date = date;
                true
            }
            None => false,
        },
        keys::TO_DATE => match as_date(&value) {
            Some(date) => {
                filters.to_date = Some(date);
                true
            }
            None => false,
        },
        keys::PASSENGERS => match as_passengers(&value) {
            Some(passengers) => {
                filters.passengers = passengers;
                true
            }
            None => false,
        },
        keys::TRIP => match value.as_str().and_then(|s| TripType::parse(s).ok()) {
            Some(trip) => {
                filters.trip = trip;
                true
            }
            None => false,
        },
        // Set by screening only
        keys::WARNINGS => false,
        _ => {
            filters.extra.insert(key, value);
            true
        }
    }
}

fn set_from_str(value: &Value, set: impl FnOnce(&str)) -> bool {
    match value.as_str() {
        Some(s) => {
            set(s);
            true
        }
        None => false,
    }
}

fn as_date(value: &Value) -> Option<NaiveDate> {
    value.as_str()?.parse().ok()
}

fn as_passengers(value: &Value) -> Option<u32> {
    let count = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    if !PASSENGER_RANGE.contains(&count) {
        return None;
    }
    u32::try_from(count).ok()
}

/// Returns true for identifier-like keys of at most fifty characters.
pub fn is_valid_filter_key(key: &str) -> bool {
    key.len() <= MAX_KEY_LENGTH && FILTER_KEY.is_match(key)
}

/// Returns true for non-null values that stringify to short, inert text.
///
/// Strings are checked as they are; other values by their JSON text.
pub fn is_valid_filter_value(value: &Value) -> bool {
    let text: Cow<'_, str> = match value {
        Value::Null => return false,
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    };
    text.chars().count() <= MAX_VALUE_LENGTH && !text.contains(&FORBIDDEN_VALUE_CHARS[..])
}
