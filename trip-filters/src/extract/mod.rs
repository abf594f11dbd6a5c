//! Rule-based extraction of travel filters from free text.
//!
//! This is the deterministic path: no AI, no clock, no failure modes. Given
//! the same text and reference date it always produces the same complete
//! filter set.
//!
//! Defaults apply to every slot the text does not mention:
//! - one passenger
//! - round trip
//! - San Francisco to London
//! - departing the next Friday after the reference date
//! - returning one week later

mod dates;
mod rules;

pub use dates::{DurationUnit, TripDuration, first_of_next_month, next_friday};
pub use rules::{Findings, Rule, scan, title_case};

use chrono::NaiveDate;
use tracing::trace;

use crate::domain::{DEFAULT_TRIP_DAYS, TravelFilterSet, TripType};

/// Origin used when the text names none.
pub const DEFAULT_ORIGIN: &str = "San Francisco";

/// Destination used when the text names none.
pub const DEFAULT_DESTINATION: &str = "London";

/// Passenger count used when the text gives none.
pub const DEFAULT_PASSENGERS: u32 = 1;

/// Input to an extraction: the text and the date treated as "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionContext<'a> {
    pub text: &'a str,
    pub reference_date: NaiveDate,
}

impl<'a> ExtractionContext<'a> {
    /// Create a context.
    pub fn new(text: &'a str, reference_date: NaiveDate) -> Self {
        Self {
            text,
            reference_date,
        }
    }

    /// Run the extraction.
    pub fn extract(&self) -> TravelFilterSet {
        extract(self.text, self.reference_date)
    }
}

/// Derive a complete filter set from `text`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use trip_filters::domain::TripType;
/// use trip_filters::extract::extract;
///
/// let today = NaiveDate::from_ymd_opt(2024, 5, 21).unwrap();
/// let filters = extract("I need a one-way ticket to Tokyo for 2 people next month", today);
///
/// assert_eq!(filters.passengers, 2);
/// assert_eq!(filters.trip, TripType::OneWay);
/// assert_eq!(filters.from_date.to_string(), "2024-06-01");
/// assert_eq!(filters.to_date, None);
/// ```
pub fn extract(text: &str, reference_date: NaiveDate) -> TravelFilterSet {
    let findings = scan(text);
    trace!(?findings, "scanned search text");

    let trip = if findings.one_way {
        TripType::OneWay
    } else {
        TripType::RoundTrip
    };

    let from_date = start_date(&findings, reference_date);
    let to_date = match trip {
        TripType::OneWay => None,
        TripType::RoundTrip => Some(end_date(&findings, from_date)),
    };

    TravelFilterSet::new(
        findings.origin.unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
        findings
            .destination
            .unwrap_or_else(|| DEFAULT_DESTINATION.to_string()),
        from_date,
        to_date,
        findings.passengers.unwrap_or(DEFAULT_PASSENGERS),
        trip,
    )
}

/// Explicit month beats "next month", which beats the next Friday.
fn start_date(findings: &Findings, reference_date: NaiveDate) -> NaiveDate {
    if let Some((month, year)) = &findings.month_year {
        if let Some(date) = dates::first_of_named_month(month, *year) {
            return date;
        }
    } else if findings.next_month {
        if let Some(date) = first_of_next_month(reference_date) {
            return date;
        }
    }
    next_friday(reference_date)
}

/// Start plus the stated duration, or one week. Never before the start.
fn end_date(findings: &Findings, from_date: NaiveDate) -> NaiveDate {
    findings
        .duration
        .and_then(|d| d.add_to(from_date))
        .or_else(|| from_date.checked_add_days(chrono::Days::new(DEFAULT_TRIP_DAYS)))
        .unwrap_or(from_date)
}
