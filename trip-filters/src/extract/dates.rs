//! Calendar arithmetic for trip dates.
//!
//! All functions take the reference date explicitly; nothing here reads the
//! system clock.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Unit of a trip duration ("2 weeks", "10 days", "1 month").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Day,
    Week,
    Month,
}

impl DurationUnit {
    /// Parse the singular unit word as captured from text.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "day" => Some(DurationUnit::Day),
            "week" => Some(DurationUnit::Week),
            "month" => Some(DurationUnit::Month),
            _ => None,
        }
    }
}

/// A positive trip duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripDuration {
    pub value: u32,
    pub unit: DurationUnit,
}

impl TripDuration {
    /// Create a duration. Zero-length durations are rejected.
    pub fn new(value: u32, unit: DurationUnit) -> Option<Self> {
        (value > 0).then_some(Self { value, unit })
    }

    /// Add this duration to a date.
    ///
    /// Months use calendar arithmetic, clamping to the last day of the
    /// target month (Jan 31 + 1 month = Feb 28 or 29). Returns `None` on
    /// overflow.
    pub fn add_to(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self.unit {
            DurationUnit::Day => start.checked_add_days(Days::new(u64::from(self.value))),
            DurationUnit::Week => start.checked_add_days(Days::new(u64::from(self.value) * 7)),
            DurationUnit::Month => start.checked_add_months(Months::new(self.value)),
        }
    }
}

/// The first Friday strictly after `date`.
///
/// A Friday reference date advances a full week.
pub fn next_friday(date: NaiveDate) -> NaiveDate {
    let today = date.weekday().num_days_from_monday();
    let friday = Weekday::Fri.num_days_from_monday();
    let ahead = match (friday + 7 - today) % 7 {
        0 => 7,
        n => n,
    };
    date.checked_add_days(Days::new(u64::from(ahead)))
        .unwrap_or(date)
}

/// The first day of the month following `date`.
pub fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?.checked_add_months(Months::new(1))
}

/// The first day of the given month, by English month name (any case).
pub fn first_of_named_month(month_name: &str, year: i32) -> Option<NaiveDate> {
    let month = month_number(month_name)?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    let lower = name.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lower)
        .map(|idx| idx as u32 + 1)
}
