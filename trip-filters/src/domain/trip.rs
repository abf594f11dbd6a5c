//! Trip type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown trip type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid trip type: {reason}")]
pub struct InvalidTrip {
    reason: &'static str,
}

/// Whether a search is for a single journey or an outbound/return pair.
///
/// The wire spelling is fixed: `"One-Way"` or `"Round-Trip"`, exactly.
///
/// # Examples
///
/// ```
/// use trip_filters::domain::TripType;
///
/// let trip = TripType::parse("One-Way").unwrap();
/// assert_eq!(trip, TripType::OneWay);
/// assert_eq!(trip.as_str(), "One-Way");
///
/// // Spelling is case-sensitive
/// assert!(TripType::parse("one-way").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TripType {
    #[serde(rename = "One-Way")]
    OneWay,
    #[default]
    #[serde(rename = "Round-Trip")]
    RoundTrip,
}

impl TripType {
    /// Parse a trip type from its wire spelling.
    pub fn parse(s: &str) -> Result<Self, InvalidTrip> {
        match s {
            "One-Way" => Ok(TripType::OneWay),
            "Round-Trip" => Ok(TripType::RoundTrip),
            "" => Err(InvalidTrip {
                reason: "must not be empty",
            }),
            _ => Err(InvalidTrip {
                reason: "must be 'One-Way' or 'Round-Trip'",
            }),
        }
    }

    /// Returns the wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::OneWay => "One-Way",
            TripType::RoundTrip => "Round-Trip",
        }
    }

    /// Returns true if this trip has a return leg.
    pub fn has_return(&self) -> bool {
        matches!(self, TripType::RoundTrip)
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
