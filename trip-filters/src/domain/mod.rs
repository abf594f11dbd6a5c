//! Domain types for travel search filters.
//!
//! These are the values that flow between the guard, the extractor, the
//! sanitizer and the merger. Types with a restricted vocabulary enforce it
//! at construction time.

mod filters;
mod outcome;
mod trip;

pub use filters::{DEFAULT_TRIP_DAYS, TravelFilterSet, keys};
pub use outcome::ValidationOutcome;
pub use trip::{InvalidTrip, TripType};
