//! Travel search filters from free text.
//!
//! Turns a sentence like "a 2 week vacation from New York to London in
//! January 2025" into a complete, safe filter set: origin, destination,
//! dates, passengers and trip type.
//!
//! There are two ways in:
//!
//! - [`extract::extract`] applies fixed rules to the text. It is pure and
//!   never fails.
//! - [`service::FilterService`] asks an external [`generate::TextGenerator`]
//!   and folds whatever usable answer comes back onto default filters.
//!   Screening ([`guard`]) is optional on this path, and generator output
//!   is always validated ([`sanitize`]) before it is merged ([`merge`]).

pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod generate;
pub mod guard;
pub mod merge;
pub mod sanitize;
pub mod service;

pub use config::FilterConfig;
pub use domain::{TravelFilterSet, TripType, ValidationOutcome};
pub use error::{ConfigError, FilterError};
pub use service::FilterService;
