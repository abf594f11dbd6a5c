//! Ordered pattern table for rule-based extraction.
//!
//! Each rule pairs a pattern with the slot it fills. The table is applied in
//! a single pass, top to bottom; a rule only ever fills its own slot, and
//! the first match in the text wins.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::dates::{DurationUnit, TripDuration};

/// What a pattern in the table extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// "3 people", "2 adults", "family of 4"
    Passengers,
    /// "one-way", "one way", "moving", "relocating"
    OneWay,
    /// "from <place> to" or "from <place>" at end of text
    Origin,
    /// "to <place> from" or "to <place>" at end of text
    Destination,
    /// "tour of <place>", only when no destination matched
    TourOf,
    /// "2 weeks", "10 days", "1 month"
    Duration,
    /// "<Month> <yyyy>"
    MonthYear,
    /// "next month"
    NextMonth,
}

/// Which rendering of the input a rule runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// The text as typed, so captured place names keep their spelling.
    Original,
    /// The lower-cased text.
    Lowered,
}

impl Rule {
    fn source(self) -> Source {
        match self {
            Rule::Origin | Rule::Destination => Source::Original,
            _ => Source::Lowered,
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("extraction pattern must compile")
}

/// The extraction table, in application order.
static RULES: LazyLock<Vec<(Rule, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Rule::Passengers,
            compile(r"(?i)(\d+)\s*(?:people|passengers|person|kids|adults)|family of\s*(\d+)"),
        ),
        (Rule::OneWay, compile(r"(?i)one-way|one way|moving|relocating")),
        (Rule::Origin, compile(r"(?i)from\s+([\w\s,]+?)(?:\s+to|$)")),
        (Rule::Destination, compile(r"(?i)to\s+([\w\s,]+?)(?:\s+from|$)")),
        (Rule::TourOf, compile(r"tour of ([\w\s,]+)")),
        (Rule::Duration, compile(r"(?i)(\d+)\s+(week|day|month)s?")),
        (
            Rule::MonthYear,
            compile(
                r"(?i)(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{4})",
            ),
        ),
        (Rule::NextMonth, compile(r"(?i)next\s+month")),
    ]
});

/// Everything the table found in one piece of text.
///
/// Slots are `None` when their rule did not match (or matched something
/// unusable, like a passenger count too large to represent).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub passengers: Option<u32>,
    pub one_way: bool,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub duration: Option<TripDuration>,
    pub month_year: Option<(String, i32)>,
    pub next_month: bool,
}

impl Findings {
    fn record(&mut self, rule: Rule, caps: &Captures<'_>) {
        match rule {
            Rule::Passengers => {
                self.passengers = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .filter(|&n| n > 0);
            }
            Rule::OneWay => self.one_way = true,
            Rule::Origin => self.origin = caps.get(1).map(|m| title_case(m.as_str())),
            Rule::Destination => self.destination = caps.get(1).map(|m| title_case(m.as_str())),
            Rule::TourOf => {
                if self.destination.is_none() {
                    self.destination = caps.get(1).map(|m| title_case(m.as_str()));
                }
            }
            Rule::Duration => {
                let value = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
                let unit = caps
                    .get(2)
                    .and_then(|m| DurationUnit::parse(&m.as_str().to_ascii_lowercase()));
                self.duration = match (value, unit) {
                    (Some(value), Some(unit)) => TripDuration::new(value, unit),
                    _ => None,
                };
            }
            Rule::MonthYear => {
                self.month_year = match (caps.get(1), caps.get(2)) {
                    (Some(month), Some(year)) => year
                        .as_str()
                        .parse::<i32>()
                        .ok()
                        .map(|y| (month.as_str().to_string(), y)),
                    _ => None,
                };
            }
            Rule::NextMonth => self.next_month = true,
        }
    }
}

/// Run the whole table over `text`.
pub fn scan(text: &str) -> Findings {
    let lowered = text.to_lowercase();
    let mut findings = Findings::default();

    for (rule, pattern) in RULES.iter() {
        let haystack = match rule.source() {
            Source::Original => text,
            Source::Lowered => lowered.as_str(),
        };
        if let Some(caps) = pattern.captures(haystack) {
            findings.record(*rule, &caps);
        }
    }

    findings
}

/// Capitalize each whitespace-separated word once.
///
/// The first character of each word is upper-cased and the rest lower-cased,
/// so "new YORK" becomes "New York" and "McDonald" becomes "Mcdonald".
/// Runs of whitespace collapse to a single space.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
