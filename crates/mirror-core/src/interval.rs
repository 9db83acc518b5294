//! Schedule interval grammar
//!
//! Two grammars are tried in order:
//!
//! 1. `<n><unit>`, case-insensitive, with unit `s`, `m`, `h`, `d` or `y`
//! 2. a bare `<n>`, read as whole minutes
//!
//! `y` is exactly 365 days. Leap years are not accounted for.
//!
//! Surrounding whitespace is ignored, so an interactive answer of `" 15m "`
//! reads as `15m`. A period too long to be scheduled from the current time is
//! rejected like malformed text.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use regex::Regex;

static UNIT_INTERVAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)([smhdy])$").unwrap());

static BARE_MINUTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)$").unwrap());

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const YEAR: u64 = 365 * DAY;

/// Interval text that matched neither grammar, or named a zero or overflowing period
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    #[error(
        "Invalid interval '{text}': expected a positive <number><unit> with unit s, m, h, d or y, or a whole number of minutes"
    )]
    Invalid { text: String },
}

impl IntervalError {
    fn invalid(text: &str) -> Self {
        Self::Invalid {
            text: text.to_string(),
        }
    }
}

/// How often a sync should run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Run a single time and exit
    Once,
    /// Run repeatedly, once per period
    Every(Duration),
}

/// Parse optional interval text into a [`Schedule`].
///
/// Missing or blank text means [`Schedule::Once`].
pub fn parse_interval(text: Option<&str>) -> Result<Schedule, IntervalError> {
    match text.map(str::trim) {
        None | Some("") => Ok(Schedule::Once),
        Some(text) => parse_duration(text).map(Schedule::Every),
    }
}

/// Parse interval text that must name a period.
///
/// # Errors
///
/// Returns [`IntervalError::Invalid`] carrying the offending text when it
/// matches neither grammar, is zero, or overflows.
pub fn parse_duration(text: &str) -> Result<Duration, IntervalError> {
    let seconds = if let Some(caps) = UNIT_INTERVAL.captures(text) {
        let count = parse_count(&caps[1], text)?;
        let unit = match caps[2].to_ascii_lowercase().as_str() {
            "s" => 1,
            "m" => MINUTE,
            "h" => HOUR,
            "d" => DAY,
            _ => YEAR,
        };
        count.checked_mul(unit)
    } else if let Some(caps) = BARE_MINUTES.captures(text) {
        parse_count(&caps[1], text)?.checked_mul(MINUTE)
    } else {
        None
    };

    seconds
        .map(Duration::from_secs)
        .filter(|period| Instant::now().checked_add(*period).is_some())
        .ok_or_else(|| IntervalError::invalid(text))
}

fn parse_count(digits: &str, text: &str) -> Result<u64, IntervalError> {
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => Err(IntervalError::invalid(text)),
        Ok(count) => Ok(count),
    }
}
