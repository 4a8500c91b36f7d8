//! Elapsed durations expressed as hours and minutes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Largest accepted hour count.
pub const MAX_HOURS: i64 = 9999;
/// Largest accepted minute count.
pub const MAX_MINUTES: i64 = 59;

/// Round `value` to `places` decimal places.
///
/// Rounds the exact binary value (ties to even), so `0.8995`, stored as
/// `0.89949999…`, rounds down to `0.899`.
pub(crate) fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Convert an hour/minute pair into decimal hours rounded to 2 places.
///
/// # Errors
/// Returns [`EngineError::InvalidInput`] when `hours` is outside `0..=9999`
/// or `minutes` is outside `0..=59`.
pub fn normalize_time(hours: i64, minutes: i64) -> Result<f64, EngineError> {
    check_range(hours, minutes)?;
    Ok(round_to(hours as f64 + minutes as f64 / 60.0, 2))
}

fn check_range(hours: i64, minutes: i64) -> Result<(), EngineError> {
    if !(0..=MAX_HOURS).contains(&hours) {
        return Err(EngineError::invalid(
            "hours",
            format!("must be between 0 and {MAX_HOURS}, got {hours}"),
        ));
    }
    if !(0..=MAX_MINUTES).contains(&minutes) {
        return Err(EngineError::invalid(
            "minutes",
            format!("must be between 0 and {MAX_MINUTES}, got {minutes}"),
        ));
    }
    Ok(())
}

/// An elapsed duration. Always within range once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeParts")]
pub struct TimeValue {
    hours: u32,
    minutes: u32,
}

/// Unchecked wire form of [`TimeValue`].
#[derive(Debug, Clone, Copy, Deserialize)]
struct TimeParts {
    hours: i64,
    #[serde(default)]
    minutes: i64,
}

impl TryFrom<TimeParts> for TimeValue {
    type Error = EngineError;

    fn try_from(parts: TimeParts) -> Result<Self, Self::Error> {
        Self::new(parts.hours, parts.minutes)
    }
}

impl TimeValue {
    /// Zero duration.
    pub const ZERO: TimeValue = TimeValue { hours: 0, minutes: 0 };

    /// # Errors
    /// Returns [`EngineError::InvalidInput`] for out-of-range components.
    pub fn new(hours: i64, minutes: i64) -> Result<Self, EngineError> {
        check_range(hours, minutes)?;
        Ok(Self {
            hours: hours as u32,
            minutes: minutes as u32,
        })
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// `hours + minutes / 60`, rounded to 2 decimal places.
    pub fn decimal_hours(&self) -> f64 {
        round_to(self.hours as f64 + self.minutes as f64 / 60.0, 2)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours, self.minutes)
    }
}

/// Parses `H:MM` or a bare hour count such as `3`.
impl FromStr for TimeValue {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |part: &str, field: &str| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| EngineError::invalid(field, format!("'{part}' is not a whole number")))
        };
        match s.split_once(':') {
            Some((h, m)) => Self::new(parse(h, "hours")?, parse(m, "minutes")?),
            None => Self::new(parse(s, "hours")?, 0),
        }
    }
}
