//! Chapter types.
//!
//! Chapters are kept in the tick representation ffprobe reports them in:
//! integer start/end values plus the time base they are counted in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ticks per second used when a time base is missing or malformed.
pub const DEFAULT_TICKS_PER_SECOND: i64 = 1_000_000_000;

/// Rational tick duration of the form `1/N`.
///
/// The multiplier `N` is parsed once when the time base is created, so a
/// chapter never has to distinguish "not yet computed" from a computed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TimeBase {
    raw: String,
    ticks_per_second: i64,
}

impl TimeBase {
    /// Parse a time base string such as `"1/1000"`.
    ///
    /// Anything that is not `1/N` with a positive `N` falls back to
    /// [`TimeBase::default`].
    pub fn parse(raw: &str) -> Self {
        match parse_ticks_per_second(raw) {
            Some(ticks_per_second) => Self {
                raw: raw.trim().to_string(),
                ticks_per_second,
            },
            None => {
                if !raw.trim().is_empty() {
                    tracing::debug!("Malformed time base '{}', using default", raw);
                }
                Self::default()
            }
        }
    }

    /// Time base with the given number of ticks per second.
    pub fn from_ticks_per_second(ticks_per_second: i64) -> Self {
        if ticks_per_second <= 0 {
            return Self::default();
        }
        Self {
            raw: format!("1/{}", ticks_per_second),
            ticks_per_second,
        }
    }

    /// The time base as written in ffprobe output and FFMETADATA1 files.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of ticks in one second (`N` in `1/N`).
    pub fn ticks_per_second(&self) -> i64 {
        self.ticks_per_second
    }

    /// Convert ticks to seconds.
    pub fn to_seconds(&self, ticks: i64) -> f64 {
        ticks as f64 / self.ticks_per_second as f64
    }

    /// Convert seconds to the nearest tick.
    pub fn to_ticks(&self, seconds: f64) -> i64 {
        (seconds * self.ticks_per_second as f64).round() as i64
    }

    /// Last tick at or before `seconds`.
    pub fn to_ticks_floor(&self, seconds: f64) -> i64 {
        let mut ticks = (seconds * self.ticks_per_second as f64).floor() as i64;
        // The product can round up past an exact tick boundary.
        if self.to_seconds(ticks) > seconds {
            ticks -= 1;
        }
        ticks
    }

    /// First tick at or after `seconds`.
    pub fn to_ticks_ceil(&self, seconds: f64) -> i64 {
        let mut ticks = (seconds * self.ticks_per_second as f64).ceil() as i64;
        if self.to_seconds(ticks) < seconds {
            ticks += 1;
        }
        ticks
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::from_ticks_per_second(DEFAULT_TICKS_PER_SECOND)
    }
}

impl fmt::Display for TimeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<String> for TimeBase {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<TimeBase> for String {
    fn from(time_base: TimeBase) -> Self {
        time_base.raw
    }
}

fn parse_ticks_per_second(raw: &str) -> Option<i64> {
    let (num, den) = raw.trim().split_once('/')?;
    if num.trim().parse::<i64>().ok()? != 1 {
        return None;
    }
    let den: i64 = den.trim().parse().ok()?;
    (den > 0).then_some(den)
}

/// A titled chapter interval in ticks of its time base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Time base the start/end ticks are counted in.
    pub time_base: TimeBase,
    /// Start in ticks.
    pub start: i64,
    /// End in ticks. Never before `start`.
    pub end: i64,
    /// Chapter title (may be empty).
    pub title: String,
}

impl Chapter {
    /// Create a chapter. An end before the start is raised to the start.
    pub fn new(time_base: TimeBase, start: i64, end: i64, title: impl Into<String>) -> Self {
        Self {
            time_base,
            start,
            end: end.max(start),
            title: title.into(),
        }
    }

    /// Start in seconds.
    pub fn start_secs(&self) -> f64 {
        self.time_base.to_seconds(self.start)
    }

    /// End in seconds.
    pub fn end_secs(&self) -> f64 {
        self.time_base.to_seconds(self.end)
    }

    /// Length in ticks.
    pub fn len_ticks(&self) -> i64 {
        self.end - self.start
    }
}
