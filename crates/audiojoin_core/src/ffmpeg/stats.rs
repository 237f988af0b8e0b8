//! Parsing of ffmpeg `-stats` progress output.
//!
//! Decoding a file to the null muxer prints lines such as:
//!
//! ```text
//! size=N/A time=00:00:00.00 bitrate=N/A speed=   0x
//! size=N/A time=00:17:05.36 bitrate=N/A speed=2.05e+03x
//! size=N/A time=00:17:39.89 bitrate=N/A speed=2.05e+03x
//! ```
//!
//! The last `time=` value is the decoded length of the file.

use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::ParseError;

static STATS_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"time=(\d{2,}):(\d{2}):(\d{2})\.(\d{2})").expect("static stats regex")
});

const EXCERPT_CHARS: usize = 200;

/// Extract the last `time=HH:MM:SS.CC` value from ffmpeg stats output, in seconds.
pub fn parse_duration(output: &str) -> Result<f64, ParseError> {
    let parse_error = || ParseError {
        excerpt: tail_excerpt(output, EXCERPT_CHARS),
    };

    let caps = STATS_TIME
        .captures_iter(output)
        .last()
        .ok_or_else(parse_error)?;

    let field = |i: usize| -> Result<u64, ParseError> {
        caps[i].parse::<u64>().map_err(|_| parse_error())
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let centis = field(4)?;

    let whole = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .ok_or_else(parse_error)?;
    Ok(whole as f64 + centis as f64 * 0.01)
}

/// Last `max_chars` characters of `text`, trimmed.
fn tail_excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    let count = trimmed.chars().count();
    trimmed.chars().skip(count.saturating_sub(max_chars)).collect()
}
