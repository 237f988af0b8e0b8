//! ffprobe invocations and JSON decoding.
//!
//! Each probe has an argument builder (what to run) and a decoder (how to
//! read what came back). The decoders work on plain strings so they can be
//! exercised without ffprobe installed.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::errors::{ProbeError, ProbeResult};
use crate::chapters::{Chapter, TimeBase};
use crate::metadata::Tags;

/// `ffprobe` arguments printing the container format section as JSON.
pub fn tags_args(path: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-v".to_string(),
        "0".to_string(),
        "-show_entries".to_string(),
        "format".to_string(),
        "-of".to_string(),
        "json".to_string(),
        path.to_string_lossy().to_string(),
    ]
}

/// `ffprobe` arguments printing the chapter list as JSON.
pub fn chapters_args(path: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-v".to_string(),
        "0".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_chapters".to_string(),
        path.to_string_lossy().to_string(),
    ]
}

/// `ffprobe` arguments printing per-stream bitrates as JSON.
pub fn bitrate_args(path: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "0".to_string(),
        "-show_entries".to_string(),
        "stream=bit_rate".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        path.to_string_lossy().to_string(),
    ]
}

/// `ffmpeg` arguments decoding the whole file to the null muxer with stats.
pub fn length_args(path: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-nostdin".to_string(),
        "-v".to_string(),
        "quiet".to_string(),
        "-stats".to_string(),
        "-i".to_string(),
        path.to_string_lossy().to_string(),
        "-f".to_string(),
        "null".to_string(),
        "-".to_string(),
    ]
}

#[derive(Debug, Default, Deserialize)]
struct FormatProbe {
    #[serde(default)]
    format: FormatSection,
}

#[derive(Debug, Default, Deserialize)]
struct FormatSection {
    #[serde(default)]
    tags: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ChaptersProbe {
    #[serde(default)]
    chapters: Vec<RawChapter>,
}

#[derive(Debug, Default, Deserialize)]
struct RawChapter {
    #[serde(default)]
    time_base: String,
    #[serde(default)]
    start: i64,
    #[serde(default)]
    end: i64,
    #[serde(default)]
    tags: RawChapterTags,
}

#[derive(Debug, Default, Deserialize)]
struct RawChapterTags {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct StreamsProbe {
    #[serde(default)]
    streams: Vec<RawStream>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStream {
    #[serde(default)]
    bit_rate: Option<String>,
}

fn decode<'a, T: Deserialize<'a>>(json: &'a str, what: &'static str) -> ProbeResult<T> {
    serde_json::from_str(json).map_err(|source| ProbeError::InvalidJson { what, source })
}

/// Decode `format.tags` from ffprobe output, keeping the reported order.
///
/// A file without tags yields an empty set. Non-string values are kept in
/// their JSON text form.
pub fn parse_tags_json(json: &str) -> ProbeResult<Tags> {
    let probe: FormatProbe = decode(json, "format")?;

    Ok(probe
        .format
        .tags
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

/// Decode the chapter list from ffprobe output, stably sorted by start.
pub fn parse_chapters_json(json: &str) -> ProbeResult<Vec<Chapter>> {
    let probe: ChaptersProbe = decode(json, "chapters")?;

    let mut chapters: Vec<Chapter> = probe
        .chapters
        .into_iter()
        .map(|raw| {
            Chapter::new(
                TimeBase::parse(&raw.time_base),
                raw.start,
                raw.end,
                raw.tags.title,
            )
        })
        .collect();

    chapters.sort_by_key(|c| c.start);
    Ok(chapters)
}

/// Decode the bitrate (bits per second) of the first stream that reports one.
///
/// Streams reporting `N/A` or nothing are skipped. If streams report a
/// bitrate but none parses, the first raw value is returned in the error.
pub fn parse_bitrate_json(json: &str) -> ProbeResult<u64> {
    let probe: StreamsProbe = decode(json, "streams")?;

    let reported: Vec<String> = probe
        .streams
        .into_iter()
        .filter_map(|s| s.bit_rate)
        .collect();

    if let Some(bitrate) = reported.iter().find_map(|raw| raw.trim().parse::<u64>().ok()) {
        return Ok(bitrate);
    }

    match reported.into_iter().next() {
        Some(raw) => Err(ProbeError::InvalidBitrate(raw)),
        None => Err(ProbeError::MissingField {
            what: "streams[].bit_rate",
        }),
    }
}
