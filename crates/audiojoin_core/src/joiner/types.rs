//! Joiner data types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chapters::Chapter;
use crate::config::Settings;
use crate::metadata::Tags;

/// One appended clip: a source file trimmed to `[start, start + duration)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub source: PathBuf,
    /// Offset into the source, in seconds.
    pub start: f64,
    /// Length of the clip in seconds, never negative.
    pub duration: f64,
}

impl Segment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Everything accumulated by successive appends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildState {
    /// Clips in append order.
    pub segments: Vec<Segment>,
    /// Chapters that will be merged and written on build.
    pub chapters: Vec<Chapter>,
    /// Tags of the first source that had any.
    pub tags: Tags,
    /// Highest source bitrate seen, in bits per second.
    pub output_bitrate: u64,
}

impl BuildState {
    /// Length of the output so far, in seconds.
    pub fn output_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}

/// Lifecycle of a [`JoinBuilder`](super::JoinBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderPhase {
    /// Nothing appended yet.
    #[default]
    Empty,
    /// At least one clip appended.
    Accumulating,
    /// Output written. Terminal.
    Built,
    /// An operation failed. Terminal.
    Failed,
}

impl BuilderPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuilderPhase::Built | BuilderPhase::Failed)
    }
}

impl fmt::Display for BuilderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuilderPhase::Empty => "empty",
            BuilderPhase::Accumulating => "accumulating",
            BuilderPhase::Built => "built",
            BuilderPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How each append's clipped chapters combine with earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterPolicy {
    /// Keep only the latest append's chapters, in source time.
    #[default]
    Replace,
    /// Keep every append's chapters, moved onto the output timeline.
    Accumulate,
}

/// Runtime options for joining.
#[derive(Debug, Clone)]
pub struct JoinOptions {
    pub chapter_policy: ChapterPolicy,
    /// Pass `-y` so an existing output is replaced.
    pub overwrite_output: bool,
    /// Explicit `-c:a` encoder.
    pub audio_codec: Option<String>,
    /// Where temporary files go; `None` for the system temp dir.
    pub temp_dir: Option<PathBuf>,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            chapter_policy: ChapterPolicy::Replace,
            overwrite_output: true,
            audio_codec: None,
            temp_dir: None,
        }
    }
}

impl JoinOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            chapter_policy: settings.join.chapter_policy,
            overwrite_output: settings.join.overwrite_output,
            audio_codec: settings
                .join
                .audio_codec
                .clone()
                .filter(|codec| !codec.trim().is_empty()),
            temp_dir: settings.paths.temp_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_duration_sums_segments() {
        let mut state = BuildState::default();
        assert_eq!(state.output_duration(), 0.0);
        state.segments.push(Segment {
            source: PathBuf::from("a.mp3"),
            start: 3.0,
            duration: 4.5,
        });
        state.segments.push(Segment {
            source: PathBuf::from("b.mp3"),
            start: 0.0,
            duration: 2.0,
        });
        assert_eq!(state.output_duration(), 6.5);
        assert_eq!(state.segments[0].end(), 7.5);
    }

    #[test]
    fn options_from_settings() {
        let mut settings = Settings::default();
        settings.join.chapter_policy = ChapterPolicy::Accumulate;
        settings.join.overwrite_output = false;
        settings.join.audio_codec = Some("  ".to_string());
        settings.paths.temp_root = "/var/tmp/aj".to_string();

        let options = JoinOptions::from_settings(&settings);
        assert_eq!(options.chapter_policy, ChapterPolicy::Accumulate);
        assert!(!options.overwrite_output);
        assert_eq!(options.audio_codec, None);
        assert_eq!(options.temp_dir, Some(PathBuf::from("/var/tmp/aj")));
    }

    #[test]
    fn terminal_phases() {
        assert!(!BuilderPhase::Empty.is_terminal());
        assert!(!BuilderPhase::Accumulating.is_terminal());
        assert!(BuilderPhase::Built.is_terminal());
        assert!(BuilderPhase::Failed.is_terminal());
    }
}
