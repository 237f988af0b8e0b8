//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::joiner::ChapterPolicy;
use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Join behaviour.
    #[serde(default)]
    pub join: JoinSettings,
}

/// Locations of the ffmpeg and ffprobe executables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// ffmpeg executable, looked up on `PATH` when not absolute.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg_path: String,

    /// ffprobe executable, looked up on `PATH` when not absolute.
    #[serde(default = "default_ffprobe")]
    pub ffprobe_path: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
            ffprobe_path: default_ffprobe(),
        }
    }
}

/// Path configuration for temp files and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for temporary metadata files. Empty means the system temp dir.
    #[serde(default)]
    pub temp_root: String,

    /// Folder for job log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            temp_root: String::new(),
            logs_folder: default_logs_folder(),
        }
    }
}

impl PathSettings {
    /// Configured temp folder, `None` for the system default.
    pub fn temp_dir(&self) -> Option<PathBuf> {
        if self.temp_root.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.temp_root))
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level written to job logs.
    #[serde(default)]
    pub level: LogLevel,

    /// Keep ffmpeg output out of the log unless a step fails.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of tool output lines to show on error.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Log the ffmpeg command one option per line.
    #[serde(default)]
    pub show_command_pretty: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            show_command_pretty: false,
        }
    }
}

/// Join behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinSettings {
    /// How chapters from successive clips are combined.
    #[serde(default)]
    pub chapter_policy: ChapterPolicy,

    /// Replace an existing output file.
    #[serde(default = "default_true")]
    pub overwrite_output: bool,

    /// Audio encoder; unset lets ffmpeg choose from the output extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
}

impl Default for JoinSettings {
    fn default() -> Self {
        Self {
            chapter_policy: ChapterPolicy::default(),
            overwrite_output: true,
            audio_codec: None,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Tools,
    Paths,
    Logging,
    Join,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Tools,
        ConfigSection::Paths,
        ConfigSection::Logging,
        ConfigSection::Join,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Tools => "tools",
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Join => "join",
        }
    }

    /// Comment written above the section in a generated file.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Tools => "External tool locations",
            ConfigSection::Paths => "Temporary and log directories",
            ConfigSection::Logging => "Logging configuration",
            ConfigSection::Join => "Concatenation options",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[tools]"));
        assert!(toml.contains("[join]"));
        assert!(toml.contains("ffprobe_path"));
        assert!(toml.contains("chapter_policy = \"replace\""));
        assert!(!toml.contains("audio_codec"));
    }

    #[test]
    fn settings_round_trip() {
        let mut settings = Settings::default();
        settings.join.audio_codec = Some("libmp3lame".to_string());
        settings.join.chapter_policy = ChapterPolicy::Accumulate;
        settings.logging.level = LogLevel::Debug;

        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.join.audio_codec.as_deref(), Some("libmp3lame"));
        assert_eq!(parsed.join.chapter_policy, ChapterPolicy::Accumulate);
        assert_eq!(parsed.logging.level, LogLevel::Debug);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[tools]\nffmpeg_path = \"/opt/ffmpeg/bin/ffmpeg\"";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.tools.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(parsed.tools.ffprobe_path, "ffprobe");
        assert!(parsed.logging.compact);
        assert!(parsed.join.overwrite_output);
        assert_eq!(parsed.join.chapter_policy, ChapterPolicy::Replace);
    }

    #[test]
    fn empty_temp_root_means_system_default() {
        let mut paths = PathSettings::default();
        assert_eq!(paths.temp_dir(), None);
        paths.temp_root = "/var/tmp/audiojoin".to_string();
        assert_eq!(paths.temp_dir(), Some(PathBuf::from("/var/tmp/audiojoin")));
    }
}
