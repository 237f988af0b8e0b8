//! Error types for ffmpeg/ffprobe invocations.

use std::io;

use thiserror::Error;

/// A probe of a media file failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The tool could not be started.
    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The tool exited with a non-zero status.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// ffprobe output was not the expected JSON.
    #[error("Invalid {what} JSON from ffprobe: {source}")]
    InvalidJson {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A required field was absent from ffprobe output.
    #[error("ffprobe output has no {what}")]
    MissingField { what: &'static str },

    /// A stream bitrate could not be read as an integer.
    #[error("Unparsable bitrate '{0}'")]
    InvalidBitrate(String),

    /// ffmpeg stats output had no duration.
    #[error(transparent)]
    Duration(#[from] ParseError),
}

/// ffmpeg stats text did not contain a `time=HH:MM:SS.CC` field.
#[derive(Debug, Error)]
#[error("No time=HH:MM:SS.CC found in ffmpeg output: '{excerpt}'")]
pub struct ParseError {
    /// Tail of the output that failed to match.
    pub excerpt: String,
}

/// The encode/concat invocation failed.
#[derive(Debug, Error)]
#[error("ffmpeg failed ({}): {output}", describe_exit(.exit_code))]
pub struct EncodeError {
    /// Exit code, `None` if the process never ran.
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr of the run.
    pub output: String,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "not started".to_string(),
    }
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;
