//! Error types for joining and retagging.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::BuilderPhase;
use crate::ffmpeg::{EncodeError, ParseError, ProbeError};
use crate::metadata::MetadataError;

/// Errors from [`JoinBuilder`](super::JoinBuilder) and
/// [`set_metadata`](super::set_metadata).
#[derive(Error, Debug)]
pub enum JoinError {
    /// The requested clip range is inverted or starts past the file end.
    #[error("Invalid range {start:.3}s..{end:.3}s for {}", .path.display())]
    InvalidRange { path: PathBuf, start: f64, end: f64 },

    /// A probe of a source file failed.
    #[error("Probing {} failed: {source}", .path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: ProbeError,
    },

    /// ffmpeg stats for a source file had no parsable duration.
    #[error("Could not read the length of {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// `build` was called before anything was appended.
    #[error("Nothing to join: no segments were appended")]
    NoSegments,

    /// The concat/encode or retag ffmpeg run failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The temporary metadata file could not be written.
    #[error("Failed to write metadata file: {0}")]
    Metadata(#[from] MetadataError),

    /// A filesystem operation failed.
    #[error("Failed to {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    /// The builder already built or failed and accepts no more operations.
    #[error("Builder is {0} and cannot be used again")]
    Finished(BuilderPhase),
}

impl JoinError {
    /// Wrap a probe failure for `path`, surfacing duration failures as `Parse`.
    pub fn from_probe(path: &Path, err: ProbeError) -> Self {
        match err {
            ProbeError::Duration(source) => Self::Parse {
                path: path.to_path_buf(),
                source,
            },
            source => Self::Probe {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn io(operation: &'static str, source: io::Error) -> Self {
        Self::Io { operation, source }
    }
}

/// Result type for join operations.
pub type JoinResult<T> = Result<T, JoinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_probe_failure_becomes_parse() {
        let err = JoinError::from_probe(
            Path::new("a.mp3"),
            ProbeError::Duration(ParseError {
                excerpt: "garbage".to_string(),
            }),
        );
        assert!(matches!(err, JoinError::Parse { .. }));

        let err = JoinError::from_probe(Path::new("a.mp3"), ProbeError::InvalidBitrate("x".into()));
        assert!(matches!(err, JoinError::Probe { .. }));
        assert!(err.to_string().contains("a.mp3"));
    }

    #[test]
    fn messages_name_the_problem() {
        let err = JoinError::InvalidRange {
            path: PathBuf::from("a.mp3"),
            start: 1.0,
            end: 0.0,
        };
        assert_eq!(err.to_string(), "Invalid range 1.000s..0.000s for a.mp3");
        assert_eq!(
            JoinError::Finished(BuilderPhase::Built).to_string(),
            "Builder is built and cannot be used again"
        );
    }
}
