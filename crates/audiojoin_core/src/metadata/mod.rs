//! Tag and chapter metadata in ffmpeg's FFMETADATA1 text format.
//!
//! This module provides:
//! - An insertion-ordered tag map ([`Tags`])
//! - The idempotent escaping rule for keys and values ([`sanitize`])
//! - Serialization to a scoped temporary file consumed by ffmpeg
//! - A reader for the same format, used to check what was written

mod escape;
mod ffmetadata;
mod tags;

use thiserror::Error;

pub use escape::{sanitize, unescape};
pub use ffmetadata::{
    parse_ffmetadata, serialize, write_temp_metadata, MetadataDocument, FFMETADATA_HEADER,
};
pub use tags::Tags;

/// Errors from reading or writing metadata files.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Missing ;FFMETADATA1 header")]
    MissingHeader,

    #[error("Malformed metadata line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("Invalid {field} value on line {line}")]
    InvalidNumber { line: usize, field: &'static str },

    #[error("Metadata file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;
