//! Core library for audiojoin.
//!
//! Joins clips of audio files into a single output with ffmpeg, carrying
//! tags over from the sources and keeping their chapters aligned with the
//! clipped ranges.
//!
//! - [`chapters`]: chapter model, clipping to a window, merging
//! - [`metadata`]: FFMETADATA1 reading, writing and escaping
//! - [`ffmpeg`]: probing and running ffmpeg/ffprobe
//! - [`joiner`]: the append/build workflow and in-place retagging
//! - [`files`]: hashing and moving finished outputs
//! - [`config`] and [`logging`]: settings file and job logs

pub mod chapters;
pub mod config;
pub mod ffmpeg;
pub mod files;
pub mod joiner;
pub mod logging;
pub mod metadata;

/// Library version from Cargo.toml.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
