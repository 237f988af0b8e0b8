//! Joining clips of audio files into one output with merged chapters.
//!
//! # Example
//!
//! ```no_run
//! use audiojoin_core::chapters::END_OF_FILE;
//! use audiojoin_core::joiner::JoinBuilder;
//!
//! let mut builder = JoinBuilder::new();
//! builder.append("part1.mp3", 12.5, END_OF_FILE).unwrap();
//! builder.append("part2.mp3", 0.0, 600.0).unwrap();
//! builder.build("joined.mp3").unwrap();
//! ```

mod builder;
mod errors;
mod retag;
mod types;

pub use builder::JoinBuilder;
pub use errors::{JoinError, JoinResult};
pub use retag::set_metadata;
pub use types::{BuildState, BuilderPhase, ChapterPolicy, JoinOptions, Segment};
