//! Chapter model and interval operations.
//!
//! Chapters arrive from ffprobe in their source file's timeline. Before a
//! clip is concatenated, its chapters are clipped to the clip's window; when
//! the output is built, adjacent chapters with the same title are merged.
//!
//! # Usage
//!
//! ```
//! use audiojoin_core::chapters::{
//!     clip_to_window, merge_adjacent_same_title, Chapter, TimeBase, TimeWindow,
//! };
//!
//! let chapters = vec![
//!     Chapter::new(TimeBase::parse("1/1"), 1, 5, "demo"),
//!     Chapter::new(TimeBase::parse("1/1"), 5, 10, "demo2"),
//! ];
//! let clipped = clip_to_window(&chapters, &TimeWindow::new(3.0, 7.0));
//! assert_eq!((clipped[0].start, clipped[0].end), (3, 5));
//!
//! let merged = merge_adjacent_same_title(&clipped);
//! assert_eq!(merged.len(), 2);
//! ```

mod process;
mod types;
mod window;

pub use process::{clip_to_window, merge_adjacent_same_title, rebase_chapters};
pub use types::{Chapter, TimeBase, DEFAULT_TICKS_PER_SECOND};
pub use window::{TimeWindow, END_OF_FILE};
