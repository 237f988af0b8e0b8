//! Output time windows.

use serde::{Deserialize, Serialize};

/// End value meaning "until the end of the source file".
pub const END_OF_FILE: f64 = -1.0;

/// Half-open window `[start, end)` in seconds.
///
/// An `end` of [`END_OF_FILE`] is open-ended and must be resolved against
/// the probed file length before clipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window from `start` to the end of the file.
    pub fn open_ended(start: f64) -> Self {
        Self {
            start,
            end: END_OF_FILE,
        }
    }

    pub fn is_open_ended(&self) -> bool {
        self.end == END_OF_FILE
    }

    /// Fix the end of the window against the probed file length.
    ///
    /// Open-ended windows end at `length`, explicit ends past the file are
    /// clamped down to it.
    pub fn resolve(&self, length: f64) -> Self {
        let end = if self.is_open_ended() || self.end > length {
            length
        } else {
            self.end
        };
        Self {
            start: self.start,
            end,
        }
    }

    /// Window length in seconds. Negative when `start > end`.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_open_end_to_length() {
        let window = TimeWindow::open_ended(3.0).resolve(1059.89);
        assert_eq!(window.end, 1059.89);
        assert!((window.duration() - 1056.89).abs() < 1e-9);
    }

    #[test]
    fn clamps_end_past_length() {
        let window = TimeWindow::new(1.0, 5000.0).resolve(100.0);
        assert_eq!(window.end, 100.0);
    }

    #[test]
    fn keeps_end_inside_file() {
        let window = TimeWindow::new(1.0, 2.0).resolve(100.0);
        assert_eq!(window, TimeWindow::new(1.0, 2.0));
    }

    #[test]
    fn start_past_length_gives_negative_duration() {
        let window = TimeWindow::open_ended(120.0).resolve(100.0);
        assert!(window.duration() < 0.0);
    }
}
