//! Chapter interval operations.
//!
//! - Clipping a chapter list to an output window
//! - Merging adjacent chapters that share a title
//! - Rebasing clipped chapters onto the output timeline

use std::cmp::Ordering;

use super::types::Chapter;
use super::window::TimeWindow;

/// Clip chapters to `window`.
///
/// A chapter is kept when it overlaps the window with a non-empty
/// intersection (`end > window.start && start < window.end`); a chapter that
/// only touches a window boundary is dropped. Kept chapters are clamped to
/// the window and returned stably sorted by their clamped start.
///
/// Window bounds are converted inwards (start up, end down to a whole tick),
/// so clamped chapters never extend past the window in seconds. A window
/// narrower than one tick keeps nothing.
///
/// The window must already be resolved (see [`TimeWindow::resolve`]).
pub fn clip_to_window(chapters: &[Chapter], window: &TimeWindow) -> Vec<Chapter> {
    let mut result: Vec<Chapter> = chapters
        .iter()
        .filter_map(|chapter| {
            let tb = &chapter.time_base;
            let window_start = tb.to_ticks_ceil(window.start);
            let window_end = tb.to_ticks_floor(window.end);

            if window_start >= window_end
                || chapter.end <= window_start
                || chapter.start >= window_end
            {
                return None;
            }

            let mut clipped = chapter.clone();
            clipped.start = chapter.start.max(window_start);
            clipped.end = chapter.end.min(window_end);
            Some(clipped)
        })
        .collect();

    sort_by_start(&mut result);

    tracing::debug!(
        "Clipped {} chapters to [{:.3}s, {:.3}s): {} kept",
        chapters.len(),
        window.start,
        window.end,
        result.len()
    );

    result
}

/// Merge runs of adjacent chapters with identical titles.
///
/// Scans from the back: whenever a chapter has the same title as its
/// predecessor, the predecessor takes over its end and the chapter is
/// dropped. The later chapter's end wins even when it is the earlier one,
/// so a same-titled chapter nested inside its predecessor shortens it.
/// The predecessor is then compared with its own predecessor on the next
/// step, so a run of any length collapses into one chapter.
///
/// Input is re-sorted by start first. Chapters with different titles are
/// never merged, however close they are.
pub fn merge_adjacent_same_title(chapters: &[Chapter]) -> Vec<Chapter> {
    let mut result = chapters.to_vec();
    if result.len() < 2 {
        return result;
    }

    sort_by_start(&mut result);

    for i in (1..result.len()).rev() {
        if result[i].title != result[i - 1].title {
            continue;
        }

        let absorbed = result.remove(i);
        let prev = &mut result[i - 1];
        let new_end = if absorbed.time_base == prev.time_base {
            absorbed.end
        } else {
            prev.time_base.to_ticks(absorbed.end_secs())
        };
        prev.end = new_end.max(prev.start);

        tracing::debug!(
            "Merged chapter '{}' into predecessor, now ends at {:.3}s",
            absorbed.title,
            prev.end_secs()
        );
    }

    result
}

/// Move clipped chapters from source time onto the output timeline.
///
/// `window` is the source window the chapters were clipped to and
/// `output_offset` is where that window starts in the output, in seconds.
/// Results are clamped at zero.
pub fn rebase_chapters(
    chapters: &[Chapter],
    window: &TimeWindow,
    output_offset: f64,
) -> Vec<Chapter> {
    chapters
        .iter()
        .map(|chapter| {
            let tb = &chapter.time_base;
            let shift = tb.to_ticks(output_offset) - tb.to_ticks(window.start);
            let start = (chapter.start + shift).max(0);
            let end = (chapter.end + shift).max(start);
            Chapter::new(tb.clone(), start, end, chapter.title.clone())
        })
        .collect()
}

/// Stable sort by start time in seconds.
fn sort_by_start(chapters: &mut [Chapter]) {
    chapters.sort_by(|a, b| {
        if a.time_base == b.time_base {
            a.start.cmp(&b.start)
        } else {
            a.start_secs()
                .partial_cmp(&b.start_secs())
                .unwrap_or(Ordering::Equal)
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapters::types::TimeBase;

    fn ch(base: &str, start: i64, end: i64, title: &str) -> Chapter {
        Chapter::new(TimeBase::parse(base), start, end, title)
    }

    #[test]
    fn clip_strict_subset() {
        let chapters = vec![ch("1/1", 0, 10, "demo")];
        let clipped = clip_to_window(&chapters, &TimeWindow::new(2.0, 8.0));
        assert_eq!(clipped, vec![ch("1/1", 2, 8, "demo")]);
    }

    #[test]
    fn clip_cross_section() {
        let chapters = vec![ch("1/1", 1, 5, "demo"), ch("1/1", 5, 10, "demo2")];
        let clipped = clip_to_window(&chapters, &TimeWindow::new(3.0, 7.0));
        assert_eq!(
            clipped,
            vec![ch("1/1", 3, 5, "demo"), ch("1/1", 5, 7, "demo2")]
        );
    }

    #[test]
    fn clip_drops_chapters_outside() {
        let before = vec![ch("1/1", 3, 4, "demo")];
        assert!(clip_to_window(&before, &TimeWindow::new(1.0, 2.0)).is_empty());

        let after = vec![ch("1/1", 1, 2, "demo")];
        assert!(clip_to_window(&after, &TimeWindow::new(3.0, 4.0)).is_empty());
    }

    #[test]
    fn clip_excludes_boundary_touching_chapters() {
        let chapters = vec![
            ch("1/1", 0, 2, "ends at window start"),
            ch("1/1", 2, 6, "inside"),
            ch("1/1", 6, 9, "starts at window end"),
        ];
        let clipped = clip_to_window(&chapters, &TimeWindow::new(2.0, 6.0));
        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].title, "inside");
    }

    #[test]
    fn clip_results_stay_inside_window() {
        let chapters = vec![
            ch("1/1000", 0, 16_900, "Intro"),
            ch("1/1000", 16_900, 500_000, "Story"),
            ch("1/1000", 500_000, 1_059_890, "Outro"),
        ];
        let window = TimeWindow::new(10.25, 600.5);
        let clipped = clip_to_window(&chapters, &window);

        assert_eq!(clipped.len(), 3);
        for chapter in &clipped {
            assert!(window.start <= chapter.start_secs());
            assert!(chapter.start <= chapter.end);
            assert!(chapter.end_secs() <= window.end);
        }
        assert_eq!(clipped[0].start, 10_250);
        assert_eq!(clipped[2].end, 600_500);
    }

    #[test]
    fn clip_rounds_window_inwards() {
        let chapters = vec![ch("1/1000", 0, 10_000, "Whole")];
        let window = TimeWindow::new(1.0004, 2.0006);
        let clipped = clip_to_window(&chapters, &window);

        assert_eq!(clipped, vec![ch("1/1000", 1001, 2000, "Whole")]);
        assert!(window.start <= clipped[0].start_secs());
        assert!(clipped[0].end_secs() <= window.end);
    }

    #[test]
    fn clip_overlap_uses_inward_bounds() {
        // Ends at 1.000s; the window starts at 1.0004s, so the overlap is
        // less than one tick and the chapter is dropped.
        let chapters = vec![ch("1/1000", 0, 1000, "before"), ch("1/1000", 1000, 3000, "after")];
        let clipped = clip_to_window(&chapters, &TimeWindow::new(1.0004, 2.5));
        assert_eq!(clipped, vec![ch("1/1000", 1001, 2500, "after")]);
    }

    #[test]
    fn clip_window_inside_one_tick_keeps_nothing() {
        let chapters = vec![ch("1/1", 0, 10, "demo")];
        assert!(clip_to_window(&chapters, &TimeWindow::new(2.2, 2.8)).is_empty());
    }

    #[test]
    fn clip_sorts_by_clamped_start_stably() {
        let chapters = vec![
            ch("1/1", 5, 9, "late"),
            ch("1/1", 0, 6, "first"),
            ch("1/1", 1, 7, "second"),
        ];
        let clipped = clip_to_window(&chapters, &TimeWindow::new(2.0, 8.0));
        let titles: Vec<&str> = clipped.iter().map(|c| c.title.as_str()).collect();
        // "first" and "second" both clamp to 2 and keep their input order.
        assert_eq!(titles, vec!["first", "second", "late"]);
    }

    #[test]
    fn merge_pair() {
        let chapters = vec![
            ch("1/1000", 0, 15000, "First"),
            ch("1/1000", 15000, 20000, "First"),
        ];
        assert_eq!(
            merge_adjacent_same_title(&chapters),
            vec![ch("1/1000", 0, 20000, "First")]
        );
    }

    #[test]
    fn merge_collapses_long_runs() {
        let chapters = vec![
            ch("1/1", 0, 1, "a"),
            ch("1/1", 1, 2, "a"),
            ch("1/1", 2, 3, "a"),
            ch("1/1", 3, 4, "a"),
            ch("1/1", 4, 5, "b"),
            ch("1/1", 5, 6, "a"),
        ];
        let merged = merge_adjacent_same_title(&chapters);
        assert_eq!(
            merged,
            vec![ch("1/1", 0, 4, "a"), ch("1/1", 4, 5, "b"), ch("1/1", 5, 6, "a")]
        );
    }

    #[test]
    fn merge_keeps_different_titles() {
        let chapters = vec![ch("1/1", 0, 5, "one"), ch("1/1", 5, 10, "two")];
        assert_eq!(merge_adjacent_same_title(&chapters), chapters);
    }

    #[test]
    fn merge_treats_empty_title_as_title() {
        let chapters = vec![ch("1/1", 0, 5, ""), ch("1/1", 5, 10, "")];
        assert_eq!(merge_adjacent_same_title(&chapters), vec![ch("1/1", 0, 10, "")]);
    }

    #[test]
    fn merge_trivial_inputs_unchanged() {
        assert!(merge_adjacent_same_title(&[]).is_empty());
        let single = vec![ch("1/1", 3, 4, "x")];
        assert_eq!(merge_adjacent_same_title(&single), single);
    }

    #[test]
    fn merge_is_idempotent() {
        let chapters = vec![
            ch("1/1", 0, 2, "a"),
            ch("1/1", 2, 4, "a"),
            ch("1/1", 4, 6, "b"),
            ch("1/1", 6, 8, "b"),
            ch("1/1", 8, 9, "c"),
        ];
        let once = merge_adjacent_same_title(&chapters);
        let twice = merge_adjacent_same_title(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_sorts_unsorted_input() {
        let chapters = vec![ch("1/1", 5, 10, "x"), ch("1/1", 0, 5, "x")];
        assert_eq!(merge_adjacent_same_title(&chapters), vec![ch("1/1", 0, 10, "x")]);
    }

    #[test]
    fn merge_takes_later_end() {
        let chapters = vec![ch("1/1", 0, 10, "x"), ch("1/1", 2, 5, "x")];
        assert_eq!(merge_adjacent_same_title(&chapters), vec![ch("1/1", 0, 5, "x")]);
    }

    #[test]
    fn merge_converts_between_time_bases() {
        let chapters = vec![ch("1/1000", 0, 2000, "x"), ch("1/1", 2, 5, "x")];
        assert_eq!(merge_adjacent_same_title(&chapters), vec![ch("1/1000", 0, 5000, "x")]);
    }

    #[test]
    fn rebase_moves_to_output_offset() {
        let clipped = vec![ch("1/1000", 7000, 8000, "Intro")];
        let rebased = rebase_chapters(&clipped, &TimeWindow::new(7.0, 8.0), 5.0);
        assert_eq!(rebased, vec![ch("1/1000", 5000, 6000, "Intro")]);
    }
}
