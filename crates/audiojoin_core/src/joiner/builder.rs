//! Accumulates clips and writes the concatenated output.
//!
//! Each [`JoinBuilder::append`] probes its source, clips the source's
//! chapters to the requested window and records a segment. Nothing is
//! committed until every probe for that append has succeeded.
//! [`JoinBuilder::build`] merges the collected chapters, writes them with the
//! tags to a temporary FFMETADATA1 file and runs a single ffmpeg concat.

use std::path::Path;
use std::sync::Arc;

use super::errors::{JoinError, JoinResult};
use super::types::{BuildState, BuilderPhase, ChapterPolicy, JoinOptions, Segment};
use crate::chapters::{
    clip_to_window, merge_adjacent_same_title, rebase_chapters, TimeWindow, END_OF_FILE,
};
use crate::ffmpeg::{ConcatCommandBuilder, FfmpegTool, MediaTool};
use crate::logging::JobLogger;
use crate::metadata::write_temp_metadata;

/// Builds one output file from clips of one or more sources.
pub struct JoinBuilder<T: MediaTool = FfmpegTool> {
    tool: T,
    options: JoinOptions,
    logger: Option<Arc<JobLogger>>,
    state: BuildState,
    phase: BuilderPhase,
}

impl JoinBuilder<FfmpegTool> {
    /// Builder using `ffmpeg`/`ffprobe` from `PATH`.
    pub fn new() -> Self {
        Self::with_tool(FfmpegTool::new())
    }
}

impl Default for JoinBuilder<FfmpegTool> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MediaTool> JoinBuilder<T> {
    pub fn with_tool(tool: T) -> Self {
        Self {
            tool,
            options: JoinOptions::default(),
            logger: None,
            state: BuildState::default(),
            phase: BuilderPhase::Empty,
        }
    }

    pub fn with_options(mut self, options: JoinOptions) -> Self {
        self.options = options;
        self
    }

    /// Mirror progress and ffmpeg output into a job log.
    pub fn with_logger(mut self, logger: Arc<JobLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn phase(&self) -> BuilderPhase {
        self.phase
    }

    pub fn segments(&self) -> &[Segment] {
        &self.state.segments
    }

    pub fn state(&self) -> &BuildState {
        &self.state
    }

    pub fn options(&self) -> &JoinOptions {
        &self.options
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Append `[start, end)` of `path`, in seconds.
    ///
    /// `end` may be [`END_OF_FILE`]; an end past the file is clamped to the
    /// file length. On error the builder moves to [`BuilderPhase::Failed`]
    /// and its state is unchanged.
    pub fn append(&mut self, path: impl AsRef<Path>, start: f64, end: f64) -> JoinResult<()> {
        self.ensure_open()?;
        let path = path.as_ref();

        let result = self.try_append(path, start, end);
        if let Err(ref e) = result {
            self.fail("Append", e);
        }
        result
    }

    /// Write the joined output to `output`.
    ///
    /// The temporary metadata file is removed whether or not ffmpeg
    /// succeeds. The builder is finished afterwards either way.
    pub fn build(&mut self, output: impl AsRef<Path>) -> JoinResult<()> {
        self.ensure_open()?;
        let output = output.as_ref();

        let result = self.try_build(output);
        match result {
            Ok(()) => self.phase = BuilderPhase::Built,
            Err(ref e) => self.fail("Build", e),
        }
        result
    }

    /// The ffmpeg arguments `build` runs, given the metadata file location.
    pub fn encode_args(&self, metadata_path: &Path, output: &Path) -> Vec<String> {
        ConcatCommandBuilder::new(
            &self.state.segments,
            metadata_path,
            output,
            self.state.output_bitrate,
        )
        .overwrite(self.options.overwrite_output)
        .audio_codec(self.options.audio_codec.as_deref())
        .build()
    }

    fn try_append(&mut self, path: &Path, start: f64, end: f64) -> JoinResult<()> {
        let invalid_range = || JoinError::InvalidRange {
            path: path.to_path_buf(),
            start,
            end,
        };

        if !start.is_finite()
            || start < 0.0
            || end.is_nan()
            || (end != END_OF_FILE && start > end)
        {
            return Err(invalid_range());
        }

        self.log_phase(&format!("Append {}", path.display()));

        let probe_err = |e| JoinError::from_probe(path, e);

        let length = self.tool.probe_length(path).map_err(probe_err)?;
        let window = TimeWindow::new(start, end).resolve(length);
        let duration = window.duration();
        if duration.is_nan() || duration < 0.0 {
            return Err(invalid_range());
        }

        let chapters = self.tool.probe_chapters(path).map_err(probe_err)?;
        let clipped = clip_to_window(&chapters, &window);

        let tags = if self.state.tags.is_empty() {
            Some(self.tool.probe_tags(path).map_err(probe_err)?)
        } else {
            None
        };

        let bitrate = self.tool.probe_bitrate(path).map_err(probe_err)?;

        // All probes succeeded; commit.
        match self.options.chapter_policy {
            ChapterPolicy::Replace => self.state.chapters = clipped,
            ChapterPolicy::Accumulate => {
                let offset = self.state.output_duration();
                self.state
                    .chapters
                    .extend(rebase_chapters(&clipped, &window, offset));
            }
        }

        if let Some(tags) = tags.filter(|t| !t.is_empty()) {
            tracing::debug!("Using {} tags from {}", tags.len(), path.display());
            self.state.tags = tags;
        }

        self.state.output_bitrate = self.state.output_bitrate.max(bitrate);
        self.state.segments.push(Segment {
            source: path.to_path_buf(),
            start: window.start,
            duration,
        });
        self.phase = BuilderPhase::Accumulating;

        tracing::info!(
            "Appended {} [{:.3}s, {:.3}s) as segment {}",
            path.display(),
            window.start,
            window.end,
            self.state.segments.len()
        );
        self.log_info(&format!(
            "{:.3}s..{:.3}s ({:.3}s), {} chapters, {} bit/s",
            window.start,
            window.end,
            duration,
            self.state.chapters.len(),
            bitrate
        ));

        Ok(())
    }

    fn try_build(&self, output: &Path) -> JoinResult<()> {
        if self.state.segments.is_empty() {
            return Err(JoinError::NoSegments);
        }

        self.log_phase(&format!("Build {}", output.display()));

        let chapters = merge_adjacent_same_title(&self.state.chapters);
        let metadata = write_temp_metadata(
            &self.state.tags,
            &chapters,
            self.options.temp_dir.as_deref(),
        )?;

        let args = self.encode_args(metadata.path(), output);
        if let Some(logger) = &self.logger {
            logger.tool_command(self.tool.program_name(), &args);
        }

        let result = self.tool.run_ffmpeg(&args);

        // The metadata file is no longer needed whatever the outcome.
        drop(metadata);

        match result {
            Ok(out) => {
                if let Some(logger) = &self.logger {
                    logger.tool_output(&out);
                    logger.success(&format!(
                        "Wrote {} ({} segments, {} chapters)",
                        output.display(),
                        self.state.segments.len(),
                        chapters.len()
                    ));
                }
                tracing::info!("Built {}", output.display());
                Ok(())
            }
            Err(e) => {
                if let Some(logger) = &self.logger {
                    for line in e.output.split(['\r', '\n']).filter(|l| !l.trim().is_empty()) {
                        logger.output_line(line, true);
                    }
                }
                Err(e.into())
            }
        }
    }

    fn ensure_open(&self) -> JoinResult<()> {
        if self.phase.is_terminal() {
            return Err(JoinError::Finished(self.phase));
        }
        Ok(())
    }

    fn fail(&mut self, operation: &str, err: &JoinError) {
        tracing::warn!("{} failed: {}", operation, err);
        if let Some(logger) = &self.logger {
            logger.error(&format!("{} failed: {}", operation, err));
            logger.show_tail("ffmpeg");
        }
        self.phase = BuilderPhase::Failed;
    }

    fn log_phase(&self, name: &str) {
        if let Some(logger) = &self.logger {
            logger.phase(name);
        }
    }

    fn log_info(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.info(message);
        }
    }
}
