//! ffmpeg and ffprobe process gateway.
//!
//! [`MediaTool`] is the interface the joiner needs from the outside world:
//! four read-only probes and one encode. [`FfmpegTool`] implements it by
//! running the real binaries through a [`ToolRunner`].

mod command;
mod errors;
mod probe;
mod runner;
mod stats;

use std::path::Path;

pub use command::{
    concat_filter, format_seconds, format_tokens_pretty, ConcatCommandBuilder,
    RetagCommandBuilder,
};
pub use errors::{EncodeError, ParseError, ProbeError, ProbeResult};
pub use probe::{
    bitrate_args, chapters_args, length_args, parse_bitrate_json, parse_chapters_json,
    parse_tags_json, tags_args,
};
pub use runner::{CommandOutput, SystemRunner, ToolRunner};
pub use stats::parse_duration;

use crate::chapters::Chapter;
use crate::config::ToolSettings;
use crate::metadata::Tags;

/// Media probing and encoding operations.
pub trait MediaTool {
    /// Decoded length of the file in seconds.
    fn probe_length(&self, path: &Path) -> ProbeResult<f64>;

    /// Audio bitrate in bits per second.
    fn probe_bitrate(&self, path: &Path) -> ProbeResult<u64>;

    /// Container-level tags in reported order.
    fn probe_tags(&self, path: &Path) -> ProbeResult<Tags>;

    /// Chapters sorted by start.
    fn probe_chapters(&self, path: &Path) -> ProbeResult<Vec<Chapter>>;

    /// Run ffmpeg with `args`, failing on a non-zero exit.
    fn run_ffmpeg(&self, args: &[String]) -> Result<CommandOutput, EncodeError>;

    /// Name of the program `run_ffmpeg` executes, for logging.
    fn program_name(&self) -> &str {
        "ffmpeg"
    }
}

/// [`MediaTool`] backed by the ffmpeg and ffprobe executables.
#[derive(Debug, Clone)]
pub struct FfmpegTool<R: ToolRunner = SystemRunner> {
    runner: R,
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegTool<SystemRunner> {
    /// Use `ffmpeg` and `ffprobe` from `PATH`.
    pub fn new() -> Self {
        Self::with_runner(SystemRunner)
    }

    /// Use the executables configured in `[tools]`.
    pub fn from_settings(settings: &ToolSettings) -> Self {
        Self::new().with_paths(&settings.ffmpeg_path, &settings.ffprobe_path)
    }
}

impl Default for FfmpegTool<SystemRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ToolRunner> FfmpegTool<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }

    /// Override executable paths. Empty values keep the current ones.
    pub fn with_paths(mut self, ffmpeg: &str, ffprobe: &str) -> Self {
        if !ffmpeg.is_empty() {
            self.ffmpeg = ffmpeg.to_string();
        }
        if !ffprobe.is_empty() {
            self.ffprobe = ffprobe.to_string();
        }
        self
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.ffprobe
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run_probe(&self, tool: &str, args: &[String]) -> ProbeResult<CommandOutput> {
        tracing::debug!("Probing: {} {}", tool, args.join(" "));

        let output = self
            .runner
            .run(tool, args)
            .map_err(|source| ProbeError::Spawn {
                tool: tool.to_string(),
                source,
            })?;

        if !output.success {
            return Err(ProbeError::CommandFailed {
                tool: tool.to_string(),
                exit_code: output.exit_code,
                message: output.stderr.trim().to_string(),
            });
        }

        Ok(output)
    }
}

impl<R: ToolRunner> MediaTool for FfmpegTool<R> {
    fn probe_length(&self, path: &Path) -> ProbeResult<f64> {
        let output = self.run_probe(&self.ffmpeg, &length_args(path))?;
        let length = parse_duration(&output.combined())?;
        tracing::debug!("Length of {}: {:.2}s", path.display(), length);
        Ok(length)
    }

    fn probe_bitrate(&self, path: &Path) -> ProbeResult<u64> {
        let output = self.run_probe(&self.ffprobe, &bitrate_args(path))?;
        let bitrate = parse_bitrate_json(&output.stdout)?;
        tracing::debug!("Bitrate of {}: {} bit/s", path.display(), bitrate);
        Ok(bitrate)
    }

    fn probe_tags(&self, path: &Path) -> ProbeResult<Tags> {
        let output = self.run_probe(&self.ffprobe, &tags_args(path))?;
        parse_tags_json(&output.stdout)
    }

    fn probe_chapters(&self, path: &Path) -> ProbeResult<Vec<Chapter>> {
        let output = self.run_probe(&self.ffprobe, &chapters_args(path))?;
        let chapters = parse_chapters_json(&output.stdout)?;
        tracing::debug!("{} chapters in {}", chapters.len(), path.display());
        Ok(chapters)
    }

    fn run_ffmpeg(&self, args: &[String]) -> Result<CommandOutput, EncodeError> {
        tracing::info!("Running {} with {} arguments", self.ffmpeg, args.len());

        let output = self.runner.run(&self.ffmpeg, args).map_err(|e| EncodeError {
            exit_code: None,
            output: format!("Failed to run {}: {}", self.ffmpeg, e),
        })?;

        if !output.success {
            return Err(EncodeError {
                exit_code: Some(output.exit_code),
                output: output.combined(),
            });
        }

        Ok(output)
    }

    fn program_name(&self) -> &str {
        &self.ffmpeg
    }
}
