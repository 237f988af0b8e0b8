//! ffmpeg command builders.
//!
//! Commands are assembled as token lists from typed inputs. Only the flags a
//! command needs are ever emitted; nothing is generated and then stripped.

use std::path::Path;

use crate::joiner::Segment;

/// Output label of the concat filter.
const CONCAT_OUTPUT: &str = "[aout]";

/// Format seconds for `-ss`/`-t` with millisecond precision.
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.3}", seconds)
}

/// Filter graph concatenating the audio of the first `inputs` inputs in order.
pub fn concat_filter(inputs: usize) -> String {
    let mut graph = String::new();
    for index in 0..inputs {
        graph.push_str(&format!("[{}:a]", index));
    }
    graph.push_str(&format!("concat=n={}:v=0:a=1{}", inputs, CONCAT_OUTPUT));
    graph
}

/// Builder for the trim-and-concatenate encode.
///
/// Each segment becomes one input trimmed with `-ss`/`-t`; the metadata file
/// is appended as the last input, and the output takes its tags and chapters
/// from that input's index.
pub struct ConcatCommandBuilder<'a> {
    segments: &'a [Segment],
    metadata_path: &'a Path,
    output_path: &'a Path,
    bitrate: u64,
    overwrite: bool,
    audio_codec: Option<&'a str>,
}

impl<'a> ConcatCommandBuilder<'a> {
    /// `bitrate` is in bits per second.
    pub fn new(
        segments: &'a [Segment],
        metadata_path: &'a Path,
        output_path: &'a Path,
        bitrate: u64,
    ) -> Self {
        Self {
            segments,
            metadata_path,
            output_path,
            bitrate,
            overwrite: false,
            audio_codec: None,
        }
    }

    /// Emit `-y` so an existing output is replaced.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Emit `-c:a <codec>` instead of letting ffmpeg pick from the extension.
    pub fn audio_codec(mut self, codec: Option<&'a str>) -> Self {
        self.audio_codec = codec;
        self
    }

    /// Build the complete ffmpeg argument list.
    pub fn build(&self) -> Vec<String> {
        let mut tokens = vec!["-hide_banner".to_string(), "-nostdin".to_string()];

        if self.overwrite {
            tokens.push("-y".to_string());
        }

        self.add_segment_inputs(&mut tokens);

        tokens.push("-f".to_string());
        tokens.push("ffmetadata".to_string());
        tokens.push("-i".to_string());
        tokens.push(self.metadata_path.to_string_lossy().to_string());

        let metadata_index = self.segments.len().to_string();

        tokens.push("-filter_complex".to_string());
        tokens.push(concat_filter(self.segments.len()));
        tokens.push("-map".to_string());
        tokens.push(CONCAT_OUTPUT.to_string());
        tokens.push("-map_metadata".to_string());
        tokens.push(metadata_index.clone());
        tokens.push("-map_chapters".to_string());
        tokens.push(metadata_index);

        if let Some(codec) = self.audio_codec {
            tokens.push("-c:a".to_string());
            tokens.push(codec.to_string());
        }

        tokens.push("-b:a".to_string());
        tokens.push(format!("{}k", self.bitrate / 1000));

        tokens.push(self.output_path.to_string_lossy().to_string());

        tokens
    }

    fn add_segment_inputs(&self, tokens: &mut Vec<String>) {
        for segment in self.segments {
            tokens.push("-ss".to_string());
            tokens.push(format_seconds(segment.start));
            tokens.push("-t".to_string());
            tokens.push(format_seconds(segment.duration));
            tokens.push("-i".to_string());
            tokens.push(segment.source.to_string_lossy().to_string());
        }
    }
}

/// Builder for rewriting a file's tags and chapters without re-encoding.
pub struct RetagCommandBuilder<'a> {
    input_path: &'a Path,
    metadata_path: &'a Path,
    output_path: &'a Path,
}

impl<'a> RetagCommandBuilder<'a> {
    pub fn new(input_path: &'a Path, metadata_path: &'a Path, output_path: &'a Path) -> Self {
        Self {
            input_path,
            metadata_path,
            output_path,
        }
    }

    pub fn build(&self) -> Vec<String> {
        let mut tokens = vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-y".to_string(),
        ];

        tokens.push("-i".to_string());
        tokens.push(self.input_path.to_string_lossy().to_string());
        tokens.push("-f".to_string());
        tokens.push("ffmetadata".to_string());
        tokens.push("-i".to_string());
        tokens.push(self.metadata_path.to_string_lossy().to_string());

        // All streams of the source, metadata and chapters of the text file.
        tokens.push("-map".to_string());
        tokens.push("0".to_string());
        tokens.push("-map_metadata".to_string());
        tokens.push("1".to_string());
        tokens.push("-map_chapters".to_string());
        tokens.push("1".to_string());
        tokens.push("-codec".to_string());
        tokens.push("copy".to_string());

        tokens.push(self.output_path.to_string_lossy().to_string());
        tokens
    }
}

/// Format tokens for display, one option and its value per line.
pub fn format_tokens_pretty(tokens: &[String]) -> String {
    let mut lines = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if token.starts_with('-') && token.len() > 1 && i + 1 < tokens.len() {
            let next = &tokens[i + 1];
            if !next.starts_with('-') || next == "-" {
                lines.push(format!("{} {}", token, quote_if_needed(next)));
                i += 2;
                continue;
            }
        }

        lines.push(quote_if_needed(token));
        i += 1;
    }

    lines.join(" \\\n")
}

fn quote_if_needed(token: &str) -> String {
    if token.contains(char::is_whitespace) {
        format!("'{}'", token)
    } else {
        token.to_string()
    }
}
