//! Rewrite the tags and chapters of an existing file.

use std::path::Path;

use tempfile::NamedTempFile;

use super::errors::{JoinError, JoinResult};
use super::types::JoinOptions;
use crate::chapters::Chapter;
use crate::ffmpeg::{MediaTool, RetagCommandBuilder};
use crate::files::overwrite_file;
use crate::metadata::{write_temp_metadata, Tags};

/// Replace the metadata of `path` with `tags` and `chapters`.
///
/// Streams are copied, not re-encoded, into a temporary file with the same
/// extension, which then overwrites `path`. Both temporary files are
/// removed on every exit path.
pub fn set_metadata<T: MediaTool>(
    tool: &T,
    path: &Path,
    tags: &Tags,
    chapters: &[Chapter],
    options: &JoinOptions,
) -> JoinResult<()> {
    let temp_dir = options.temp_dir.as_deref();

    let metadata = write_temp_metadata(tags, chapters, temp_dir)?;
    let retagged = temp_output_for(path, temp_dir)?;

    let args = RetagCommandBuilder::new(path, metadata.path(), retagged.path()).build();
    tracing::debug!("{} {}", tool.program_name(), args.join(" "));
    tool.run_ffmpeg(&args)?;

    overwrite_file(retagged.path(), path)
        .map_err(|source| JoinError::io("overwrite the source file", source))?;

    tracing::info!(
        "Retagged {} ({} tags, {} chapters)",
        path.display(),
        tags.len(),
        chapters.len()
    );
    Ok(())
}

/// Empty temporary file whose extension matches `path`, so ffmpeg picks the
/// same muxer.
fn temp_output_for(path: &Path, dir: Option<&Path>) -> JoinResult<NamedTempFile> {
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut builder = tempfile::Builder::new();
    builder.prefix("retag-").suffix(&suffix);

    let file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    };
    file.map_err(|source| JoinError::io("create a temporary output file", source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapters::TimeBase;
    use crate::ffmpeg::{CommandOutput, EncodeError, ProbeResult};
    use crate::metadata::parse_ffmetadata;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;

    /// Copies the input to the output and captures the metadata text,
    /// the way `ffmpeg -codec copy` would leave the audio untouched.
    #[derive(Default)]
    struct CopyingFfmpeg {
        fail: bool,
        metadata: RefCell<Option<String>>,
        temp_paths: RefCell<Vec<PathBuf>>,
    }

    impl MediaTool for CopyingFfmpeg {
        fn probe_length(&self, _: &Path) -> ProbeResult<f64> {
            Ok(0.0)
        }

        fn probe_bitrate(&self, _: &Path) -> ProbeResult<u64> {
            Ok(0)
        }

        fn probe_tags(&self, _: &Path) -> ProbeResult<Tags> {
            Ok(Tags::new())
        }

        fn probe_chapters(&self, _: &Path) -> ProbeResult<Vec<Chapter>> {
            Ok(Vec::new())
        }

        fn run_ffmpeg(&self, args: &[String]) -> Result<CommandOutput, EncodeError> {
            let input = &args[args.iter().position(|a| a == "-i").unwrap() + 1];
            let meta = &args[args.iter().position(|a| a == "ffmetadata").unwrap() + 2];
            let output = args.last().unwrap();

            *self.metadata.borrow_mut() = fs::read_to_string(meta).ok();
            self.temp_paths
                .borrow_mut()
                .extend([PathBuf::from(meta), PathBuf::from(output)]);

            if self.fail {
                return Err(EncodeError {
                    exit_code: Some(1),
                    output: "Invalid data found when processing input".to_string(),
                });
            }
            fs::copy(input, output).unwrap();
            fs::OpenOptions::new()
                .append(true)
                .open(output)
                .and_then(|mut f| std::io::Write::write_all(&mut f, b"+tags"))
                .unwrap();
            Ok(CommandOutput::ok("", ""))
        }
    }

    #[test]
    fn retag_overwrites_source_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let book = dir.path().join("book.mp3");
        fs::write(&book, "audio").unwrap();

        let tool = CopyingFfmpeg::default();
        let tags: Tags = [("title", "Retagged")].into_iter().collect();
        let chapters = vec![Chapter::new(TimeBase::parse("1/1000"), 0, 5000, "One")];
        let options = JoinOptions {
            temp_dir: Some(dir.path().to_path_buf()),
            ..JoinOptions::default()
        };

        set_metadata(&tool, &book, &tags, &chapters, &options).unwrap();

        assert_eq!(fs::read_to_string(&book).unwrap(), "audio+tags");

        let doc = parse_ffmetadata(tool.metadata.borrow().as_deref().unwrap()).unwrap();
        assert_eq!(doc.tags, tags);
        assert_eq!(doc.chapters, chapters);

        let temp_paths = tool.temp_paths.borrow();
        assert!(temp_paths[1].to_string_lossy().ends_with(".mp3"));
        assert!(temp_paths.iter().all(|p| !p.exists()));
    }

    #[test]
    fn failed_retag_leaves_source_alone() {
        let dir = tempfile::tempdir().unwrap();
        let book = dir.path().join("book.m4a");
        fs::write(&book, "audio").unwrap();

        let tool = CopyingFfmpeg {
            fail: true,
            ..CopyingFfmpeg::default()
        };
        let options = JoinOptions {
            temp_dir: Some(dir.path().to_path_buf()),
            ..JoinOptions::default()
        };

        let err = set_metadata(&tool, &book, &Tags::new(), &[], &options).unwrap_err();
        assert!(matches!(err, JoinError::Encode(_)));
        assert_eq!(fs::read_to_string(&book).unwrap(), "audio");
        assert!(tool.temp_paths.borrow().iter().all(|p| !p.exists()));
    }
}
