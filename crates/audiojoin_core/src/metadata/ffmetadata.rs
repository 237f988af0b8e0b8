//! FFMETADATA1 serialization.
//!
//! The format is described at <https://ffmpeg.org/ffmpeg-formats.html#Metadata-1>:
//! a `;FFMETADATA1` header, global `key=value` tags, then one `[CHAPTER]`
//! section per chapter. Sections end at the next section header or at the
//! end of the file.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::escape::{sanitize, unescape};
use super::tags::Tags;
use super::{MetadataError, MetadataResult};
use crate::chapters::{Chapter, TimeBase};

/// Header line of every FFMETADATA1 file.
pub const FFMETADATA_HEADER: &str = ";FFMETADATA1";

const CHAPTER_SECTION: &str = "[CHAPTER]";

/// Render tags and chapters as FFMETADATA1 text.
///
/// Lines are separated by `\n` with no trailing terminator. Tags are written
/// in their insertion order, chapters in the order given.
pub fn serialize(tags: &Tags, chapters: &[Chapter]) -> String {
    let mut out = String::from(FFMETADATA_HEADER);

    for (key, value) in tags.iter() {
        out.push('\n');
        out.push_str(&sanitize(key));
        out.push('=');
        out.push_str(&sanitize(value));
    }

    for chapter in chapters {
        out.push('\n');
        out.push_str(CHAPTER_SECTION);
        out.push_str(&format!("\nTIMEBASE={}", chapter.time_base));
        out.push_str(&format!("\nSTART={}", chapter.start));
        out.push_str(&format!("\nEND={}", chapter.end));
        out.push_str(&format!("\ntitle={}", sanitize(&chapter.title)));
    }

    out
}

/// Write tags and chapters to a new temporary FFMETADATA1 file.
///
/// The file is created in `dir` (or the system temp dir) with a unique name
/// and is deleted when the returned handle is dropped.
pub fn write_temp_metadata(
    tags: &Tags,
    chapters: &[Chapter],
    dir: Option<&Path>,
) -> MetadataResult<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("ffmetadata-").suffix(".txt");

    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };

    file.write_all(serialize(tags, chapters).as_bytes())?;
    file.flush()?;

    tracing::debug!(
        "Wrote metadata file {} ({} tags, {} chapters)",
        file.path().display(),
        tags.len(),
        chapters.len()
    );

    Ok(file)
}

/// Tags and chapters read back from an FFMETADATA1 file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataDocument {
    pub tags: Tags,
    pub chapters: Vec<Chapter>,
}

enum Section {
    Global,
    Chapter(ChapterBuilder),
    Other,
}

#[derive(Default)]
struct ChapterBuilder {
    time_base: Option<TimeBase>,
    start: i64,
    end: i64,
    title: String,
}

impl ChapterBuilder {
    fn build(self) -> Chapter {
        Chapter::new(
            self.time_base.unwrap_or_default(),
            self.start,
            self.end,
            self.title,
        )
    }
}

/// Parse FFMETADATA1 text.
///
/// Comment lines (`;` or `#`) and blank lines are skipped. Sections other
/// than `[CHAPTER]` are ignored. Chapter keys other than `TIMEBASE`,
/// `START`, `END` and `title` are ignored.
pub fn parse_ffmetadata(text: &str) -> MetadataResult<MetadataDocument> {
    let mut lines = text.lines().enumerate();

    match lines.next() {
        Some((_, first)) if first.trim_end().starts_with(";FFMETADATA") => {}
        _ => return Err(MetadataError::MissingHeader),
    }

    let mut doc = MetadataDocument::default();
    let mut section = Section::Global;

    for (idx, raw_line) in lines {
        let line_no = idx + 1;
        let line = raw_line.trim_end_matches('\r');

        if line.trim().is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.trim_end().ends_with(']') {
            if let Section::Chapter(builder) = std::mem::replace(&mut section, Section::Other) {
                doc.chapters.push(builder.build());
            }
            if line.trim_end() == CHAPTER_SECTION {
                section = Section::Chapter(ChapterBuilder::default());
            }
            continue;
        }

        let (key, value) = split_key_value(line).ok_or_else(|| MetadataError::MalformedLine {
            line: line_no,
            content: line.to_string(),
        })?;

        match &mut section {
            Section::Global => {
                doc.tags.insert(unescape(key), unescape(value));
            }
            Section::Chapter(builder) => match key {
                "TIMEBASE" => builder.time_base = Some(TimeBase::parse(value)),
                "START" => builder.start = parse_ticks(value, line_no, "START")?,
                "END" => builder.end = parse_ticks(value, line_no, "END")?,
                "title" => builder.title = unescape(value),
                _ => {}
            },
            Section::Other => {}
        }
    }

    if let Section::Chapter(builder) = section {
        doc.chapters.push(builder.build());
    }

    Ok(doc)
}

/// Split at the first `=` that is not escaped.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '=' if !escaped => return Some((&line[..i], &line[i + 1..])),
            _ => escaped = false,
        }
    }
    None
}

fn parse_ticks(value: &str, line: usize, field: &'static str) -> MetadataResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| MetadataError::InvalidNumber { line, field })
}
