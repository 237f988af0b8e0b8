//! File hashing and move helpers for finished outputs.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// What [`move_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The source now lives at the target path.
    Moved,
    /// The target already held identical content; the source was removed.
    Deduplicated,
}

/// SHA-256 of a file's content as lowercase hex.
pub fn file_hash(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Whether two files have identical content.
pub fn files_equal(a: &Path, b: &Path) -> io::Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(file_hash(a)? == file_hash(b)?)
}

/// Replace the content of `target` with the content of `source`.
///
/// The target is truncated and written in place, so it keeps its own
/// permissions and any hard links.
pub fn overwrite_file(source: &Path, target: &Path) -> io::Result<u64> {
    let mut input = File::open(source)?;
    let mut output = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(target)?;
    let copied = io::copy(&mut input, &mut output)?;
    output.sync_all()?;

    tracing::debug!(
        "Overwrote {} with {} ({} bytes)",
        target.display(),
        source.display(),
        copied
    );
    Ok(copied)
}

/// Move `source` to `target`.
///
/// When `target` already exists with identical content the source is
/// simply removed. Otherwise the target is replaced; if a rename is not
/// possible (e.g. across filesystems) the content is copied and the source
/// removed.
pub fn move_file(source: &Path, target: &Path) -> io::Result<MoveOutcome> {
    if target.exists() && files_equal(source, target)? {
        fs::remove_file(source)?;
        tracing::info!(
            "{} already present at {}, removed duplicate",
            source.display(),
            target.display()
        );
        return Ok(MoveOutcome::Deduplicated);
    }

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if let Err(e) = fs::rename(source, target) {
        tracing::debug!("Rename failed ({}), copying instead", e);
        overwrite_file(source, target)?;
        fs::remove_file(source)?;
    }

    tracing::info!("Moved {} to {}", source.display(), target.display());
    Ok(MoveOutcome::Moved)
}
