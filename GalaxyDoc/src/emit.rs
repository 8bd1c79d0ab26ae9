//! Atomic output of encoded records

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::formats::EncodedRecord;

/// Write `bytes` to `path` atomically
///
/// The data goes to a temporary file in the same directory, is synced, and
/// then renamed over `path`. On failure `path` is untouched.
///
/// # Errors
///
/// Returns [`Error::Emit`] if any step fails.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let staged = stage(path, bytes)?;
    persist(staged, path)
}

/// Write every record into `dir`, all or nothing
///
/// Records are staged first and persisted in order. If a later persist fails,
/// targets already replaced are restored to their previous contents (or
/// removed when they did not exist before).
///
/// # Errors
///
/// Returns [`Error::Emit`] for the first record that could not be written.
pub fn emit_records<P: AsRef<Path>>(dir: P, records: &[EncodedRecord]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| Error::Emit {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut staged = Vec::with_capacity(records.len());
    for record in records {
        let path = dir.join(record.kind().file_name());
        let previous = if path.is_file() {
            match fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(source) => return Err(Error::Emit { path, source }),
            }
        } else {
            None
        };
        let file = stage(&path, record.as_bytes())?;
        staged.push((path, file, previous));
    }

    let mut committed: Vec<(PathBuf, Option<Vec<u8>>)> = Vec::with_capacity(staged.len());
    for (path, file, previous) in staged {
        if let Err(e) = persist(file, &path) {
            rollback(&committed);
            return Err(e);
        }
        tracing::info!("Wrote {}", path.display());
        committed.push((path, previous));
    }

    Ok(committed.into_iter().map(|(path, _)| path).collect())
}

fn stage(path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let emit_err = |source| Error::Emit {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(parent).map_err(emit_err)?;
    file.write_all(bytes).map_err(emit_err)?;
    file.as_file().sync_all().map_err(emit_err)?;
    Ok(file)
}

fn persist(file: NamedTempFile, path: &Path) -> Result<()> {
    file.persist(path).map_err(|e| Error::Emit {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

fn rollback(committed: &[(PathBuf, Option<Vec<u8>>)]) {
    for (path, previous) in committed.iter().rev() {
        let restored = match previous {
            Some(bytes) => stage(path, bytes).and_then(|file| persist(file, path)),
            None => fs::remove_file(path).map_err(Error::from),
        };
        match restored {
            Ok(()) => tracing::warn!("Rolled back {}", path.display()),
            Err(e) => tracing::error!("Failed to roll back {}: {}", path.display(), e),
        }
    }
}
