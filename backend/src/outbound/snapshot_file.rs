//! JSON snapshot persistence for the in-memory document store.
//!
//! Snapshots are written with a temporary file and rename, so a crash while
//! saving leaves the previous snapshot intact.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use thiserror::Error;
use tracing::debug;

use super::memory::StoreSnapshot;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Errors raised while loading or saving a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotFileError {
    /// The path does not name a file.
    #[error("snapshot path '{path}' must name a file")]
    InvalidPath {
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The snapshot could not be read.
    #[error("failed to read snapshot at '{path}': {message}")]
    Read {
        /// Snapshot path.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },
    /// The snapshot is not valid JSON for the document model.
    #[error("invalid snapshot JSON at '{path}': {message}")]
    Parse {
        /// Snapshot path.
        path: Utf8PathBuf,
        /// Description of the parse error.
        message: String,
    },
    /// The snapshot could not be written.
    #[error("failed to write snapshot at '{path}': {message}")]
    Write {
        /// Path being written.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}

/// Split `path` into an opened parent directory and the bare file name.
fn open_parent<'a>(path: &'a Utf8Path) -> Result<(Dir, &'a str), SnapshotFileError> {
    let file_name = match path.components().next_back() {
        Some(Utf8Component::Normal(name)) => name,
        _ => {
            return Err(SnapshotFileError::InvalidPath {
                path: path.to_path_buf(),
            });
        }
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| {
        SnapshotFileError::Read {
            path: parent.to_path_buf(),
            message: err.to_string(),
        }
    })?;
    Ok((dir, file_name))
}

/// Load a snapshot; a missing file yields an empty store.
pub fn load_snapshot(path: &Utf8Path) -> Result<StoreSnapshot, SnapshotFileError> {
    let (dir, file_name) = open_parent(path)?;
    let contents = match dir.read_to_string(file_name) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(%path, "snapshot not found; starting empty");
            return Ok(StoreSnapshot::default());
        }
        Err(err) => {
            return Err(SnapshotFileError::Read {
                path: path.to_path_buf(),
                message: err.to_string(),
            });
        }
    };
    serde_json::from_str(&contents).map_err(|err| SnapshotFileError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Persist `snapshot` to `path` atomically.
pub fn save_snapshot(path: &Utf8Path, snapshot: &StoreSnapshot) -> Result<(), SnapshotFileError> {
    let contents =
        serde_json::to_string_pretty(snapshot).map_err(|err| SnapshotFileError::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    let (dir, file_name) = open_parent(path)?;

    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{suffix}.{counter}",
        std::process::id()
    );

    write_to_temp_file(&dir, &tmp_name, path, &contents)?;
    if let Err(err) = dir.rename(&tmp_name, &dir, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(SnapshotFileError::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        });
    }
    // Directory sync is best effort.
    drop(dir.open(".").and_then(|parent| parent.sync_all()));

    debug!(
        %path,
        users = snapshot.users.len(),
        recommendations = snapshot.recommendations.len(),
        "snapshot saved"
    );
    Ok(())
}

fn write_to_temp_file(
    dir: &Dir,
    tmp_name: &str,
    target_path: &Utf8Path,
    contents: &str,
) -> Result<(), SnapshotFileError> {
    let write_error = |err: io::Error| SnapshotFileError::Write {
        path: target_path.with_file_name(tmp_name),
        message: err.to_string(),
    };
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options).map_err(write_error)?;

    if let Err(err) = file
        .write_all(contents.as_bytes())
        .and_then(|()| file.sync_all())
    {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(write_error(err));
    }
    Ok(())
}
