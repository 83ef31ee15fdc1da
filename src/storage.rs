//! Storage layer for tasklink: the whole collection as one JSON file.

use crate::error::StorageError;
use crate::types::Task;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Default task file, relative to the working directory.
pub const DEFAULT_FILE: &str = ".tasks.json";

/// Suffix for a corrupt file moved aside during load.
const BACKUP_SUFFIX: &str = ".bak";

/// Suffix for the scratch file written before the rename in `save`.
const TEMP_SUFFIX: &str = ".tmp";

/// Transcoder between a task file and an in-memory collection.
///
/// A `Store` holds no tasks itself; every call reads or writes the file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Create a store for the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the task file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a corrupt task file is moved by [`Store::load`].
    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.path, BACKUP_SUFFIX)
    }

    /// Read every task from disk.
    ///
    /// A missing or blank file yields an empty collection. A file that does
    /// not parse as a task list is renamed to [`Store::backup_path`] and
    /// also yields an empty collection.
    pub fn load(&self) -> Result<Vec<Task>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No task file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Task file {} is not valid UTF-8", self.path.display());
                self.quarantine();
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Task>>(&contents) {
            Ok(tasks) => {
                info!("Loaded {} task(s) from {}", tasks.len(), self.path.display());
                Ok(tasks)
            }
            Err(e) => {
                warn!("Failed to parse task file {}: {}", self.path.display(), e);
                self.quarantine();
                Ok(Vec::new())
            }
        }
    }

    /// Replace the file with `tasks`.
    ///
    /// The document goes to a sibling temp file first and is renamed over
    /// the target once synced.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let mut json = serde_json::to_string_pretty(tasks)?;
        json.push('\n');

        let temp_path = with_suffix(&self.path, TEMP_SUFFIX);
        if let Err(e) = write_synced(&temp_path, json.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::io(&temp_path, e));
        }
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::io(&self.path, e));
        }

        debug!("Saved {} task(s) to {}", tasks.len(), self.path.display());
        Ok(())
    }

    /// Move a corrupt task file out of the way. Failure only logs.
    fn quarantine(&self) {
        let backup = self.backup_path();
        match fs::rename(&self.path, &backup) {
            Ok(()) => warn!("Moved corrupt task file to {}", backup.display()),
            Err(e) => warn!("Failed to back up corrupt task file {}: {}", self.path.display(), e),
        }
    }
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}
