//! Error types for repository and storage operations.

use crate::types::{TaskId, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

/// Failures writing or reading the task file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors returned by [`Repository`](crate::Repository) operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("task not found: {0}")]
    NotFound(TaskId),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T, E = RepoError> = std::result::Result<T, E>;
