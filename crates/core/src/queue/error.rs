//! Error types for the upload queue.

use std::path::PathBuf;
use thiserror::Error;

use crate::editor::EditorError;
use crate::hook::HookError;
use crate::protocol::ProtocolError;

/// Errors that can occur while managing or draining a queue.
#[derive(Debug, Error)]
pub enum QueueError {
    /// `init` on a directory that already holds something.
    #[error("{} is not empty", path.display())]
    AlreadyInUse { path: PathBuf },

    /// The store is used in a state that does not allow the operation.
    #[error("{0}")]
    StoreState(String),

    /// A caller-supplied value is outside its allowed domain.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Reading or writing a queue file failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A queue, status, or sidecar file could not be parsed.
    #[error("Failed to parse {}: {reason}", path.display())]
    Metadata { path: PathBuf, reason: String },

    /// Queue state could not be serialized.
    #[error("Failed to serialize {what}: {reason}")]
    Serialize { what: &'static str, reason: String },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error(transparent)]
    Editor(#[from] EditorError),
}

impl QueueError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
