//! Error types for after-upload hooks.

use thiserror::Error;

use crate::protocol::ProtocolError;

/// Errors that can occur while running a hook.
#[derive(Debug, Error)]
pub enum HookError {
    /// A hook referenced a file that has no metadata.
    #[error("Hook references unknown file {0:?}")]
    UnknownItem(String),

    /// A hook modified a file that has not been uploaded, so it cannot be
    /// updated on the site.
    #[error("Cannot update {0:?}: it has no submission id, probably not uploaded yet")]
    NotUploaded(String),

    /// Updating a submission failed.
    #[error("Hook update of {file:?} failed: {source}")]
    Update {
        file: String,
        #[source]
        source: ProtocolError,
    },
}
