//! After-upload hooks.
//!
//! A sidecar may carry a list of actions to run once its file has been
//! uploaded, typically to cross-link alternate versions of a piece. Actions
//! run against a [`HookContext`] exposing the client, the uploaded file's
//! metadata and every other queued file's metadata (with submission ids of
//! files uploaded so far). Every file an action modifies is then pushed to the
//! site with an update.

mod actions;
mod context;
mod error;
mod runner;

pub use actions::HookAction;
pub use context::{HookContext, HookItem, LinkTarget};
pub use error::HookError;
pub use runner::{submission_id_from_url, HookRunner};
