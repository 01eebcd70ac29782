//! Local upload queue.
//!
//! A queue directory holds the files to upload, a `<file>.info.toml` sidecar
//! with the submission metadata of each, and a `.faqueue/` control directory:
//!
//! ```text
//! queue-dir/
//! ├── .faqueue/
//! │   ├── queue.toml          # queue = ["a.png", "art/b.png"]
//! │   ├── status.toml         # ["a.png"] uploaded = true, url = "..."
//! │   └── templates/
//! │       └── submission.toml # rendered into new sidecars
//! ├── a.png
//! ├── a.png.info.toml
//! └── art/
//!     ├── b.png
//!     └── b.png.info.toml
//! ```
//!
//! [`QueueStore`] manages that layout and [`UploadRunner`] drains it.

mod error;
mod runner;
mod store;
mod template;
mod types;

pub use error::QueueError;
pub use runner::{RunSummary, UploadRunner, DEFAULT_WAIT_SECS, MIN_WAIT_SECS};
pub use store::{
    QueueStore, CONTROL_DIR, QUEUE_FILE, SIDECAR_SUFFIX, STATUS_FILE, TEMPLATES_DIR,
    TEMPLATE_FILE,
};
pub use template::SUBMISSION_TEMPLATE;
pub use types::{SubmissionMetadata, UploadStatus};
