//! Drains a queue, one upload at a time.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::hook::HookRunner;
use crate::protocol::{SubmissionClient, UploadFile};

use super::error::QueueError;
use super::store::QueueStore;

/// Smallest pause allowed between two uploads.
pub const MIN_WAIT_SECS: u64 = 30;

/// Pause used when the caller does not pick one.
pub const DEFAULT_WAIT_SECS: u64 = 60;

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Uploaded files with their submission URLs, in upload order.
    pub uploaded: Vec<(String, String)>,
    /// Queue entries dropped because they had no sidecar.
    pub skipped: Vec<String>,
    /// Submissions updated by hooks.
    pub hook_updates: usize,
}

pub struct UploadRunner {
    client: Arc<dyn SubmissionClient>,
}

impl UploadRunner {
    pub fn new(client: Arc<dyn SubmissionClient>) -> Self {
        Self { client }
    }

    /// Upload everything in the queue, front first, waiting `wait_secs`
    /// between uploads.
    ///
    /// State is persisted after every item. On error the failing file stays
    /// at the front of the queue and everything before it stays recorded as
    /// uploaded.
    pub async fn run(
        &self,
        store: &mut QueueStore,
        wait_secs: u64,
    ) -> Result<RunSummary, QueueError> {
        if wait_secs < MIN_WAIT_SECS {
            return Err(QueueError::Validation(format!(
                "wait time must be at least {} seconds, got {}",
                MIN_WAIT_SECS, wait_secs
            )));
        }
        store.ensure_loaded()?;

        let mut hooks = HookRunner::new(Arc::clone(&self.client), store.metadata());
        let mut summary = RunSummary::default();

        while let Some(file) = store.queue().first().cloned() {
            let Some(mut metadata) = store.metadata().get(&file).cloned() else {
                warn!("No submission info found for {:?}, ignoring", file);
                store.discard(&file)?;
                summary.skipped.push(file);
                continue;
            };

            let actions = std::mem::take(&mut metadata.after_upload);
            let request = metadata.upload_request();
            let path = store.file_path(&file);
            let upload = UploadFile::read(&path)
                .await
                .map_err(|e| QueueError::io(&path, e))?;

            info!("Uploading {:?} ({:?})", request.title, file);
            let url = self.client.upload(&upload, &request).await?;
            store.record_upload(&file, &url)?;
            info!("Uploaded {:?} to {}", file, url);

            if !actions.is_empty() {
                hooks.update_ids(store.statuses());
                let updated = hooks.run_hook(&file, &actions).await?;
                debug!("Hook for {:?} updated {} submissions", file, updated.len());
                summary.hook_updates += updated.len();
            }
            summary.uploaded.push((file, url));

            if !store.queue().is_empty() {
                info!("Waiting {} seconds until the next upload", wait_secs);
                tokio::time::sleep(Duration::from_secs(wait_secs)).await;
            }
        }

        Ok(summary)
    }
}
