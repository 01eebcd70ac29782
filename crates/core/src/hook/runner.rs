//! Runs after-upload hooks for one upload batch.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::protocol::SubmissionClient;
use crate::queue::{SubmissionMetadata, UploadStatus};

use super::actions::HookAction;
use super::context::{HookContext, HookItem};
use super::error::HookError;

/// Submission id inside a view URL, e.g. `/view/54328944/`.
static VIEW_ID: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"/view/([^/?#]+)").ok());

/// Extract the submission id from its URL.
pub fn submission_id_from_url(url: &str) -> Option<String> {
    VIEW_ID
        .as_ref()?
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Holds the hook view of every queued file for the length of a batch, so
/// edits made by one hook are visible to the next.
pub struct HookRunner {
    client: Arc<dyn SubmissionClient>,
    items: BTreeMap<String, HookItem>,
}

impl HookRunner {
    pub fn new(
        client: Arc<dyn SubmissionClient>,
        metadata: &BTreeMap<String, SubmissionMetadata>,
    ) -> Self {
        let items = metadata
            .iter()
            .map(|(name, info)| (name.clone(), HookItem::from(info)))
            .collect();
        Self { client, items }
    }

    pub fn items(&self) -> &BTreeMap<String, HookItem> {
        &self.items
    }

    /// Fill in ids of every uploaded file from its recorded URL.
    pub fn update_ids<'a>(
        &mut self,
        statuses: impl IntoIterator<Item = (&'a String, &'a UploadStatus)>,
    ) {
        trace!("Updating file info ids");
        for (name, status) in statuses {
            let Some(url) = status.url().filter(|_| status.is_uploaded()) else {
                continue;
            };
            let Some(item) = self.items.get_mut(name) else {
                continue;
            };
            match submission_id_from_url(url) {
                Some(id) => item.id = Some(id),
                None => warn!("No submission id in URL {:?} of {:?}", url, name),
            }
        }
    }

    /// Run `actions` for the just uploaded `file_name`, then push every
    /// modified file to the site. Returns the updated URLs.
    pub async fn run_hook(
        &mut self,
        file_name: &str,
        actions: &[HookAction],
    ) -> Result<Vec<String>, HookError> {
        debug!("Running hook for {:?}", file_name);
        trace!("Hook actions: {:?}", actions);

        let mut context = HookContext::new(self.client.as_ref(), file_name, &mut self.items)?;
        for action in actions {
            context.apply(action)?;
        }
        context.flush().await
    }
}
