//! Mock submission client for testing.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::DEFAULT_BASE_URL;
use crate::protocol::{
    ProtocolError, SubmissionClient, SubmissionInfo, UpdateRequest, UploadFile, UploadRequest,
};

/// A recorded upload for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    /// File name of the uploaded part.
    pub file_name: String,
    /// Size of the uploaded content in bytes.
    pub size: u64,
    /// The metadata that was sent.
    pub request: UploadRequest,
    /// URL handed back to the caller.
    pub url: String,
}

/// Mock implementation of the SubmissionClient trait.
///
/// Provides controllable behavior for testing:
/// - Hand out sequential submission URLs (`/view/1001/`, `/view/1002/`, ...)
/// - Track uploads and updates for assertions
/// - Fail the upload of a specific file, or the next call of any kind
///
/// # Example
///
/// ```rust,ignore
/// use faqueue_core::testing::MockSubmissionClient;
///
/// let client = MockSubmissionClient::new();
/// client.fail_upload_of("b.png", ProtocolError::Remote { status: 200, message: "nope".into() }).await;
///
/// let uploads = client.recorded_uploads().await;
/// assert_eq!(uploads.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockSubmissionClient {
    origin: String,
    next_id: AtomicU64,
    uploads: Arc<RwLock<Vec<RecordedUpload>>>,
    updates: Arc<RwLock<Vec<UpdateRequest>>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<ProtocolError>>>,
    /// Uploads of these file names fail once with the stored error.
    upload_errors: Arc<RwLock<HashMap<String, ProtocolError>>>,
    submission_infos: Arc<RwLock<HashMap<String, SubmissionInfo>>>,
    notifications: Arc<RwLock<BTreeMap<String, u64>>>,
}

impl Default for MockSubmissionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSubmissionClient {
    /// Create a new mock client.
    pub fn new() -> Self {
        Self {
            origin: DEFAULT_BASE_URL.to_string(),
            next_id: AtomicU64::new(1001),
            uploads: Arc::new(RwLock::new(Vec::new())),
            updates: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            upload_errors: Arc::new(RwLock::new(HashMap::new())),
            submission_infos: Arc::new(RwLock::new(HashMap::new())),
            notifications: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Get all recorded uploads.
    pub async fn recorded_uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.read().await.clone()
    }

    /// Get the number of uploads performed.
    pub async fn upload_count(&self) -> usize {
        self.uploads.read().await.len()
    }

    /// Get all recorded updates.
    pub async fn recorded_updates(&self) -> Vec<UpdateRequest> {
        self.updates.read().await.clone()
    }

    /// Get the number of updates performed.
    pub async fn update_count(&self) -> usize {
        self.updates.read().await.len()
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: ProtocolError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure the upload of `file_name` to fail once with `error`.
    pub async fn fail_upload_of(&self, file_name: &str, error: ProtocolError) {
        self.upload_errors
            .write()
            .await
            .insert(file_name.to_string(), error);
    }

    /// Configure what `submission_info` returns for `id`.
    pub async fn set_submission_info(&self, id: &str, info: SubmissionInfo) {
        self.submission_infos
            .write()
            .await
            .insert(id.to_string(), info);
    }

    /// Configure the notification counters.
    pub async fn set_notifications(&self, counters: BTreeMap<String, u64>) {
        *self.notifications.write().await = counters;
    }

    async fn take_error(&self) -> Result<(), ProtocolError> {
        match self.next_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SubmissionClient for MockSubmissionClient {
    fn origin(&self) -> &str {
        &self.origin
    }

    async fn upload(
        &self,
        file: &UploadFile,
        request: &UploadRequest,
    ) -> Result<String, ProtocolError> {
        self.take_error().await?;
        if let Some(error) = self.upload_errors.write().await.remove(&file.file_name) {
            return Err(error);
        }
        request.validate()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let url = self.submission_url(&id.to_string());
        self.uploads.write().await.push(RecordedUpload {
            file_name: file.file_name.clone(),
            size: file.len(),
            request: request.clone(),
            url: url.clone(),
        });
        Ok(url)
    }

    async fn update(&self, request: &UpdateRequest) -> Result<String, ProtocolError> {
        self.take_error().await?;
        request.validate()?;
        self.updates.write().await.push(request.clone());
        Ok(self.submission_url(&request.id))
    }

    async fn submission_info(&self, id: &str) -> Result<SubmissionInfo, ProtocolError> {
        self.take_error().await?;
        self.submission_infos
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ProtocolError::UnexpectedStatus {
                step: "edit page",
                status: 404,
            })
    }

    async fn notifications(&self) -> Result<BTreeMap<String, u64>, ProtocolError> {
        self.take_error().await?;
        Ok(self.notifications.read().await.clone())
    }
}
