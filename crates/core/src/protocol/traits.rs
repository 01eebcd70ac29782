//! Trait definitions for the submission protocol.

use async_trait::async_trait;
use std::collections::BTreeMap;

use super::error::ProtocolError;
use super::types::{SubmissionInfo, UpdateRequest, UploadFile, UploadRequest};

/// A client able to create and edit submissions on the site.
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    /// Site origin, without trailing slash.
    fn origin(&self) -> &str;

    /// Creates a new submission and returns its URL.
    async fn upload(
        &self,
        file: &UploadFile,
        request: &UploadRequest,
    ) -> Result<String, ProtocolError>;

    /// Replaces the metadata of an existing submission and returns its URL.
    async fn update(&self, request: &UpdateRequest) -> Result<String, ProtocolError>;

    /// Reads the current metadata of one of the account's submissions.
    async fn submission_info(&self, id: &str) -> Result<SubmissionInfo, ProtocolError>;

    /// Current notification counters, keyed by kind.
    async fn notifications(&self) -> Result<BTreeMap<String, u64>, ProtocolError>;

    /// Canonical view URL of a submission.
    fn submission_url(&self, id: &str) -> String {
        format!("{}/view/{}/", self.origin(), id)
    }
}
