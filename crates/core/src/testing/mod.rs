//! Testing utilities and mock implementations.
//!
//! This module provides a mock of the submission client so the queue and
//! hooks can be exercised without talking to the site.
//!
//! # Example
//!
//! ```rust,ignore
//! use faqueue_core::testing::{fixtures, MockSubmissionClient};
//!
//! let client = Arc::new(MockSubmissionClient::new());
//! let runner = UploadRunner::new(client.clone());
//! runner.run(&mut store, 30).await?;
//! assert_eq!(client.upload_count().await, 2);
//! ```

mod mock_client;

pub use mock_client::{MockSubmissionClient, RecordedUpload};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::protocol::{Rating, SubmissionType, UploadRequest};
    use crate::queue::SubmissionMetadata;

    /// Create sidecar metadata with reasonable defaults.
    pub fn metadata(title: &str, rating: Rating) -> SubmissionMetadata {
        SubmissionMetadata {
            title: title.to_string(),
            description: format!("Description of {}", title),
            keywords: "test".to_string(),
            rating,
            submission_type: SubmissionType::Submission,
            scrap: false,
            lock_comments: false,
            create_folder_name: String::new(),
            after_upload: Vec::new(),
            id: None,
        }
    }

    /// Create an upload request with reasonable defaults.
    pub fn upload_request(title: &str) -> UploadRequest {
        metadata(title, Rating::General).upload_request()
    }

    /// Render a sidecar file body.
    pub fn sidecar(title: &str, rating: Rating) -> String {
        format!(
            "title = {:?}\ndescription = \"Description of {}\"\nkeywords = \"test\"\nrating = \"{}\"\n",
            title, title, rating
        )
    }
}
