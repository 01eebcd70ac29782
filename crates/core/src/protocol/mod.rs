//! Submission protocol for FurAffinity's HTML form flow.
//!
//! The site has no API. Creating a submission means fetching a form, lifting
//! its hidden one-time `key`, posting the file, following the redirect by
//! hand to the finalize form, and posting the metadata. Editing works the same
//! way against the submission's edit page.
//!
//! # Example
//!
//! ```ignore
//! use faqueue_core::protocol::{FaClient, SubmissionClient, UploadFile, UploadRequest};
//!
//! let client = FaClient::new("a-cookie", "b-cookie", &SiteConfig::default())?;
//! let file = UploadFile::read(Path::new("pic.png")).await?;
//! let url = client.upload(&file, &request).await?;
//! ```

mod client;
mod error;
mod scrape;
mod traits;
mod types;

pub use client::FaClient;
pub use error::ProtocolError;
pub use traits::SubmissionClient;
pub use types::{
    Rating, SubmissionInfo, SubmissionType, UpdateRequest, UploadFile, UploadRequest,
};
