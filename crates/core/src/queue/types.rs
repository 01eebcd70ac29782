//! Types persisted in a queue directory.

use serde::{Deserialize, Serialize};

use crate::hook::HookAction;
use crate::protocol::{Rating, SubmissionType, UploadRequest};

/// Submission metadata of one queued file, as stored in its sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Keywords separated by spaces.
    #[serde(default)]
    pub keywords: String,
    pub rating: Rating,
    #[serde(default, rename = "type")]
    pub submission_type: SubmissionType,
    #[serde(default)]
    pub scrap: bool,
    #[serde(default)]
    pub lock_comments: bool,
    /// Folder to create for this submission, empty for none.
    #[serde(default)]
    pub create_folder_name: String,
    /// Actions to run after this file has been uploaded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub after_upload: Vec<HookAction>,
    /// Submission id, only known once uploaded. Never read from a sidecar.
    #[serde(skip)]
    pub id: Option<String>,
}

impl SubmissionMetadata {
    pub fn upload_request(&self) -> UploadRequest {
        UploadRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            keywords: self.keywords.clone(),
            rating: self.rating,
            submission_type: self.submission_type,
            lock_comments: self.lock_comments,
            scrap: self.scrap,
            create_folder_name: self.create_folder_name.clone(),
        }
    }
}

/// Upload state of one file. The URL is present iff the file was uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawUploadStatus")]
pub struct UploadStatus {
    uploaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl UploadStatus {
    pub fn pending() -> Self {
        Self {
            uploaded: false,
            url: None,
        }
    }

    pub fn uploaded(url: String) -> Self {
        Self {
            uploaded: true,
            url: Some(url),
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.uploaded
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// Status as written in `status.toml`, before the URL rule is checked.
#[derive(Deserialize)]
struct RawUploadStatus {
    uploaded: bool,
    #[serde(default)]
    url: Option<String>,
}

impl TryFrom<RawUploadStatus> for UploadStatus {
    type Error = String;

    fn try_from(raw: RawUploadStatus) -> Result<Self, Self::Error> {
        match (raw.uploaded, raw.url) {
            (true, Some(url)) if !url.trim().is_empty() => Ok(Self::uploaded(url)),
            (true, _) => Err("uploaded files need a url".to_string()),
            (false, None) => Ok(Self::pending()),
            (false, Some(_)) => Err("files not uploaded yet cannot have a url".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_minimal_sidecar() {
        let metadata: SubmissionMetadata =
            toml::from_str("title = \"Foo\"\nrating = \"general\"\n").unwrap();
        assert_eq!(metadata.title, "Foo");
        assert_eq!(metadata.submission_type, SubmissionType::Submission);
        assert!(!metadata.scrap);
        assert!(metadata.after_upload.is_empty());
        assert!(metadata.id.is_none());
    }

    #[test]
    fn test_metadata_rejects_unknown_type() {
        let result: Result<SubmissionMetadata, _> =
            toml::from_str("title = \"Foo\"\nrating = \"general\"\ntype = \"video\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_metadata_ignores_id_in_sidecar() {
        let metadata: SubmissionMetadata =
            toml::from_str("title = \"Foo\"\nrating = \"adult\"\nid = \"123\"\n").unwrap();
        assert!(metadata.id.is_none());
    }

    #[test]
    fn test_upload_request_from_metadata() {
        let metadata: SubmissionMetadata = toml::from_str(
            "title = \"Foo\"\nrating = \"mature\"\ntype = \"story\"\nscrap = true\ncreate_folder_name = \"Comics\"\n",
        )
        .unwrap();
        let request = metadata.upload_request();
        assert_eq!(request.rating, Rating::Mature);
        assert_eq!(request.submission_type, SubmissionType::Story);
        assert!(request.scrap);
        assert_eq!(request.create_folder_name, "Comics");
    }

    #[test]
    fn test_status_serialization() {
        let pending = toml::to_string(&UploadStatus::pending()).unwrap();
        assert_eq!(pending.trim(), "uploaded = false");

        let done = UploadStatus::uploaded("https://www.furaffinity.net/view/1/".to_string());
        let parsed: UploadStatus = toml::from_str(&toml::to_string(&done).unwrap()).unwrap();
        assert_eq!(parsed, done);
        assert_eq!(parsed.url(), Some("https://www.furaffinity.net/view/1/"));
    }

    #[test]
    fn test_status_requires_url_iff_uploaded() {
        assert!(toml::from_str::<UploadStatus>("uploaded = true\n").is_err());
        assert!(toml::from_str::<UploadStatus>("uploaded = true\nurl = \"\"\n").is_err());
        assert!(toml::from_str::<UploadStatus>(
            "uploaded = false\nurl = \"https://www.furaffinity.net/view/1/\"\n"
        )
        .is_err());
        assert_eq!(
            toml::from_str::<UploadStatus>("uploaded = false\n").unwrap(),
            UploadStatus::pending()
        );
    }
}
