//! Types for submission operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::ProtocolError;

/// Content rating of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    General,
    Mature,
    Adult,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::General, Rating::Mature, Rating::Adult];

    /// The site's internal category code. Adult and mature are swapped
    /// relative to their severity; the site expects exactly these.
    pub fn code(&self) -> u8 {
        match self {
            Rating::General => 0,
            Rating::Adult => 1,
            Rating::Mature => 2,
        }
    }

    /// Reverse of [`Rating::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Rating::General),
            1 => Some(Rating::Adult),
            2 => Some(Rating::Mature),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::General => "general",
            Rating::Mature => "mature",
            Rating::Adult => "adult",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rating::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| {
                ProtocolError::Validation(format!(
                    "{:?} is not one of: general, mature, adult",
                    s
                ))
            })
    }
}

/// Kind of submission, only relevant when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionType {
    #[default]
    Submission,
    Story,
    Poetry,
    Music,
}

impl SubmissionType {
    pub const ALL: [SubmissionType; 4] = [
        SubmissionType::Submission,
        SubmissionType::Story,
        SubmissionType::Poetry,
        SubmissionType::Music,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionType::Submission => "submission",
            SubmissionType::Story => "story",
            SubmissionType::Poetry => "poetry",
            SubmissionType::Music => "music",
        }
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubmissionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| {
                ProtocolError::Validation(format!(
                    "{:?} is not one of: submission, story, poetry, music",
                    s
                ))
            })
    }
}

/// A file to upload, already read into memory.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// File name sent with the multipart part.
    pub file_name: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// Read a file from disk.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, content })
    }

    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Everything needed to create a new submission.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub rating: Rating,
    pub submission_type: SubmissionType,
    pub lock_comments: bool,
    pub scrap: bool,
    /// Name of a folder to create for this submission, empty for none.
    pub create_folder_name: String,
}

impl UploadRequest {
    pub fn validate(&self) -> Result<(), ProtocolError> {
        validate_title(&self.title)
    }
}

/// New metadata for an existing submission.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub rating: Rating,
    pub lock_comments: bool,
    pub scrap: bool,
}

impl UpdateRequest {
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.id.trim().is_empty() {
            return Err(ProtocolError::Validation(
                "submission id must not be empty".to_string(),
            ));
        }
        validate_title(&self.title)
    }
}

fn validate_title(title: &str) -> Result<(), ProtocolError> {
    if title.trim().is_empty() {
        return Err(ProtocolError::Validation(
            "title must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Current metadata of a submission, as shown on its edit page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionInfo {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub rating: Rating,
    pub lock_comments: bool,
    pub scrap: bool,
    /// Selected category code.
    pub cat: String,
    /// Selected theme code.
    pub atype: String,
    pub species: String,
    pub gender: String,
    pub folder_ids: Vec<String>,
}

/// Selections on the edit form that updates must echo back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditSelections {
    pub key: String,
    pub cat: String,
    pub atype: String,
    pub species: String,
    pub gender: String,
    pub folder_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_codes_are_exact() {
        assert_eq!(Rating::General.code(), 0);
        assert_eq!(Rating::Adult.code(), 1);
        assert_eq!(Rating::Mature.code(), 2);
    }

    #[test]
    fn test_rating_code_roundtrip() {
        for rating in Rating::ALL {
            assert_eq!(Rating::from_code(rating.code()), Some(rating));
        }
        assert_eq!(Rating::from_code(3), None);
    }

    #[test]
    fn test_rating_from_str() {
        assert_eq!("adult".parse::<Rating>().unwrap(), Rating::Adult);
        assert_eq!(" mature ".parse::<Rating>().unwrap(), Rating::Mature);
        let err = "explicit".parse::<Rating>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_submission_type_from_str() {
        assert_eq!(
            "poetry".parse::<SubmissionType>().unwrap(),
            SubmissionType::Poetry
        );
        assert!("video".parse::<SubmissionType>().unwrap_err().is_validation());
    }

    #[test]
    fn test_rating_deserialize_rejects_unknown() {
        #[derive(Deserialize)]
        struct Holder {
            #[allow(dead_code)]
            rating: Rating,
        }
        assert!(toml::from_str::<Holder>("rating = \"general\"").is_ok());
        assert!(toml::from_str::<Holder>("rating = \"nsfw\"").is_err());
    }

    #[test]
    fn test_upload_request_requires_title() {
        let request = UploadRequest {
            title: "  ".to_string(),
            description: String::new(),
            keywords: String::new(),
            rating: Rating::General,
            submission_type: SubmissionType::Submission,
            lock_comments: false,
            scrap: false,
            create_folder_name: String::new(),
        };
        assert!(request.validate().unwrap_err().is_validation());
    }
}
