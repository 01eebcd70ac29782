//! FurAffinity client built on its legacy HTML form flow.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, LOCATION, USER_AGENT};
use reqwest::{multipart, redirect, Client, Response, StatusCode};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

use crate::config::SiteConfig;

use super::scrape;
use super::types::{EditSelections, SubmissionInfo, UpdateRequest, UploadFile, UploadRequest};
use super::{ProtocolError, SubmissionClient};

/// Path the upload step is expected to redirect to.
const FINALIZE_PATH: &str = "/submit/finalize/";

/// Category "Visual Art -> All".
const DEFAULT_CATEGORY: &str = "1";
/// Theme "General Things -> All".
const DEFAULT_THEME: &str = "1";
/// Species "Unspecified / Any".
const DEFAULT_SPECIES: &str = "1";
/// Gender "Any".
const DEFAULT_GENDER: &str = "0";

/// FurAffinity client authenticated with a browser session's cookies.
pub struct FaClient {
    client: Client,
    origin: String,
}

impl FaClient {
    /// Create a new client from the `a` and `b` session cookies.
    pub fn new(a: &str, b: &str, site: &SiteConfig) -> Result<Self, ProtocolError> {
        if a.trim().is_empty() {
            return Err(ProtocolError::InvalidCredentials(
                "a needs to be a non-empty string".to_string(),
            ));
        }
        if b.trim().is_empty() {
            return Err(ProtocolError::InvalidCredentials(
                "b needs to be a non-empty string".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("faqueue/", env!("CARGO_PKG_VERSION"), " (Rust)")),
        );
        let mut cookie = HeaderValue::from_str(&format!("a={}; b={}", a.trim(), b.trim()))
            .map_err(|_| {
                ProtocolError::InvalidCredentials("cookies contain invalid characters".to_string())
            })?;
        cookie.set_sensitive(true);
        headers.insert(COOKIE, cookie);

        // The site answers form posts with a GET redirect that echoes the
        // post parameters, so redirects are followed by hand.
        let client = Client::builder()
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(site.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            origin: site.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.origin, path)
    }

    /// GET a page and return its body.
    async fn get_page(&self, step: &'static str, path: &str) -> Result<String, ProtocolError> {
        let url = self.url(path);
        let started = Instant::now();
        let response = self.client.get(&url).send().await?;
        trace!(url = %url, status = response.status().as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "GET");

        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::UnexpectedStatus {
                step,
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    /// POST a url-encoded form.
    async fn post_form(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<Response, ProtocolError> {
        let url = self.url(path);
        let started = Instant::now();
        let response = self.client.post(&url).form(form).send().await?;
        trace!(url = %url, status = response.status().as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "POST");
        Ok(response)
    }

    /// Turn the final 302 of a form flow into the submission URL, or the
    /// site's error text into an error.
    async fn finish_form_flow(
        &self,
        step: &'static str,
        response: Response,
    ) -> Result<String, ProtocolError> {
        let status = response.status();
        if status == StatusCode::FOUND {
            let location = redirect_location(step, &response)?;
            return Ok(join_url(&self.origin, &location));
        }

        let body = response.text().await?;
        let message = scrape::parse_error_message(&body)?;
        Err(ProtocolError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SubmissionClient for FaClient {
    fn origin(&self) -> &str {
        &self.origin
    }

    async fn upload(
        &self,
        file: &UploadFile,
        request: &UploadRequest,
    ) -> Result<String, ProtocolError> {
        request.validate()?;

        // step 1: keys from the upload form
        trace!("Extracting keys from upload form");
        let body = self.get_page("submission form", "/submit/").await?;
        let (max_file_size, key) = scrape::parse_submit_form(&body)?;

        if file.len() > max_file_size {
            return Err(ProtocolError::Validation(format!(
                "file size of {} is greater than FA limit of {}",
                file.len(),
                max_file_size
            )));
        }

        // step 2: the raw file
        debug!(file = %file.file_name, size = file.len(), "Uploading submission");
        let thumbnail = multipart::Part::bytes(Vec::new())
            .file_name("")
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new()
            .text("submission_type", request.submission_type.as_str())
            .part(
                "submission",
                multipart::Part::bytes(file.content.clone()).file_name(file.file_name.clone()),
            )
            .part("thumbnail", thumbnail)
            .text("MAX_FILE_SIZE", max_file_size.to_string())
            .text("key", key);

        let url = self.url("/submit/upload/");
        let started = Instant::now();
        let response = self.client.post(&url).multipart(form).send().await?;
        trace!(url = %url, status = response.status().as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "POST");

        if response.status() != StatusCode::FOUND {
            return Err(ProtocolError::UnexpectedStatus {
                step: "upload",
                status: response.status().as_u16(),
            });
        }
        let location = redirect_location("upload", &response)?;
        if !is_same_origin(&self.origin, &location) {
            return Err(ProtocolError::OffOriginRedirect {
                step: "upload",
                location,
            });
        }
        if location != FINALIZE_PATH {
            warn!(
                "unexpected redirect target {:?}, expected {:?}. continuing regardless ...",
                location, FINALIZE_PATH
            );
        }

        // step 3: metadata
        let body = self.get_page("finalize form", &location).await?;
        let key = scrape::parse_finalize_key(&body)?;

        debug!("Finalising submission");
        let form = finalize_form(key, request);
        let response = self.post_form(FINALIZE_PATH, &form).await?;
        let url = self.finish_form_flow("finalize", response).await?;
        info!("Uploaded! {}", url);
        Ok(url)
    }

    async fn update(&self, request: &UpdateRequest) -> Result<String, ProtocolError> {
        request.validate()?;

        let path = edit_path(&request.id);
        trace!("Extracting keys from submission {}", request.id);
        let body = self.get_page("edit page", &path).await?;
        let selections = scrape::parse_edit_selections(&body)?;

        debug!("Updating submission {}", request.id);
        let form = update_form(selections, request);
        let response = self.post_form(&path, &form).await?;
        let url = self.finish_form_flow("update", response).await?;
        info!("Updated! {}", url);
        Ok(url)
    }

    async fn submission_info(&self, id: &str) -> Result<SubmissionInfo, ProtocolError> {
        trace!("Retrieving submission information for {}", id);
        let body = self.get_page("edit page", &edit_path(id)).await?;
        scrape::parse_submission_info(&body)
    }

    async fn notifications(&self) -> Result<BTreeMap<String, u64>, ProtocolError> {
        let body = self.get_page("front page", "/").await?;
        scrape::parse_notifications(&body)
    }
}

fn edit_path(id: &str) -> String {
    format!("/controls/submissions/changeinfo/{}/", id)
}

/// Join a site-relative path onto the origin; absolute URLs pass through.
pub(crate) fn join_url(origin: &str, path: &str) -> String {
    if path.starts_with("https://") || path.starts_with("http://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Whether `location` stays on `origin`. Relative paths always do.
pub(crate) fn is_same_origin(origin: &str, location: &str) -> bool {
    if location.starts_with("//") {
        return false;
    }
    if !(location.starts_with("https://") || location.starts_with("http://")) {
        return true;
    }
    let origin = origin.trim_end_matches('/');
    location
        .strip_prefix(origin)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
}

fn redirect_location(step: &'static str, response: &Response) -> Result<String, ProtocolError> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ProtocolError::Redirect { step })
}

/// Flags the site reads as "on" when present; "off" is their absence.
fn push_flags(form: &mut Vec<(&'static str, String)>, lock_comments: bool, scrap: bool) {
    if lock_comments {
        form.push(("lock_comments", "1".to_string()));
    }
    if scrap {
        form.push(("scrap", "1".to_string()));
    }
}

/// Payload of the finalize step.
pub(crate) fn finalize_form(key: String, request: &UploadRequest) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("key", key),
        ("cat", DEFAULT_CATEGORY.to_string()),
        ("atype", DEFAULT_THEME.to_string()),
        ("species", DEFAULT_SPECIES.to_string()),
        ("gender", DEFAULT_GENDER.to_string()),
        ("rating", request.rating.code().to_string()),
        ("title", request.title.clone()),
        ("message", request.description.clone()),
        ("keywords", request.keywords.clone()),
        ("create_folder_name", request.create_folder_name.clone()),
        ("finalize", "Finalize ".to_string()),
    ];
    push_flags(&mut form, request.lock_comments, request.scrap);
    form
}

/// Payload of the edit form; selections this client cannot change are
/// echoed back as scraped.
pub(crate) fn update_form(
    selections: EditSelections,
    request: &UpdateRequest,
) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("update", "yes".to_string()),
        ("rating", request.rating.code().to_string()),
        ("title", request.title.clone()),
        ("message", request.description.clone()),
        ("keywords", request.keywords.clone()),
        ("key", selections.key),
        ("cat", selections.cat),
        ("atype", selections.atype),
        ("species", selections.species),
        ("gender", selections.gender),
    ];
    form.extend(
        selections
            .folder_ids
            .into_iter()
            .map(|id| ("folder_ids[]", id)),
    );
    form.push(("submit", "Update".to_string()));
    push_flags(&mut form, request.lock_comments, request.scrap);
    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Rating, SubmissionType};

    fn upload_request() -> UploadRequest {
        UploadRequest {
            title: "Foo".to_string(),
            description: "Bar".to_string(),
            keywords: "a b".to_string(),
            rating: Rating::Adult,
            submission_type: SubmissionType::Submission,
            lock_comments: false,
            scrap: false,
            create_folder_name: String::new(),
        }
    }

    fn value<'a>(form: &'a [(&str, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_finalize_form_defaults() {
        let form = finalize_form("k1".to_string(), &upload_request());
        assert_eq!(value(&form, "key"), Some("k1"));
        assert_eq!(value(&form, "cat"), Some("1"));
        assert_eq!(value(&form, "atype"), Some("1"));
        assert_eq!(value(&form, "species"), Some("1"));
        assert_eq!(value(&form, "gender"), Some("0"));
        assert_eq!(value(&form, "rating"), Some("1"));
        assert_eq!(value(&form, "message"), Some("Bar"));
        assert_eq!(value(&form, "finalize"), Some("Finalize "));
    }

    #[test]
    fn test_finalize_form_omits_false_flags() {
        let form = finalize_form("k".to_string(), &upload_request());
        assert_eq!(value(&form, "lock_comments"), None);
        assert_eq!(value(&form, "scrap"), None);
    }

    #[test]
    fn test_finalize_form_sends_true_flags() {
        let request = UploadRequest {
            lock_comments: true,
            scrap: true,
            ..upload_request()
        };
        let form = finalize_form("k".to_string(), &request);
        assert_eq!(value(&form, "lock_comments"), Some("1"));
        assert_eq!(value(&form, "scrap"), Some("1"));
    }

    #[test]
    fn test_update_form_echoes_selections() {
        let selections = EditSelections {
            key: "ek".to_string(),
            cat: "5".to_string(),
            atype: "7".to_string(),
            species: "9".to_string(),
            gender: "2".to_string(),
            folder_ids: vec!["11".to_string(), "13".to_string()],
        };
        let request = UpdateRequest {
            id: "42".to_string(),
            title: "T".to_string(),
            description: "D".to_string(),
            keywords: String::new(),
            rating: Rating::Mature,
            lock_comments: true,
            scrap: false,
        };
        let form = update_form(selections, &request);
        assert_eq!(value(&form, "update"), Some("yes"));
        assert_eq!(value(&form, "rating"), Some("2"));
        assert_eq!(value(&form, "cat"), Some("5"));
        assert_eq!(value(&form, "submit"), Some("Update"));
        let folders: Vec<_> = form
            .iter()
            .filter(|(k, _)| *k == "folder_ids[]")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(folders, vec!["11", "13"]);
        assert_eq!(value(&form, "lock_comments"), Some("1"));
        assert_eq!(value(&form, "scrap"), None);
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://www.furaffinity.net", "/view/1/"),
            "https://www.furaffinity.net/view/1/"
        );
        assert_eq!(
            join_url("https://www.furaffinity.net/", "view/1/"),
            "https://www.furaffinity.net/view/1/"
        );
        assert_eq!(
            join_url("https://www.furaffinity.net", "https://other.example/x"),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_is_same_origin() {
        let origin = "https://www.furaffinity.net";
        assert!(is_same_origin(origin, "/submit/finalize/"));
        assert!(is_same_origin(origin, "https://www.furaffinity.net/submit/finalize/"));
        assert!(!is_same_origin(origin, "https://other.example/submit/finalize/"));
        assert!(!is_same_origin(origin, "https://www.furaffinity.net.other.example/"));
        assert!(!is_same_origin(origin, "//other.example/submit/finalize/"));
    }

    #[test]
    fn test_new_rejects_empty_cookies() {
        let site = SiteConfig::default();
        assert!(matches!(
            FaClient::new("", "b", &site),
            Err(ProtocolError::InvalidCredentials(_))
        ));
        assert!(matches!(
            FaClient::new("a", " ", &site),
            Err(ProtocolError::InvalidCredentials(_))
        ));
        assert!(FaClient::new("a", "b", &site).is_ok());
    }

    #[test]
    fn test_submission_url() {
        let client = FaClient::new("a", "b", &SiteConfig::default()).unwrap();
        assert_eq!(
            client.submission_url("54328944"),
            "https://www.furaffinity.net/view/54328944/"
        );
    }
}
