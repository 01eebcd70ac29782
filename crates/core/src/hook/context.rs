//! What a hook can see and do.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::protocol::{Rating, SubmissionClient, UpdateRequest};
use crate::queue::SubmissionMetadata;

use super::actions::HookAction;
use super::error::HookError;

/// Metadata of a queued file as seen from a hook.
///
/// Creation-only fields (folder name, submission type) and the hook itself
/// are left out; `id` is filled in once the file is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookItem {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub rating: Rating,
    pub scrap: bool,
    pub lock_comments: bool,
    pub id: Option<String>,
}

impl From<&SubmissionMetadata> for HookItem {
    fn from(metadata: &SubmissionMetadata) -> Self {
        Self {
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            keywords: metadata.keywords.clone(),
            rating: metadata.rating,
            scrap: metadata.scrap,
            lock_comments: metadata.lock_comments,
            id: metadata.id.clone(),
        }
    }
}

impl HookItem {
    /// Update request carrying this item's current metadata.
    pub fn update_request(&self) -> Option<UpdateRequest> {
        Some(UpdateRequest {
            id: self.id.clone()?,
            title: self.title.clone(),
            description: self.description.clone(),
            keywords: self.keywords.clone(),
            rating: self.rating,
            lock_comments: self.lock_comments,
            scrap: self.scrap,
        })
    }

    fn append_paragraph(&mut self, text: &str) {
        self.description.push_str("\n\n");
        self.description.push_str(text);
    }
}

/// What a link points at.
#[derive(Debug, Clone, Copy)]
pub enum LinkTarget<'a> {
    /// The submission of a queued file.
    File(&'a str),
    /// A literal URL.
    Url(&'a str),
}

/// Context a hook runs against: the client, the file that was just
/// uploaded, and every other queued file by name.
pub struct HookContext<'a> {
    client: &'a dyn SubmissionClient,
    current: String,
    items: &'a mut BTreeMap<String, HookItem>,
    modified: Vec<String>,
}

impl<'a> HookContext<'a> {
    pub fn new(
        client: &'a dyn SubmissionClient,
        current: &str,
        items: &'a mut BTreeMap<String, HookItem>,
    ) -> Result<Self, HookError> {
        if !items.contains_key(current) {
            return Err(HookError::UnknownItem(current.to_string()));
        }
        Ok(Self {
            client,
            current: current.to_string(),
            items,
            modified: Vec::new(),
        })
    }

    pub fn client(&self) -> &dyn SubmissionClient {
        self.client
    }

    /// Queue name of the file that was just uploaded.
    pub fn current_name(&self) -> &str {
        &self.current
    }

    pub fn current(&self) -> Result<&HookItem, HookError> {
        let name = self.current.clone();
        self.item(&name)
    }

    pub fn current_mut(&mut self) -> Result<&mut HookItem, HookError> {
        let name = self.current.clone();
        self.item_mut(&name)
    }

    /// Look up another file by its queue name.
    pub fn item(&self, name: &str) -> Result<&HookItem, HookError> {
        self.items
            .get(name)
            .ok_or_else(|| HookError::UnknownItem(name.to_string()))
    }

    /// Mutable lookup; the item is pushed to the site when the hook ends.
    pub fn item_mut(&mut self, name: &str) -> Result<&mut HookItem, HookError> {
        let item = self
            .items
            .get_mut(name)
            .ok_or_else(|| HookError::UnknownItem(name.to_string()))?;
        if !self.modified.iter().any(|m| m == name) {
            self.modified.push(name.to_string());
        }
        Ok(item)
    }

    /// Files modified so far, in order of first modification.
    pub fn modified(&self) -> &[String] {
        &self.modified
    }

    pub fn submission_url(&self, id: &str) -> String {
        self.client.submission_url(id)
    }

    /// BBCode link as the site renders it in descriptions.
    pub fn link_to(&self, target: LinkTarget<'_>, text: &str) -> Result<String, HookError> {
        let url = match target {
            LinkTarget::Url(url) => url.to_string(),
            LinkTarget::File(name) => match &self.item(name)?.id {
                Some(id) => self.submission_url(id),
                None => {
                    warn!(
                        "{:?} does not have an ID, probably not uploaded yet? linking its name instead",
                        name
                    );
                    name.to_string()
                }
            },
        };
        Ok(format!("[url={}]{}[/url]", url, text))
    }

    fn target_name(&self, target: &Option<String>) -> String {
        target.clone().unwrap_or_else(|| self.current.clone())
    }

    /// Apply one action to the in-memory items.
    pub fn apply(&mut self, action: &HookAction) -> Result<(), HookError> {
        match action {
            HookAction::AppendText { target, text } => {
                let name = self.target_name(target);
                self.item_mut(&name)?.append_paragraph(text);
            }
            HookAction::AppendLink {
                target,
                to,
                url,
                text,
            } => {
                let name = self.target_name(target);
                let link = match (url, to) {
                    (Some(url), _) => self.link_to(LinkTarget::Url(url), text)?,
                    (None, to) => {
                        let to = self.target_name(to);
                        self.link_to(LinkTarget::File(&to), text)?
                    }
                };
                self.item_mut(&name)?.append_paragraph(&link);
            }
            HookAction::CrossLink {
                with,
                text,
                back_text,
            } => {
                let current = self.current.clone();
                let forward = self.link_to(LinkTarget::File(&current), text)?;
                let backward = self.link_to(LinkTarget::File(with), back_text)?;
                self.item_mut(with)?.append_paragraph(&forward);
                self.item_mut(&current)?.append_paragraph(&backward);
            }
            HookAction::Set {
                target,
                title,
                description,
                keywords,
                rating,
                scrap,
                lock_comments,
            } => {
                let name = self.target_name(target);
                let item = self.item_mut(&name)?;
                if let Some(title) = title {
                    item.title = title.clone();
                }
                if let Some(description) = description {
                    item.description = description.clone();
                }
                if let Some(keywords) = keywords {
                    item.keywords = keywords.clone();
                }
                if let Some(rating) = rating {
                    item.rating = *rating;
                }
                if let Some(scrap) = scrap {
                    item.scrap = *scrap;
                }
                if let Some(lock_comments) = lock_comments {
                    item.lock_comments = *lock_comments;
                }
            }
        }
        Ok(())
    }

    /// Push every modified item to the site. Returns the updated URLs.
    pub async fn flush(&mut self) -> Result<Vec<String>, HookError> {
        let mut urls = Vec::with_capacity(self.modified.len());
        for name in std::mem::take(&mut self.modified) {
            let request = self
                .item(&name)?
                .update_request()
                .ok_or_else(|| HookError::NotUploaded(name.clone()))?;
            debug!("Updating {:?} from hook", name);
            let url = self
                .client
                .update(&request)
                .await
                .map_err(|source| HookError::Update {
                    file: name.clone(),
                    source,
                })?;
            urls.push(url);
        }
        Ok(urls)
    }
}
