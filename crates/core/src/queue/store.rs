//! On-disk queue state: backlog order, upload status, and sidecars.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::editor::Editor;

use super::error::QueueError;
use super::template::{self, SUBMISSION_TEMPLATE};
use super::types::{SubmissionMetadata, UploadStatus};

/// Control directory inside a queue directory.
pub const CONTROL_DIR: &str = ".faqueue";
pub const QUEUE_FILE: &str = "queue.toml";
pub const STATUS_FILE: &str = "status.toml";
pub const TEMPLATES_DIR: &str = "templates";
pub const TEMPLATE_FILE: &str = "submission.toml";
/// Suffix appended to a queued file's name to get its sidecar.
pub const SIDECAR_SUFFIX: &str = ".info.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct QueueFile {
    #[serde(default)]
    queue: Vec<String>,
}

/// A queue directory.
///
/// File identifiers are paths relative to the queue directory. Every
/// operation except [`QueueStore::init`] needs a prior [`QueueStore::reload`].
#[derive(Debug)]
pub struct QueueStore {
    root: PathBuf,
    editor: Editor,
    loaded: bool,
    queue: Vec<String>,
    statuses: BTreeMap<String, UploadStatus>,
    metadata: BTreeMap<String, SubmissionMetadata>,
}

impl QueueStore {
    pub fn new(root: impl Into<PathBuf>, editor: Editor) -> Self {
        Self {
            root: root.into(),
            editor,
            loaded: false,
            queue: Vec::new(),
            statuses: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn control_path(&self, name: &str) -> PathBuf {
        self.root.join(CONTROL_DIR).join(name)
    }

    pub fn queue_file_path(&self) -> PathBuf {
        self.control_path(QUEUE_FILE)
    }

    pub fn status_file_path(&self) -> PathBuf {
        self.control_path(STATUS_FILE)
    }

    pub fn template_path(&self) -> PathBuf {
        self.control_path(TEMPLATES_DIR).join(TEMPLATE_FILE)
    }

    /// Absolute path of a queued file.
    pub fn file_path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    pub fn sidecar_path(&self, file: &str) -> PathBuf {
        self.root.join(format!("{}{}", file, SIDECAR_SUFFIX))
    }

    /// Files in upload order.
    pub fn queue(&self) -> &[String] {
        &self.queue
    }

    pub fn statuses(&self) -> &BTreeMap<String, UploadStatus> {
        &self.statuses
    }

    /// Parsed sidecars keyed by file identifier.
    pub fn metadata(&self) -> &BTreeMap<String, SubmissionMetadata> {
        &self.metadata
    }

    /// Create an empty queue in the store's directory.
    pub fn init(&mut self) -> Result<PathBuf, QueueError> {
        if self.root.exists() {
            trace!("Checking if directory {:?} is empty", self.root);
            let mut entries =
                fs::read_dir(&self.root).map_err(|e| QueueError::io(&self.root, e))?;
            if entries.next().is_some() {
                return Err(QueueError::AlreadyInUse {
                    path: self.root.clone(),
                });
            }
        }

        let templates = self.control_path(TEMPLATES_DIR);
        trace!("Creating directory {:?}", templates);
        fs::create_dir_all(&templates).map_err(|e| QueueError::io(&templates, e))?;

        self.queue.clear();
        self.statuses.clear();
        self.metadata.clear();
        self.write_state()?;

        let template_path = self.template_path();
        trace!("Creating submission template");
        fs::write(&template_path, SUBMISSION_TEMPLATE)
            .map_err(|e| QueueError::io(&template_path, e))?;

        self.loaded = true;
        debug!("Created new queue dir in {:?}", self.root);
        Ok(self.root.clone())
    }

    /// Load queue, status, and every sidecar below the queue directory.
    pub fn reload(&mut self) -> Result<(), QueueError> {
        trace!("Loading state info");
        let control = self.root.join(CONTROL_DIR);
        if !control.is_dir() {
            return Err(QueueError::StoreState(format!(
                "{} is not a queue directory, run `queue init` first",
                self.root.display()
            )));
        }

        let queue_file: QueueFile = read_toml(&self.queue_file_path())?;
        let mut seen = HashSet::new();
        let mut queue = Vec::with_capacity(queue_file.queue.len());
        for file in queue_file.queue {
            if seen.insert(file.clone()) {
                queue.push(file);
            } else {
                warn!("Dropping duplicate queue entry {:?}", file);
            }
        }

        let statuses: BTreeMap<String, UploadStatus> = read_toml(&self.status_file_path())?;
        let metadata = self.scan_sidecars()?;

        trace!(
            "Loaded {} queued files, {} statuses, {} sidecars",
            queue.len(),
            statuses.len(),
            metadata.len()
        );
        self.queue = queue;
        self.statuses = statuses;
        self.metadata = metadata;
        self.loaded = true;
        Ok(())
    }

    fn scan_sidecars(&self) -> Result<BTreeMap<String, SubmissionMetadata>, QueueError> {
        let mut metadata = BTreeMap::new();
        let walker = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| entry.depth() != 1 || entry.file_name() != CONTROL_DIR);

        for entry in walker {
            let entry = entry.map_err(|e| QueueError::Metadata {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone()),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file) = self.file_for_sidecar(entry.path()) else {
                continue;
            };
            let info: SubmissionMetadata = read_toml(entry.path())?;
            metadata.insert(file, info);
        }
        Ok(metadata)
    }

    /// File identifier a sidecar path belongs to, if it is one.
    fn file_for_sidecar(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?
            .join("/");
        let file = name.strip_suffix(SIDECAR_SUFFIX)?;
        (!file.is_empty()).then(|| file.to_string())
    }

    /// Identifier of a file named on the command line: its `/`-separated
    /// path relative to the queue directory. `None` when it lies outside.
    fn file_key(&self, file: &str) -> Option<String> {
        let path = self.root.join(file);
        let relative = match lexical(&path).strip_prefix(lexical(&self.root)) {
            Ok(relative) => relative.to_path_buf(),
            // the root may be reached through a symlink
            Err(_) => {
                let root = fs::canonicalize(&self.root).ok()?;
                let path = fs::canonicalize(&path).ok()?;
                path.strip_prefix(root).ok()?.to_path_buf()
            }
        };
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?
            .join("/");
        (!key.is_empty()).then_some(key)
    }

    pub(crate) fn ensure_loaded(&self) -> Result<(), QueueError> {
        if self.loaded {
            Ok(())
        } else {
            Err(QueueError::StoreState(
                "queue state has not been loaded".to_string(),
            ))
        }
    }

    /// Enqueue `files`, creating a sidecar for each from the template.
    /// Returns the files that were added.
    pub fn add(&mut self, files: &[String]) -> Result<Vec<String>, QueueError> {
        self.ensure_loaded()?;
        let mut added = Vec::new();
        for file in files {
            let Some(file) = self.file_key(file) else {
                warn!("File {:?} is outside the queue directory {:?}", file, self.root);
                continue;
            };
            if !self.file_path(&file).is_file() {
                warn!("File {:?} does not exist", file);
                continue;
            }
            if self.queue.contains(&file) {
                warn!("File {:?} is already in the queue", file);
                continue;
            }

            let sidecar = self.create_sidecar(&file)?;
            self.editor.open(&sidecar, false)?;

            self.queue.push(file.clone());
            self.statuses.insert(file.clone(), UploadStatus::pending());
            self.write_state()?;
            debug!("Added {:?} to the queue", file);
            added.push(file);
        }
        Ok(added)
    }

    fn create_sidecar(&self, file: &str) -> Result<PathBuf, QueueError> {
        let path = self.sidecar_path(file);
        if path.exists() {
            return Ok(path);
        }
        let template_path = self.template_path();
        let template = match fs::read_to_string(&template_path) {
            Ok(template) => template,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Template {:?} is missing, using the default", template_path);
                SUBMISSION_TEMPLATE.to_string()
            }
            Err(e) => return Err(QueueError::io(&template_path, e)),
        };
        fs::write(&path, template::render(&template, file)).map_err(|e| QueueError::io(&path, e))?;
        Ok(path)
    }

    /// Drop `files` from the queue. Sidecars stay on disk.
    pub fn remove(&mut self, files: &[String]) -> Result<Vec<String>, QueueError> {
        self.ensure_loaded()?;
        let mut removed = Vec::new();
        for file in files {
            let Some(file) = self.file_key(file) else {
                warn!("File {:?} is outside the queue directory {:?}", file, self.root);
                continue;
            };
            let Some(pos) = self.queue.iter().position(|f| *f == file) else {
                warn!("File {:?} is not in the queue", file);
                continue;
            };
            self.queue.remove(pos);
            self.statuses.remove(&file);
            self.write_state()?;
            removed.push(file);
        }
        Ok(removed)
    }

    /// Delete every uploaded file and its sidecar.
    pub fn clean(&mut self) -> Result<Vec<String>, QueueError> {
        self.ensure_loaded()?;
        let uploaded: Vec<String> = self.uploaded_files().into_keys().collect();
        for file in &uploaded {
            trace!("Deleting {} ...", file);
            self.queue.retain(|f| f != file);
            self.statuses.remove(file);
            self.metadata.remove(file);
            remove_if_exists(&self.file_path(file))?;
            remove_if_exists(&self.sidecar_path(file))?;
            self.write_state()?;
        }
        Ok(uploaded)
    }

    /// Let the operator rearrange the queue file, then pick up the result.
    pub fn reorder(&mut self) -> Result<(), QueueError> {
        self.ensure_loaded()?;
        self.editor.open(&self.queue_file_path(), true)?;
        self.reload()
    }

    /// Files recorded as uploaded, whether or not they are still queued.
    pub fn uploaded_files(&self) -> BTreeMap<String, UploadStatus> {
        self.statuses
            .iter()
            .filter(|(_, status)| status.is_uploaded())
            .map(|(file, status)| (file.clone(), status.clone()))
            .collect()
    }

    /// Mark `file` as uploaded to `url` and take it off the queue.
    pub fn record_upload(&mut self, file: &str, url: &str) -> Result<(), QueueError> {
        self.ensure_loaded()?;
        self.queue.retain(|f| f != file);
        self.statuses
            .insert(file.to_string(), UploadStatus::uploaded(url.to_string()));
        if let Some(info) = self.metadata.get_mut(file) {
            info.id = crate::hook::submission_id_from_url(url);
        }
        self.write_state()
    }

    /// Drop `file` from queue and status without uploading it.
    pub fn discard(&mut self, file: &str) -> Result<(), QueueError> {
        self.ensure_loaded()?;
        self.queue.retain(|f| f != file);
        self.statuses.remove(file);
        self.write_state()
    }

    fn write_state(&self) -> Result<(), QueueError> {
        let queue = QueueFile {
            queue: self.queue.clone(),
        };
        write_toml(&self.queue_file_path(), "queue", &queue)?;
        write_toml(&self.status_file_path(), "status", &self.statuses)
    }
}

/// Resolve `.` and `..` without touching the filesystem.
fn lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, QueueError> {
    let content = fs::read_to_string(path).map_err(|e| QueueError::io(path, e))?;
    toml::from_str(&content).map_err(|e| QueueError::Metadata {
        path: path.to_path_buf(),
        reason: e.message().to_string(),
    })
}

fn write_toml<T: Serialize>(path: &Path, what: &'static str, value: &T) -> Result<(), QueueError> {
    trace!("Writing {:?}", path);
    let content = toml::to_string_pretty(value).map_err(|e| QueueError::Serialize {
        what,
        reason: e.to_string(),
    })?;
    fs::write(path, content).map_err(|e| QueueError::io(path, e))
}

fn remove_if_exists(path: &Path) -> Result<(), QueueError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("{:?} is already gone", path);
            Ok(())
        }
        Err(e) => Err(QueueError::io(path, e)),
    }
}
