pub mod config;
pub mod editor;
pub mod hook;
pub mod protocol;
pub mod queue;
pub mod testing;

pub use config::{
    default_config_path, load_config, load_config_from_str, load_or_default, save_auth,
    validate_config, AuthConfig, Config, ConfigError, EditorConfig, SiteConfig,
};
pub use editor::{Editor, EditorError};
pub use hook::{HookAction, HookError, HookRunner};
pub use protocol::{
    FaClient, ProtocolError, Rating, SubmissionClient, SubmissionInfo, SubmissionType,
    UpdateRequest, UploadFile, UploadRequest,
};
pub use queue::{
    QueueError, QueueStore, RunSummary, SubmissionMetadata, UploadRunner, UploadStatus,
};
