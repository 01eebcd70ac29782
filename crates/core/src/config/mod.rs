mod loader;
mod types;
mod validate;

pub use loader::{default_config_path, load_config, load_config_from_str, load_or_default, save_auth};
pub use types::*;
pub use validate::validate_config;

use thiserror::Error;

use crate::protocol::{FaClient, ProtocolError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Failed to write configuration to {path}: {reason}")]
    WriteError { path: String, reason: String },
}

impl Config {
    /// Build a protocol client from the stored session cookies.
    pub fn new_client(&self) -> Result<FaClient, ProtocolError> {
        FaClient::new(&self.auth.a, &self.auth.b, &self.site)
    }
}
