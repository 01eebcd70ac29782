use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use faqueue_core::{default_config_path, load_or_default, validate_config, Config, Editor, FaClient};

/// Configuration shared by every command.
pub struct AppContext {
    config_path: PathBuf,
    config: Config,
}

impl AppContext {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(default_config_path);
        debug!("Loading configuration from {:?}", config_path);
        let config = load_or_default(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?;
        validate_config(&config).context("Configuration validation failed")?;
        Ok(Self {
            config_path,
            config,
        })
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Client authenticated with the stored cookies.
    pub fn client(&self) -> Result<Arc<FaClient>> {
        if !self.config.auth.is_configured() {
            anyhow::bail!(
                "No authentication info in {:?}, run `faqueue auth A_COOKIE B_COOKIE` first",
                self.config_path
            );
        }
        let client = self
            .config
            .new_client()
            .context("Failed to create FurAffinity client")?;
        Ok(Arc::new(client))
    }

    pub fn editor(&self) -> Editor {
        Editor::from_env(&self.config.editor)
    }
}
