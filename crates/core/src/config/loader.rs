use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::{types::Config, ConfigError};

/// Default config location: `~/.faqueue.toml`.
pub fn default_config_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".faqueue.toml")
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    trace!("Loading configuration from {:?}", path);
    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("FAQUEUE_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration, falling back to defaults (plus env overrides) when the
/// file does not exist yet.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    debug!("No configuration at {:?}, using defaults", path);
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("FAQUEUE_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Store the session cookies, keeping every other setting in the file.
pub fn save_auth(path: &Path, a: &str, b: &str) -> Result<Config, ConfigError> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::WriteError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        load_config_from_str(&content)?
    } else {
        Config::default()
    };

    config.auth.a = a.to_string();
    config.auth.b = b.to_string();

    let content = toml::to_string_pretty(&config).map_err(|e| ConfigError::WriteError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    debug!("Saved configuration to {:?}", path);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[auth]
a = "x"
b = "y"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.auth.a, "x");
        assert_eq!(config.auth.b, "y");
    }

    #[test]
    fn test_load_config_from_str_wrong_type() {
        let toml = r#"
[site]
timeout_secs = "soon"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/faqueue.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[site]
base_url = "http://127.0.0.1:3000"
timeout_secs = 10
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.site.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.site.timeout_secs, 10);
    }

    #[test]
    fn test_save_auth_keeps_other_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faqueue.toml");
        std::fs::write(&path, "[editor]\ncommand = \"nano\"\n").unwrap();

        save_auth(&path, "cookie-a", "cookie-b").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let config = load_config_from_str(&content).unwrap();
        assert_eq!(config.auth.a, "cookie-a");
        assert_eq!(config.auth.b, "cookie-b");
        assert_eq!(config.editor.command.as_deref(), Some("nano"));
    }

    #[test]
    fn test_save_auth_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.toml");

        let config = save_auth(&path, "a1", "b1").unwrap();
        assert!(path.exists());
        assert!(config.auth.is_configured());
    }
}
