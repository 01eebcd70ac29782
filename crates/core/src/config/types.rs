use serde::{Deserialize, Serialize};
use std::fmt;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

/// Session cookies of a logged-in browser session.
#[derive(Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AuthConfig {
    /// Value of the `a` cookie.
    #[serde(default)]
    pub a: String,
    /// Value of the `b` cookie.
    #[serde(default)]
    pub b: String,
}

impl AuthConfig {
    /// Whether both cookies are set.
    pub fn is_configured(&self) -> bool {
        !self.a.is_empty() && !self.b.is_empty()
    }
}

// Cookies grant full account access, keep them out of logs.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("a_configured", &!self.a.is_empty())
            .field("b_configured", &!self.b.is_empty())
            .finish()
    }
}

/// Remote site configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SiteConfig {
    /// Site origin, e.g. "https://www.furaffinity.net"
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 60)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

pub const DEFAULT_BASE_URL: &str = "https://www.furaffinity.net";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u32 {
    60
}

/// External editor configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct EditorConfig {
    /// Editor command line. Environment variables take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[auth]
a = "cookie-a"
b = "cookie-b"

[site]
base_url = "http://localhost:3000"
timeout_secs = 5

[editor]
command = "vim -n"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.auth.a, "cookie-a");
        assert_eq!(config.auth.b, "cookie-b");
        assert_eq!(config.site.base_url, "http://localhost:3000");
        assert_eq!(config.site.timeout_secs, 5);
        assert_eq!(config.editor.command.as_deref(), Some("vim -n"));
    }

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.auth.is_configured());
        assert_eq!(config.site.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.site.timeout_secs, 60);
        assert!(config.editor.command.is_none());
    }

    #[test]
    fn test_auth_debug_hides_cookies() {
        let auth = AuthConfig {
            a: "secret-a".to_string(),
            b: "secret-b".to_string(),
        };
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("a_configured: true"));
    }
}
