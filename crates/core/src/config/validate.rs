use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Site origin is an http(s) URL
/// - Timeout is not 0
///
/// Cookies are checked when a client is built, so `auth` can run on an
/// empty config.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let base_url = &config.site.base_url;
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        return Err(ConfigError::ValidationError(format!(
            "site.base_url must be an http(s) URL, got {:?}",
            base_url
        )));
    }

    if config.site.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "site.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_bad_scheme_fails() {
        let config = Config {
            site: SiteConfig {
                base_url: "ftp://example.com".to_string(),
                timeout_secs: 30,
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let config = Config {
            site: SiteConfig {
                timeout_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
