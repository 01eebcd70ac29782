//! Error types for the submission protocol.

use thiserror::Error;

/// Errors that can occur while talking to the site.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A caller-supplied value is outside its allowed domain.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Session cookies are missing.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// An expected element or attribute is missing from a page, which means
    /// the site's markup no longer matches.
    #[error("Could not find {field} on {page}, the page layout may have changed")]
    Scrape { page: String, field: String },

    /// The site answered with a status the flow does not expect.
    #[error("{step}: unexpected response status {status}")]
    UnexpectedStatus { step: &'static str, status: u16 },

    /// A redirect response without a usable `Location` header.
    #[error("{step}: redirect without a Location header")]
    Redirect { step: &'static str },

    /// A redirect pointing away from the site, which must not see the
    /// session cookies.
    #[error("{step}: refusing to follow redirect to {location}")]
    OffOriginRedirect { step: &'static str, location: String },

    /// The site reported a failure in its own words.
    #[error("FA returned: {message}")]
    Remote { status: u16, message: String },

    /// Transport level failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ProtocolError {
    pub(crate) fn scrape(page: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Scrape {
            page: page.into(),
            field: field.into(),
        }
    }

    /// The site's own message, when it reported one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Remote { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the caller passed something the site would never accept.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
