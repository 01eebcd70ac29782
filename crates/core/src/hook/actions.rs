//! After-upload actions as written in a sidecar's `[[after_upload]]` tables.

use serde::{Deserialize, Serialize};

use crate::protocol::Rating;

/// One step of an after-upload hook.
///
/// `target` names another queued file by its queue name and defaults to the
/// file that was just uploaded.
///
/// ```toml
/// [[after_upload]]
/// action = "cross_link"
/// with = "previous_file.png"
/// text = "Alt version 2"
/// back_text = "Alt version 1"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HookAction {
    /// Append a paragraph to a description.
    AppendText {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        text: String,
    },
    /// Append a link as a new paragraph. Links to `url` when given, otherwise
    /// to the submission of `to` (default: the uploaded file).
    AppendLink {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        text: String,
    },
    /// Link `with` and the uploaded file to each other: `with` gets a link
    /// labelled `text`, the uploaded file one labelled `back_text`.
    CrossLink {
        with: String,
        text: String,
        back_text: String,
    },
    /// Overwrite metadata fields.
    Set {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        keywords: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rating: Option<Rating>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scrap: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lock_comments: Option<bool>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sidecar {
        after_upload: Vec<HookAction>,
    }

    #[test]
    fn test_deserialize_actions() {
        let toml = r#"
[[after_upload]]
action = "cross_link"
with = "a.png"
text = "Alt 2"
back_text = "Alt 1"

[[after_upload]]
action = "append_link"
url = "https://example.com/"
text = "Shop"

[[after_upload]]
action = "set"
target = "a.png"
rating = "mature"
"#;
        let sidecar: Sidecar = toml::from_str(toml).unwrap();
        assert_eq!(
            sidecar.after_upload[0],
            HookAction::CrossLink {
                with: "a.png".to_string(),
                text: "Alt 2".to_string(),
                back_text: "Alt 1".to_string(),
            }
        );
        assert_eq!(
            sidecar.after_upload[1],
            HookAction::AppendLink {
                target: None,
                to: None,
                url: Some("https://example.com/".to_string()),
                text: "Shop".to_string(),
            }
        );
        match &sidecar.after_upload[2] {
            HookAction::Set {
                target,
                rating,
                title,
                ..
            } => {
                assert_eq!(target.as_deref(), Some("a.png"));
                assert_eq!(*rating, Some(Rating::Mature));
                assert!(title.is_none());
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let toml = r#"
[[after_upload]]
action = "delete_everything"
"#;
        assert!(toml::from_str::<Sidecar>(toml).is_err());
    }
}
