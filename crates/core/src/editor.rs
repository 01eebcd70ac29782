//! Opens files in the operator's text editor.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::EditorConfig;

/// Environment variables consulted for an editor, in order.
pub const EDITOR_ENV_VARS: [&str; 3] = ["FA_EDITOR", "VISUAL", "EDITOR"];

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(
        "No suitable editor found to edit {path}, set one of FA_EDITOR, VISUAL, or EDITOR in your ENV"
    )]
    NotConfigured { path: PathBuf },

    #[error("Could not parse editor command {command}: {reason}")]
    InvalidCommand { command: String, reason: String },

    #[error("Could not run {command} {path}")]
    Failed {
        command: String,
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },
}

/// An external editor command, e.g. `vim` or `code --wait`.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    command: Option<String>,
}

impl Editor {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }

    /// Editor that never launches anything.
    pub fn disabled() -> Self {
        Self { command: None }
    }

    /// Resolve from the environment, falling back to the config file.
    pub fn from_env(config: &EditorConfig) -> Self {
        let from_env = EDITOR_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));
        Self::new(from_env.or_else(|| config.command.clone()))
    }

    pub fn is_configured(&self) -> bool {
        self.command.is_some()
    }

    /// Open `path` and wait for the editor to exit.
    ///
    /// Without an editor this only warns, unless `fatal` is set. A failing
    /// editor is logged; it is an error only when `fatal` is set.
    pub fn open(&self, path: &Path, fatal: bool) -> Result<(), EditorError> {
        let Some(command) = &self.command else {
            warn!(
                "could not open editor for {:?}, set one of FA_EDITOR, VISUAL, or EDITOR in your ENV",
                path
            );
            if fatal {
                return Err(EditorError::NotConfigured {
                    path: path.to_path_buf(),
                });
            }
            return Ok(());
        };

        let parts = match shell_words::split(command) {
            Ok(parts) => parts,
            Err(e) => {
                error!("could not parse editor command {:?}: {}", command, e);
                if fatal {
                    return Err(EditorError::InvalidCommand {
                        command: command.clone(),
                        reason: e.to_string(),
                    });
                }
                return Ok(());
            }
        };
        let Some((program, args)) = parts.split_first() else {
            return Ok(());
        };

        debug!("Running {} {:?}", command, path);
        let result = Command::new(program).args(args).arg(path).status();

        let failure = match result {
            Ok(status) if status.success() => return Ok(()),
            Ok(status) => {
                error!(
                    "could not run {} {:?}, exit code: {:?}",
                    command,
                    path,
                    status.code()
                );
                None
            }
            Err(e) => {
                error!("could not run {} {:?}: {}", command, path, e);
                Some(e)
            }
        };

        if fatal {
            return Err(EditorError::Failed {
                command: command.clone(),
                path: path.to_path_buf(),
                source: failure,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_editor_is_not_fatal_by_default() {
        let editor = Editor::disabled();
        assert!(!editor.is_configured());
        assert!(editor.open(Path::new("x.toml"), false).is_ok());
    }

    #[test]
    fn test_disabled_editor_fatal() {
        let err = Editor::disabled()
            .open(Path::new("x.toml"), true)
            .unwrap_err();
        assert!(matches!(err, EditorError::NotConfigured { .. }));
    }

    #[test]
    fn test_blank_command_counts_as_unconfigured() {
        assert!(!Editor::new(Some("   ".to_string())).is_configured());
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_editor() {
        let editor = Editor::new(Some("true".to_string()));
        assert!(editor.open(Path::new("whatever"), true).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_editor_only_fatal_when_asked() {
        let editor = Editor::new(Some("false".to_string()));
        assert!(editor.open(Path::new("whatever"), false).is_ok());
        assert!(matches!(
            editor.open(Path::new("whatever"), true).unwrap_err(),
            EditorError::Failed { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_quoted_editor_arguments_stay_whole() {
        // sh runs the script with the file as $0
        let editor = Editor::new(Some("sh -c 'test -n \"$0\"'".to_string()));
        assert!(editor.open(Path::new("whatever"), true).is_ok());
    }

    #[test]
    fn test_unbalanced_quotes_are_rejected() {
        let editor = Editor::new(Some("vim 'unterminated".to_string()));
        assert!(editor.open(Path::new("x.toml"), false).is_ok());
        assert!(matches!(
            editor.open(Path::new("x.toml"), true).unwrap_err(),
            EditorError::InvalidCommand { .. }
        ));
    }
}
