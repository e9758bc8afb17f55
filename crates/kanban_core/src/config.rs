//! Runtime configuration for the kanban core.
//!
//! # Responsibility
//! - Describe seeded defaults (board titles, placeholder task) and the
//!   terminal board label.
//! - Load overrides from a JSON file; every field is optional.
//!
//! # Invariants
//! - A missing config file yields `KanbanConfig::default()`.
//! - A malformed config file is an error; it is never silently ignored.

use crate::model::task::{DEFAULT_PRIORITY, DEFAULT_TASK_TYPE};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Board titles seeded when no board list has been stored yet.
pub const DEFAULT_BOARD_TITLES: [&str; 3] = ["Todo", "In Progress", "Done"];
/// Terminal board label used by due-date classification and completion.
pub const DEFAULT_DONE_BOARD: &str = "Done";
/// Title of the task synthesized into empty boards.
pub const PLACEHOLDER_TITLE: &str = "New Task";

/// Shape of the task synthesized into a board that has no tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaceholderTask {
    pub title: String,
    pub task_type: String,
    pub priority: String,
}

impl Default for PlaceholderTask {
    fn default() -> Self {
        Self {
            title: PLACEHOLDER_TITLE.to_string(),
            task_type: DEFAULT_TASK_TYPE.to_string(),
            priority: DEFAULT_PRIORITY.to_string(),
        }
    }
}

/// Core configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KanbanConfig {
    pub default_boards: Vec<String>,
    pub done_board: String,
    pub seed_placeholders: bool,
    pub placeholder: PlaceholderTask,
    /// One of `trace|debug|info|warn|error`; `None` means build default.
    pub log_level: Option<String>,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            default_boards: DEFAULT_BOARD_TITLES.iter().map(|t| t.to_string()).collect(),
            done_board: DEFAULT_DONE_BOARD.to_string(),
            seed_placeholders: true,
            placeholder: PlaceholderTask::default(),
            log_level: None,
        }
    }
}

impl KanbanConfig {
    /// Reads a JSON config file, falling back to defaults when it is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Config loading failure.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, KanbanConfig};
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = KanbanConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, KanbanConfig::default());
        assert_eq!(config.default_boards, vec!["Todo", "In Progress", "Done"]);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kanban.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"doneBoard": "Shipped", "seedPlaceholders": false}}"#).unwrap();

        let config = KanbanConfig::load(&path).unwrap();
        assert_eq!(config.done_board, "Shipped");
        assert!(!config.seed_placeholders);
        assert_eq!(config.placeholder.title, "New Task");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kanban.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = KanbanConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
