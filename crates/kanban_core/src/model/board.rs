//! Board (column) model.
//!
//! # Invariants
//! - `Board::id()` and `Board::title()` always carry the same text.
//! - Titles are trimmed with internal whitespace runs collapsed.

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Typed board identifier. It is the board title, nothing more.
///
/// Renaming a board therefore replaces its identifier; dependants are
/// rewritten by the board repository cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(String);

impl BoardId {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BoardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for BoardId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BoardId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A named, ordered column of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    id: BoardId,
    title: String,
}

impl Board {
    /// Builds a board whose identifier is its title.
    pub fn from_title(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: BoardId::new(title.clone()),
            title,
        }
    }

    pub fn id(&self) -> &BoardId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Trims a user-supplied title and collapses inner whitespace.
pub fn normalize_board_title(raw: &str) -> Result<String, ValidationError> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        return Err(ValidationError::BlankBoardTitle);
    }
    Ok(collapsed.into_owned())
}
