//! Kanban domain model.
//!
//! # Responsibility
//! - Define boards, tasks, and mood records exactly as they are persisted.
//! - Provide typed identifiers and explicit patch/request shapes.
//!
//! # Invariants
//! - A board's identity is its title (`BoardId` carries the title).
//! - A task's `status` mirrors the title of the board it belongs to.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod board;
pub mod mood;
pub mod task;
pub mod timestamp;

/// Input validation failures for model constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Board title is blank after trim.
    BlankBoardTitle,
    /// Requirement text is blank after trim.
    BlankRequirementText,
    /// Mood label is blank after trim.
    BlankMoodLabel,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankBoardTitle => write!(f, "board title must not be blank"),
            Self::BlankRequirementText => write!(f, "requirement text must not be blank"),
            Self::BlankMoodLabel => write!(f, "mood label must not be blank"),
        }
    }
}

impl Error for ValidationError {}
