//! Repository layer over the persistent key-value store.
//!
//! # Responsibility
//! - Own the board label list, the task collection and mood collections.
//! - Run board-level cascades (rename/delete) to completion inside one call.
//!
//! # Invariants
//! - Every mutation re-reads the latest full collection before writing it.
//! - Absent ids/titles surface as `None`/`false`, not as errors.
//! - `Task::status` is only ever derived from a resolved board.

use crate::model::board::BoardId;
use crate::model::ValidationError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod board_repo;
pub mod mood_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for store, validation and referential failures.
#[derive(Debug)]
pub enum RepoError {
    /// Backend transport failure.
    Store(StoreError),
    /// User input rejected before any write.
    Validation(ValidationError),
    /// A task references a board that does not exist.
    UnknownBoard(BoardId),
    /// Rename target collides with another existing board.
    DuplicateBoardTitle(String),
    /// Reorder input is not a permutation of the current boards.
    InvalidBoardOrder(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::UnknownBoard(id) => write!(f, "board not found: {id}"),
            Self::DuplicateBoardTitle(title) => write!(f, "board title already used: {title}"),
            Self::InvalidBoardOrder(message) => write!(f, "invalid board order: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::UnknownBoard(_) => None,
            Self::DuplicateBoardTitle(_) => None,
            Self::InvalidBoardOrder(_) => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
