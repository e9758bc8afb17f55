//! Board label repository.
//!
//! # Responsibility
//! - Own the ordered board title list stored under `statusLabels`.
//! - Run rename/delete cascades into the task collection.
//!
//! # Invariants
//! - Titles are unique; `create` is idempotent by title.
//! - A rename or delete is complete only after every dependent task has been
//!   rewritten or removed.
//! - Board order is the persisted label order.

use super::task_repo::TaskRepository;
use super::{RepoError, RepoResult};
use crate::config::DEFAULT_BOARD_TITLES;
use crate::model::board::{normalize_board_title, Board, BoardId};
use crate::store::{read_collection_opt, write_collection, PersistentStore, BOARD_LABELS_KEY};
use log::{info, warn};
use std::collections::HashSet;

/// Repository over the board label list.
pub struct BoardRepository<'s, S: PersistentStore + ?Sized> {
    store: &'s S,
    default_titles: Vec<String>,
}

impl<'s, S: PersistentStore + ?Sized> Clone for BoardRepository<'s, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            default_titles: self.default_titles.clone(),
        }
    }
}

impl<'s, S: PersistentStore + ?Sized> BoardRepository<'s, S> {
    /// Repository seeding the built-in default boards.
    pub fn new(store: &'s S) -> Self {
        Self::with_default_titles(
            store,
            DEFAULT_BOARD_TITLES.iter().map(|title| title.to_string()).collect(),
        )
    }

    /// Repository seeding `default_titles` when no label list is stored.
    pub fn with_default_titles(store: &'s S, default_titles: Vec<String>) -> Self {
        Self {
            store,
            default_titles,
        }
    }

    /// Lists boards in persisted order.
    ///
    /// A missing or corrupt label list is replaced by the defaults, which are
    /// persisted so later reads observe the same boards.
    pub fn list(&self) -> RepoResult<Vec<Board>> {
        Ok(self
            .load_titles()?
            .into_iter()
            .map(Board::from_title)
            .collect())
    }

    /// Returns the board whose identifier is `id`.
    pub fn get(&self, id: &BoardId) -> RepoResult<Option<Board>> {
        Ok(self
            .load_titles()?
            .into_iter()
            .find(|title| title == id.as_str())
            .map(Board::from_title))
    }

    /// Appends a board. Returns the existing board when the title is taken.
    pub fn create(&self, title: &str) -> RepoResult<Board> {
        let title = normalize_board_title(title)?;
        let mut titles = self.load_titles()?;
        if titles.iter().any(|existing| *existing == title) {
            return Ok(Board::from_title(title));
        }

        titles.push(title.clone());
        write_collection(self.store, BOARD_LABELS_KEY, &titles)?;
        info!(
            "event=board_create module=repo status=ok boards={}",
            titles.len()
        );
        Ok(Board::from_title(title))
    }

    /// Renames `old` to `new_title` and rewrites every task of the old board.
    ///
    /// Returns `None` when `old` does not exist. Renaming onto another
    /// existing board is rejected.
    pub fn rename(&self, old: &BoardId, new_title: &str) -> RepoResult<Option<Board>> {
        let new_title = normalize_board_title(new_title)?;
        let mut titles = self.load_titles()?;
        let Some(position) = titles.iter().position(|title| title == old.as_str()) else {
            return Ok(None);
        };
        if new_title == old.as_str() {
            return Ok(Some(Board::from_title(new_title)));
        }
        if titles.iter().any(|title| *title == new_title) {
            return Err(RepoError::DuplicateBoardTitle(new_title));
        }

        titles[position] = new_title.clone();
        write_collection(self.store, BOARD_LABELS_KEY, &titles)?;

        let renamed = Board::from_title(new_title);
        let moved = self.tasks().rename_status(old, renamed.id())?;
        info!("event=board_rename module=repo status=ok moved_tasks={moved}");
        Ok(Some(renamed))
    }

    /// Removes a board and every task it holds.
    ///
    /// Returns `false` when the board was not present.
    pub fn delete(&self, id: &BoardId) -> RepoResult<bool> {
        let mut titles = self.load_titles()?;
        let before = titles.len();
        titles.retain(|title| title != id.as_str());
        if titles.len() == before {
            return Ok(false);
        }

        write_collection(self.store, BOARD_LABELS_KEY, &titles)?;
        let removed = self.tasks().delete_status(id)?;
        info!("event=board_delete module=repo status=ok removed_tasks={removed}");
        Ok(true)
    }

    /// Replaces the stored board order wholesale.
    ///
    /// `ordered` must be a permutation of the current board ids.
    pub fn reorder(&self, ordered: &[BoardId]) -> RepoResult<()> {
        let titles = self.load_titles()?;
        if ordered.len() != titles.len() {
            return Err(RepoError::InvalidBoardOrder(format!(
                "expected {} boards, got {}",
                titles.len(),
                ordered.len()
            )));
        }

        let known: HashSet<&str> = titles.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        for id in ordered {
            if !known.contains(id.as_str()) {
                return Err(RepoError::UnknownBoard(id.clone()));
            }
            if !seen.insert(id.as_str()) {
                return Err(RepoError::InvalidBoardOrder(format!("duplicate board `{id}`")));
            }
        }

        let reordered: Vec<&str> = ordered.iter().map(BoardId::as_str).collect();
        write_collection(self.store, BOARD_LABELS_KEY, &reordered)?;
        Ok(())
    }

    /// Removes the stored label list. The next read seeds defaults again.
    pub fn clear(&self) -> RepoResult<bool> {
        Ok(self.store.remove(BOARD_LABELS_KEY)?)
    }

    fn tasks(&self) -> TaskRepository<'s, S> {
        TaskRepository::with_boards(self.store, self.clone())
    }

    fn load_titles(&self) -> RepoResult<Vec<String>> {
        let Some(stored) = read_collection_opt::<S, String>(self.store, BOARD_LABELS_KEY)? else {
            write_collection(self.store, BOARD_LABELS_KEY, &self.default_titles)?;
            info!(
                "event=board_seed module=repo status=ok boards={}",
                self.default_titles.len()
            );
            return Ok(self.default_titles.clone());
        };

        let stored_len = stored.len();
        let mut seen = HashSet::new();
        let mut titles = Vec::with_capacity(stored_len);
        for title in stored {
            if seen.insert(title.clone()) {
                titles.push(title);
            }
        }
        if titles.len() != stored_len {
            warn!(
                "event=board_read module=repo status=duplicate_labels dropped={}",
                stored_len - titles.len()
            );
        }
        Ok(titles)
    }
}
