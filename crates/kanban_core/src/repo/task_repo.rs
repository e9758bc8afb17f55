//! Task repository.
//!
//! # Responsibility
//! - Own the task collection stored under `tasks`.
//! - Keep `status` and `board_id` in lockstep on every write.
//! - Keep each touched status group contiguous after create/update/delete.
//!
//! # Invariants
//! - `status` is derived from a resolved board, never taken from a caller.
//! - Every write re-reads the whole collection first and replaces it whole.
//! - Unknown ids yield `None`/`false`; unknown boards are errors.

use super::board_repo::BoardRepository;
use super::{RepoError, RepoResult};
use crate::engine::normalize::{compact_group, next_order, place_in_group, sorted_group};
use crate::engine::reorder::TaskWrite;
use crate::model::board::BoardId;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::store::{read_collection, write_collection, PersistentStore, TASKS_KEY};
use chrono::Utc;
use log::{debug, info, warn};

/// Optional narrowing applied by `list_filtered`.
///
/// Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub task_type: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        fn field_matches(expected: &Option<String>, actual: &str) -> bool {
            expected.as_deref().map_or(true, |expected| expected == actual)
        }

        field_matches(&self.status, &task.status)
            && field_matches(&self.priority, &task.priority)
            && field_matches(&self.task_type, &task.task_type)
    }
}

/// Repository over the task collection.
pub struct TaskRepository<'s, S: PersistentStore + ?Sized> {
    store: &'s S,
    boards: BoardRepository<'s, S>,
}

impl<'s, S: PersistentStore + ?Sized> TaskRepository<'s, S> {
    /// Repository resolving boards against the built-in defaults.
    pub fn new(store: &'s S) -> Self {
        Self::with_boards(store, BoardRepository::new(store))
    }

    /// Repository resolving boards through `boards`.
    pub fn with_boards(store: &'s S, boards: BoardRepository<'s, S>) -> Self {
        Self { store, boards }
    }

    /// Reads every task in storage order.
    pub fn list(&self) -> RepoResult<Vec<Task>> {
        Ok(read_collection(self.store, TASKS_KEY)?)
    }

    /// Reads the tasks matching `filter`, in storage order.
    pub fn list_filtered(&self, filter: &TaskFilter) -> RepoResult<Vec<Task>> {
        let mut tasks = self.list()?;
        tasks.retain(|task| filter.matches(task));
        Ok(tasks)
    }

    /// Reads one status group sorted by order.
    pub fn list_by_status(&self, status: &str) -> RepoResult<Vec<Task>> {
        let tasks = self.list()?;
        Ok(sorted_group(&tasks, status).into_iter().cloned().collect())
    }

    pub fn get(&self, id: &TaskId) -> RepoResult<Option<Task>> {
        Ok(self.list()?.into_iter().find(|task| task.id == *id))
    }

    /// Creates a task in `new.board_id`.
    ///
    /// Without an order the task is appended to that group. With one it is
    /// inserted at that position (clamped to the group length) and its
    /// siblings shift down to keep the group contiguous.
    pub fn create(&self, new: NewTask) -> RepoResult<Task> {
        let board = self
            .boards
            .get(&new.board_id)?
            .ok_or_else(|| RepoError::UnknownBoard(new.board_id.clone()))?;

        let mut tasks = self.list()?;
        let requested = new.order;
        let order = requested.unwrap_or_else(|| next_order(&tasks, board.title()));
        let task = Task {
            id: TaskId::generate(),
            title: new.title,
            status: board.title().to_string(),
            board_id: board.id().clone(),
            priority: new.priority,
            task_type: new.task_type,
            order: Some(order),
            start_date: new.start_date,
            due_date: new.due_date,
            created_date: Some(new.created_date.unwrap_or_else(Utc::now)),
            actual_done_date: None,
            requirements: new.requirements,
            mood: new.mood,
        };

        tasks.push(task);
        let index = tasks.len() - 1;
        if let Some(position) = requested {
            place_in_group(&mut tasks, index, position);
        }
        let created = tasks[index].clone();
        self.save(&tasks)?;
        info!(
            "event=task_create module=repo status=ok order={} group_size={}",
            created.order_key(),
            tasks.iter().filter(|t| t.in_status(&created.status)).count()
        );
        Ok(created)
    }

    /// Merges `patch` into the task `id`.
    ///
    /// A patch carrying `board_id` resolves that board and sets `status` from
    /// its title. Moving to another board without an explicit order appends
    /// the task there; the group it left is compacted either way. An explicit
    /// order places the task at that position in its (new) group and
    /// renumbers the group.
    pub fn update(&self, id: &TaskId, patch: &TaskPatch) -> RepoResult<Option<Task>> {
        let mut tasks = self.list()?;
        let Some(index) = tasks.iter().position(|task| task.id == *id) else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(tasks.swap_remove(index)));
        }

        let destination = match &patch.board_id {
            Some(board_id) => Some(
                self.boards
                    .get(board_id)?
                    .ok_or_else(|| RepoError::UnknownBoard(board_id.clone()))?,
            ),
            None => None,
        };

        let previous_status = tasks[index].status.clone();
        tasks[index].merge_fields(patch);

        if let Some(board) = destination {
            tasks[index].status = board.title().to_string();
            tasks[index].board_id = board.id().clone();

            if board.title() != previous_status {
                if patch.order.is_none() {
                    tasks[index].order = None;
                    let order = next_order(&tasks, board.title());
                    tasks[index].order = Some(order);
                }
                compact_group(&mut tasks, &previous_status);
                debug!("event=task_move module=repo status=ok via=update");
            }
        }

        if let Some(position) = patch.order {
            place_in_group(&mut tasks, index, position);
        }

        let updated = tasks[index].clone();
        self.save(&tasks)?;
        Ok(Some(updated))
    }

    /// Removes the task `id` and compacts its group. Returns `false` when
    /// the id is unknown.
    pub fn delete(&self, id: &TaskId) -> RepoResult<bool> {
        let mut tasks = self.list()?;
        let Some(index) = tasks.iter().position(|task| task.id == *id) else {
            return Ok(false);
        };

        let removed = tasks.remove(index);
        compact_group(&mut tasks, &removed.status);
        self.save(&tasks)?;
        info!("event=task_delete module=repo status=ok");
        Ok(true)
    }

    /// Applies planned order/board writes against a fresh read.
    ///
    /// Writes for ids that vanished since planning are skipped. A write
    /// naming a board that does not exist rejects the whole batch before
    /// anything is stored. Returns the number of tasks written.
    pub fn apply_writes(&self, writes: &[TaskWrite]) -> RepoResult<usize> {
        if writes.is_empty() {
            return Ok(0);
        }

        let boards = self.boards.list()?;
        if let Some(unknown) = writes
            .iter()
            .filter_map(|write| write.board.as_ref())
            .find(|board| !boards.iter().any(|known| known.id() == *board))
        {
            warn!("event=task_write module=repo status=rejected reason=unknown_board");
            return Err(RepoError::UnknownBoard(unknown.clone()));
        }

        let mut tasks = self.list()?;
        let mut applied = 0;
        for write in writes {
            let Some(task) = tasks.iter_mut().find(|task| task.id == write.id) else {
                warn!("event=task_write module=repo status=skipped reason=missing_task");
                continue;
            };
            task.order = Some(write.order);
            if let Some(board) = &write.board {
                task.status = board.as_str().to_string();
                task.board_id = board.clone();
            }
            applied += 1;
        }

        if applied > 0 {
            self.save(&tasks)?;
        }
        Ok(applied)
    }

    /// Replaces the whole collection, e.g. after a normalization pass.
    pub fn replace_all(&self, tasks: &[Task]) -> RepoResult<()> {
        self.save(tasks)
    }

    /// Removes the stored collection.
    pub fn clear(&self) -> RepoResult<bool> {
        Ok(self.store.remove(TASKS_KEY)?)
    }

    /// Rewrites every task of board `old` onto board `new`.
    ///
    /// Membership is decided by `status`; a stale `board_id` naming `old` on
    /// a task of another board does not pull it along.
    pub(crate) fn rename_status(&self, old: &BoardId, new: &BoardId) -> RepoResult<usize> {
        let mut tasks = self.list()?;
        let mut moved = 0;
        for task in tasks.iter_mut().filter(|task| task.in_status(old.as_str())) {
            task.status = new.as_str().to_string();
            task.board_id = new.clone();
            moved += 1;
        }

        if moved > 0 {
            self.save(&tasks)?;
        }
        Ok(moved)
    }

    /// Removes every task of board `id`.
    pub(crate) fn delete_status(&self, id: &BoardId) -> RepoResult<usize> {
        let mut tasks = self.list()?;
        let before = tasks.len();
        tasks.retain(|task| task.status != id.as_str());
        let removed = before - tasks.len();

        if removed > 0 {
            self.save(&tasks)?;
        }
        Ok(removed)
    }

    fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        write_collection(self.store, TASKS_KEY, tasks)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskFilter, TaskRepository};
    use crate::engine::reorder::TaskWrite;
    use crate::model::board::BoardId;
    use crate::model::task::{NewTask, TaskPatch};
    use crate::repo::RepoError;
    use crate::store::MemoryStore;

    #[test]
    fn create_appends_to_the_target_group() {
        let store = MemoryStore::new();
        let repo = TaskRepository::new(&store);

        let first = repo.create(NewTask::new("a", BoardId::new("Todo"))).unwrap();
        let second = repo.create(NewTask::new("b", BoardId::new("Todo"))).unwrap();
        let other = repo.create(NewTask::new("c", BoardId::new("Done"))).unwrap();

        assert_eq!(first.order, Some(0));
        assert_eq!(second.order, Some(1));
        assert_eq!(other.order, Some(0));
        assert!(first.created_date.is_some());
        assert_eq!(second.status, "Todo");
        assert_eq!(second.board_id.as_str(), "Todo");
    }

    #[test]
    fn create_rejects_unknown_board() {
        let store = MemoryStore::new();
        let repo = TaskRepository::new(&store);
        let err = repo
            .create(NewTask::new("a", BoardId::new("Someday")))
            .unwrap_err();
        assert!(matches!(err, RepoError::UnknownBoard(id) if id.as_str() == "Someday"));
    }

    #[test]
    fn missing_ids_are_not_errors() {
        let store = MemoryStore::new();
        let repo = TaskRepository::new(&store);
        let ghost = crate::model::task::TaskId::new("ghost");

        assert!(repo.get(&ghost).unwrap().is_none());
        assert!(repo
            .update(&ghost, &TaskPatch::default())
            .unwrap()
            .is_none());
        assert!(!repo.delete(&ghost).unwrap());
    }

    #[test]
    fn update_with_board_keeps_status_in_lockstep() {
        let store = MemoryStore::new();
        let repo = TaskRepository::new(&store);
        let a = repo.create(NewTask::new("a", BoardId::new("Todo"))).unwrap();
        let b = repo.create(NewTask::new("b", BoardId::new("Todo"))).unwrap();
        repo.create(NewTask::new("x", BoardId::new("Done"))).unwrap();

        let patch = TaskPatch {
            board_id: Some(BoardId::new("Done")),
            ..TaskPatch::default()
        };
        let moved = repo.update(&a.id, &patch).unwrap().unwrap();

        assert_eq!(moved.status, "Done");
        assert_eq!(moved.board_id.as_str(), "Done");
        assert_eq!(moved.order, Some(1));
        assert_eq!(repo.get(&b.id).unwrap().unwrap().order, Some(0));
    }

    #[test]
    fn update_rejects_unknown_board_without_writing() {
        let store = MemoryStore::new();
        let repo = TaskRepository::new(&store);
        let a = repo.create(NewTask::new("a", BoardId::new("Todo"))).unwrap();
        let before = store.snapshot("tasks");

        let patch = TaskPatch {
            title: Some("renamed".to_string()),
            board_id: Some(BoardId::new("Nowhere")),
            ..TaskPatch::default()
        };
        assert!(repo.update(&a.id, &patch).is_err());
        assert_eq!(store.snapshot("tasks"), before);
    }

    #[test]
    fn delete_compacts_the_group() {
        let store = MemoryStore::new();
        let repo = TaskRepository::new(&store);
        let a = repo.create(NewTask::new("a", BoardId::new("Todo"))).unwrap();
        let b = repo.create(NewTask::new("b", BoardId::new("Todo"))).unwrap();
        let c = repo.create(NewTask::new("c", BoardId::new("Todo"))).unwrap();

        assert!(repo.delete(&a.id).unwrap());

        assert_eq!(repo.get(&b.id).unwrap().unwrap().order, Some(0));
        assert_eq!(repo.get(&c.id).unwrap().unwrap().order, Some(1));
    }

    #[test]
    fn explicit_order_on_create_shifts_the_group() {
        let store = MemoryStore::new();
        let repo = TaskRepository::new(&store);
        let a = repo.create(NewTask::new("a", BoardId::new("Todo"))).unwrap();
        let b = repo.create(NewTask::new("b", BoardId::new("Todo"))).unwrap();

        let mut first = NewTask::new("first", BoardId::new("Todo"));
        first.order = Some(0);
        let first = repo.create(first).unwrap();
        let mut far = NewTask::new("far", BoardId::new("Todo"));
        far.order = Some(99);
        let far = repo.create(far).unwrap();

        assert_eq!(first.order, Some(0));
        assert_eq!(repo.get(&a.id).unwrap().unwrap().order, Some(1));
        assert_eq!(repo.get(&b.id).unwrap().unwrap().order, Some(2));
        assert_eq!(far.order, Some(3));
    }

    #[test]
    fn explicit_order_on_update_renumbers_the_group() {
        let store = MemoryStore::new();
        let repo = TaskRepository::new(&store);
        let a = repo.create(NewTask::new("a", BoardId::new("Todo"))).unwrap();
        let b = repo.create(NewTask::new("b", BoardId::new("Todo"))).unwrap();
        let c = repo.create(NewTask::new("c", BoardId::new("Todo"))).unwrap();

        let patch = TaskPatch {
            order: Some(0),
            ..TaskPatch::default()
        };
        let moved = repo.update(&c.id, &patch).unwrap().unwrap();

        assert_eq!(moved.order, Some(0));
        assert_eq!(repo.get(&a.id).unwrap().unwrap().order, Some(1));
        assert_eq!(repo.get(&b.id).unwrap().unwrap().order, Some(2));
    }

    #[test]
    fn writes_naming_unknown_boards_are_rejected_whole() {
        let store = MemoryStore::new();
        let repo = TaskRepository::new(&store);
        let a = repo.create(NewTask::new("a", BoardId::new("Todo"))).unwrap();
        let before = store.snapshot("tasks");

        let writes = [TaskWrite {
            id: a.id.clone(),
            order: 0,
            board: Some(BoardId::new("Ghost")),
        }];
        let err = repo.apply_writes(&writes).unwrap_err();

        assert!(matches!(err, RepoError::UnknownBoard(id) if id.as_str() == "Ghost"));
        assert_eq!(store.snapshot("tasks"), before);
    }

    #[test]
    fn filter_narrows_by_every_given_field() {
        let store = MemoryStore::new();
        let repo = TaskRepository::new(&store);
        let mut urgent = NewTask::new("a", BoardId::new("Todo"));
        urgent.priority = "High".to_string();
        repo.create(urgent).unwrap();
        repo.create(NewTask::new("b", BoardId::new("Todo"))).unwrap();
        repo.create(NewTask::new("c", BoardId::new("Done"))).unwrap();

        let filter = TaskFilter {
            status: Some("Todo".to_string()),
            priority: Some("High".to_string()),
            ..TaskFilter::default()
        };
        let found = repo.list_filtered(&filter).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "a");
        assert_eq!(repo.list_filtered(&TaskFilter::default()).unwrap().len(), 3);
    }
}
