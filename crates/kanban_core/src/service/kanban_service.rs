//! Kanban use-case service.
//!
//! # Responsibility
//! - Run the startup pass: seed boards, normalize orders, synthesize
//!   placeholder tasks for empty boards.
//! - Apply finished drag gestures through the reorder planner.
//! - Expose board/task/requirement use cases and read-only views.
//!
//! # Invariants
//! - Every use case reads the latest stored collections; the service keeps no
//!   cached task or board state.
//! - Placeholders are synthesized only by `load` and `create_board`, never
//!   by rename or delete cascades.

use crate::config::KanbanConfig;
use crate::engine::normalize::{normalize, sorted_group, NormalizeReport};
use crate::engine::reorder::{plan_move, MoveIntent, ReorderPlan};
use crate::model::board::{normalize_board_title, Board, BoardId};
use crate::model::task::{NewTask, Requirement, Task, TaskId, TaskPatch};
use crate::model::ValidationError;
use crate::repo::board_repo::BoardRepository;
use crate::repo::mood_repo::MoodRepository;
use crate::repo::task_repo::{TaskFilter, TaskRepository};
use crate::repo::RepoError;
use crate::report::analytics::{
    completion_timeliness, count_by_priority, count_by_status, due_vs_actual, DurationRow,
    LabelCount, Timeliness,
};
use crate::report::due_date::notifications;
use crate::report::mood::{mood_series, MoodSeries};
use crate::store::PersistentStore;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from kanban service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Repository-level failure.
    Repo(RepoError),
    /// The configured terminal board does not exist.
    DoneBoardMissing(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::DoneBoardMissing(title) => write!(f, "done board not found: {title}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::DoneBoardMissing(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Repo(RepoError::Validation(value))
    }
}

/// Outcome of the startup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub boards: usize,
    pub normalize: NormalizeReport,
    /// Boards that received a placeholder task.
    pub placeholders: Vec<BoardId>,
}

/// One rendered column: a board and its tasks sorted by order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumn {
    pub board: Board,
    pub tasks: Vec<Task>,
}

/// Aggregates behind the analytics view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub by_status: Vec<LabelCount>,
    pub by_priority: Vec<LabelCount>,
    pub timeliness: Timeliness,
    pub durations: Vec<DurationRow>,
}

/// Kanban service facade over one store handle.
pub struct KanbanService<'s, S: PersistentStore + ?Sized> {
    store: &'s S,
    config: KanbanConfig,
}

impl<'s, S: PersistentStore + ?Sized> KanbanService<'s, S> {
    pub fn new(store: &'s S, config: KanbanConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &KanbanConfig {
        &self.config
    }

    pub fn boards(&self) -> BoardRepository<'s, S> {
        BoardRepository::with_default_titles(self.store, self.config.default_boards.clone())
    }

    pub fn tasks(&self) -> TaskRepository<'s, S> {
        TaskRepository::with_boards(self.store, self.boards())
    }

    pub fn moods(&self) -> MoodRepository<'s, S> {
        MoodRepository::new(self.store)
    }

    /// Startup pass. Call once before any ordering-dependent read.
    pub fn load(&self) -> ServiceResult<LoadReport> {
        let boards = self.boards().list()?;
        let normalize = self.normalize()?;

        let mut placeholders = Vec::new();
        if self.config.seed_placeholders {
            let tasks = self.tasks().list()?;
            for board in &boards {
                if !tasks.iter().any(|task| task.in_status(board.title())) {
                    self.create_placeholder(board.id())?;
                    placeholders.push(board.id().clone());
                }
            }
        }

        info!(
            "event=kanban_load module=service status=ok boards={} repaired_groups={} relinked={} placeholders={}",
            boards.len(),
            normalize.repaired_groups.len(),
            normalize.relinked_tasks,
            placeholders.len()
        );
        Ok(LoadReport {
            boards: boards.len(),
            normalize,
            placeholders,
        })
    }

    /// Repairs task orders and board links. Writes only when something
    /// changed, so a second run leaves the store untouched.
    pub fn normalize(&self) -> ServiceResult<NormalizeReport> {
        let tasks = self.tasks();
        let mut all = tasks.list()?;
        let report = normalize(&mut all);
        if !report.is_clean() {
            tasks.replace_all(&all)?;
        }
        Ok(report)
    }

    /// Columns in board order. The filter narrows tasks, never boards.
    pub fn board_view(&self, filter: &TaskFilter) -> ServiceResult<Vec<BoardColumn>> {
        let boards = self.boards().list()?;
        let tasks = self.tasks().list()?;
        Ok(boards
            .into_iter()
            .map(|board| {
                let column_tasks = sorted_group(&tasks, board.title())
                    .into_iter()
                    .filter(|task| filter.matches(task))
                    .cloned()
                    .collect();
                BoardColumn {
                    board,
                    tasks: column_tasks,
                }
            })
            .collect())
    }

    /// Plans `intent` against freshly read boards and tasks and applies it.
    pub fn apply_move(&self, intent: &MoveIntent) -> ServiceResult<ReorderPlan> {
        let boards = self.boards().list()?;
        let tasks = self.tasks().list()?;
        let plan = plan_move(&boards, &tasks, intent);

        match &plan {
            ReorderPlan::NoOp(reason) => {
                debug!("event=move_apply module=service status=noop reason={reason:?}");
            }
            ReorderPlan::Boards(order) => {
                self.boards().reorder(order)?;
                info!("event=move_apply module=service status=ok kind=boards");
            }
            ReorderPlan::Tasks(writes) => {
                let applied = self.tasks().apply_writes(writes)?;
                info!("event=move_apply module=service status=ok kind=tasks writes={applied}");
            }
        }
        Ok(plan)
    }

    /// Creates a board; a new board gets a placeholder task when seeding is
    /// enabled.
    pub fn create_board(&self, title: &str) -> ServiceResult<Board> {
        let title = normalize_board_title(title)?;
        let boards = self.boards();
        let existed = boards.get(&BoardId::new(title.clone()))?.is_some();
        let board = boards.create(&title)?;
        if !existed && self.config.seed_placeholders {
            self.create_placeholder(board.id())?;
        }
        Ok(board)
    }

    pub fn rename_board(&self, id: &BoardId, new_title: &str) -> ServiceResult<Option<Board>> {
        Ok(self.boards().rename(id, new_title)?)
    }

    pub fn delete_board(&self, id: &BoardId) -> ServiceResult<bool> {
        Ok(self.boards().delete(id)?)
    }

    pub fn create_task(&self, new: NewTask) -> ServiceResult<Task> {
        Ok(self.tasks().create(new)?)
    }

    pub fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> ServiceResult<Option<Task>> {
        Ok(self.tasks().update(id, patch)?)
    }

    pub fn delete_task(&self, id: &TaskId) -> ServiceResult<bool> {
        Ok(self.tasks().delete(id)?)
    }

    /// Moves a task to the done board and stamps its completion time.
    pub fn complete_task(&self, id: &TaskId, now: DateTime<Utc>) -> ServiceResult<Option<Task>> {
        let done = BoardId::new(self.config.done_board.clone());
        if self.boards().get(&done)?.is_none() {
            return Err(ServiceError::DoneBoardMissing(self.config.done_board.clone()));
        }

        let patch = TaskPatch {
            board_id: Some(done),
            actual_done_date: Some(Some(now)),
            ..TaskPatch::default()
        };
        Ok(self.tasks().update(id, &patch)?)
    }

    /// Appends a requirement line to a task.
    pub fn add_requirement(&self, id: &TaskId, text: &str) -> ServiceResult<Option<Task>> {
        let requirement = Requirement::new(text)?;
        let tasks = self.tasks();
        let Some(task) = tasks.get(id)? else {
            return Ok(None);
        };

        let mut requirements = task.requirements;
        requirements.push(requirement);
        let patch = TaskPatch {
            requirements: Some(requirements),
            ..TaskPatch::default()
        };
        Ok(tasks.update(id, &patch)?)
    }

    /// Flips one requirement's `done` flag. Returns `None` when the task or
    /// the requirement does not exist.
    pub fn toggle_requirement(
        &self,
        id: &TaskId,
        requirement_id: &str,
    ) -> ServiceResult<Option<Task>> {
        let tasks = self.tasks();
        let Some(task) = tasks.get(id)? else {
            return Ok(None);
        };

        let mut requirements = task.requirements;
        let Some(requirement) = requirements.iter_mut().find(|req| req.id == requirement_id) else {
            return Ok(None);
        };
        requirement.done = !requirement.done;

        let patch = TaskPatch {
            requirements: Some(requirements),
            ..TaskPatch::default()
        };
        Ok(tasks.update(id, &patch)?)
    }

    /// Tasks that currently warrant a due-date notification.
    pub fn notifications(&self, now: DateTime<Utc>) -> ServiceResult<Vec<Task>> {
        let tasks = self.tasks().list()?;
        Ok(notifications(&tasks, now, &self.config.done_board)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn analytics(&self, now: DateTime<Utc>) -> ServiceResult<AnalyticsSummary> {
        let tasks = self.tasks().list()?;
        Ok(AnalyticsSummary {
            by_status: count_by_status(&tasks),
            by_priority: count_by_priority(&tasks),
            timeliness: completion_timeliness(&tasks, &self.config.done_board),
            durations: due_vs_actual(&tasks, now),
        })
    }

    /// Recorded mood selections grouped per label for a day/hour plot.
    pub fn mood_series(&self) -> ServiceResult<Vec<MoodSeries>> {
        let history = self.moods().mood_history()?;
        Ok(mood_series(&history))
    }

    fn create_placeholder(&self, board: &BoardId) -> ServiceResult<Task> {
        let placeholder = &self.config.placeholder;
        let mut new = NewTask::new(placeholder.title.clone(), board.clone());
        new.priority = placeholder.priority.clone();
        new.task_type = placeholder.task_type.clone();
        Ok(self.tasks().create(new)?)
    }
}
