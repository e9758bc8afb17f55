//! Core ordering and reconciliation logic for the kanban board.
//! This crate is the single source of truth for board/task invariants.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;
pub mod store;

pub use config::{ConfigError, KanbanConfig};
pub use engine::{DropSide, MoveIntent, NoOpReason, ReorderPlan};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{Board, BoardId};
pub use model::task::{NewTask, Requirement, Task, TaskId, TaskPatch};
pub use repo::task_repo::TaskFilter;
pub use repo::{RepoError, RepoResult};
pub use report::{DueClass, MoodPoint, MoodSeries};
pub use service::kanban_service::{
    BoardColumn, KanbanService, LoadReport, ServiceError, ServiceResult,
};
pub use store::{MemoryStore, PersistentStore, SqliteStore, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
