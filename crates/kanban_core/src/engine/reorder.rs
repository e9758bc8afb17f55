//! Move/reorder planning.
//!
//! # Responsibility
//! - Turn a finished drag gesture into the minimal set of writes.
//! - Stay pure: planning reads a snapshot and never touches the store.
//!
//! # Invariants
//! - Two board ids plan a board-list reorder; no task is written.
//! - A same-board move renumbers the whole group to `0..n-1`.
//! - A cross-board move appends to the destination and compacts the source.
//! - A cross-board move only lands on a board present in the snapshot.
//! - Unresolvable or unchanged moves plan zero writes.

use super::normalize::sorted_group;
use crate::model::board::{Board, BoardId};
use crate::model::task::{Task, TaskId};

/// Where the moved item lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropSide {
    Before,
    After,
    /// Take the target's slot: after it when moving forward, before it when
    /// moving backward.
    #[default]
    Auto,
}

/// A completed drag gesture: `source` was dropped on `target`.
///
/// Both ids are raw drag identifiers; they name either two boards or two
/// tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub source: String,
    pub target: String,
    pub side: DropSide,
}

impl MoveIntent {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            side: DropSide::Auto,
        }
    }

    pub fn with_side(mut self, side: DropSide) -> Self {
        self.side = side;
        self
    }

    /// Builds an intent from a drag-end event.
    ///
    /// A gesture released outside any target, or back onto itself, yields no
    /// intent at all.
    pub fn from_drag(active: &str, over: Option<&str>) -> Option<Self> {
        let over = over?;
        if over == active {
            return None;
        }
        Some(Self::new(active, over))
    }
}

/// One task write produced by a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskWrite {
    pub id: TaskId,
    pub order: u32,
    /// Destination board for a cross-board move; `None` keeps the board.
    pub board: Option<BoardId>,
}

/// Why a plan carries no writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    SameSourceAndTarget,
    SourceNotFound,
    TargetNotFound,
    Unchanged,
}

/// Result of planning one move intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderPlan {
    NoOp(NoOpReason),
    /// Complete new board order.
    Boards(Vec<BoardId>),
    /// Task writes; only tasks whose order or board changes are listed.
    Tasks(Vec<TaskWrite>),
}

impl ReorderPlan {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp(_))
    }
}

/// Plans `intent` against a fresh snapshot of boards and tasks.
pub fn plan_move(boards: &[Board], tasks: &[Task], intent: &MoveIntent) -> ReorderPlan {
    if intent.source == intent.target {
        return ReorderPlan::NoOp(NoOpReason::SameSourceAndTarget);
    }

    let board_ids: Vec<&BoardId> = boards.iter().map(Board::id).collect();
    let source_board = board_ids.iter().position(|id| id.as_str() == intent.source);
    let target_board = board_ids.iter().position(|id| id.as_str() == intent.target);
    if let (Some(from), Some(to)) = (source_board, target_board) {
        return plan_board_move(&board_ids, from, to, intent.side);
    }

    let Some(source) = tasks.iter().find(|task| task.id.as_str() == intent.source) else {
        return ReorderPlan::NoOp(NoOpReason::SourceNotFound);
    };
    let Some(target) = tasks.iter().find(|task| task.id.as_str() == intent.target) else {
        return ReorderPlan::NoOp(NoOpReason::TargetNotFound);
    };

    if source.status == target.status {
        plan_same_group(tasks, source, target, intent.side)
    } else {
        let Some(destination) = board_ids.iter().find(|id| id.as_str() == target.status) else {
            return ReorderPlan::NoOp(NoOpReason::TargetNotFound);
        };
        plan_cross_group(tasks, source, destination)
    }
}

fn plan_board_move(ids: &[&BoardId], from: usize, to: usize, side: DropSide) -> ReorderPlan {
    let mut reordered: Vec<BoardId> = ids.iter().map(|id| (*id).clone()).collect();
    let moved = reordered.remove(from);
    let slot = insertion_slot(from, to, side);
    reordered.insert(slot, moved);

    let unchanged = reordered
        .iter()
        .zip(ids.iter())
        .all(|(next, current)| next == *current);
    if unchanged {
        return ReorderPlan::NoOp(NoOpReason::Unchanged);
    }
    ReorderPlan::Boards(reordered)
}

fn plan_same_group(tasks: &[Task], source: &Task, target: &Task, side: DropSide) -> ReorderPlan {
    let mut group = sorted_group(tasks, &source.status);
    let Some(from) = group.iter().position(|task| task.id == source.id) else {
        return ReorderPlan::NoOp(NoOpReason::SourceNotFound);
    };
    let Some(to) = group.iter().position(|task| task.id == target.id) else {
        return ReorderPlan::NoOp(NoOpReason::TargetNotFound);
    };

    let moved = group.remove(from);
    group.insert(insertion_slot(from, to, side), moved);

    let writes: Vec<TaskWrite> = group
        .iter()
        .enumerate()
        .filter(|(position, task)| task.order != Some(*position as u32))
        .map(|(position, task)| TaskWrite {
            id: task.id.clone(),
            order: position as u32,
            board: None,
        })
        .collect();

    if writes.is_empty() {
        return ReorderPlan::NoOp(NoOpReason::Unchanged);
    }
    ReorderPlan::Tasks(writes)
}

fn plan_cross_group(tasks: &[Task], source: &Task, destination: &BoardId) -> ReorderPlan {
    let destination_len = tasks
        .iter()
        .filter(|task| task.in_status(destination.as_str()))
        .count();
    let mut writes = vec![TaskWrite {
        id: source.id.clone(),
        order: destination_len as u32,
        board: Some(destination.clone()),
    }];

    let remaining = sorted_group(tasks, &source.status)
        .into_iter()
        .filter(|task| task.id != source.id);
    for (position, task) in remaining.enumerate() {
        if task.order != Some(position as u32) {
            writes.push(TaskWrite {
                id: task.id.clone(),
                order: position as u32,
                board: None,
            });
        }
    }

    ReorderPlan::Tasks(writes)
}

/// Index to insert at after the moved item has been removed from `from`.
fn insertion_slot(from: usize, to: usize, side: DropSide) -> usize {
    // `to` is an index into the list before removal.
    let target_after_removal = if from < to { to - 1 } else { to };
    match side {
        DropSide::Before => target_after_removal,
        DropSide::After => target_after_removal + 1,
        DropSide::Auto => to,
    }
}

#[cfg(test)]
mod tests {
    use super::{plan_move, DropSide, MoveIntent, NoOpReason, ReorderPlan, TaskWrite};
    use crate::model::board::{Board, BoardId};
    use crate::model::task::{Task, TaskId};

    fn boards() -> Vec<Board> {
        ["Todo", "Doing", "Done"]
            .into_iter()
            .map(Board::from_title)
            .collect()
    }

    fn task(id: &str, status: &str, order: u32) -> Task {
        Task {
            id: TaskId::new(id),
            title: id.to_string(),
            status: status.to_string(),
            board_id: BoardId::new(status),
            priority: "Medium".to_string(),
            task_type: "Study".to_string(),
            order: Some(order),
            start_date: None,
            due_date: None,
            created_date: None,
            actual_done_date: None,
            requirements: Vec::new(),
            mood: None,
        }
    }

    fn write(id: &str, order: u32, board: Option<&str>) -> TaskWrite {
        TaskWrite {
            id: TaskId::new(id),
            order,
            board: board.map(BoardId::new),
        }
    }

    #[test]
    fn drop_before_first_swaps_two_tasks() {
        let tasks = vec![task("a", "Todo", 0), task("b", "Todo", 1)];
        let intent = MoveIntent::new("b", "a").with_side(DropSide::Before);

        let plan = plan_move(&boards(), &tasks, &intent);

        assert_eq!(
            plan,
            ReorderPlan::Tasks(vec![write("b", 0, None), write("a", 1, None)])
        );
    }

    #[test]
    fn auto_side_takes_the_target_slot() {
        let tasks = vec![
            task("a", "Todo", 0),
            task("b", "Todo", 1),
            task("c", "Todo", 2),
        ];

        let down = plan_move(&boards(), &tasks, &MoveIntent::new("a", "c"));
        assert_eq!(
            down,
            ReorderPlan::Tasks(vec![
                write("b", 0, None),
                write("c", 1, None),
                write("a", 2, None),
            ])
        );

        let up = plan_move(&boards(), &tasks, &MoveIntent::new("c", "a"));
        assert_eq!(
            up,
            ReorderPlan::Tasks(vec![
                write("c", 0, None),
                write("a", 1, None),
                write("b", 2, None),
            ])
        );
    }

    #[test]
    fn drop_into_current_slot_is_unchanged() {
        let tasks = vec![task("a", "Todo", 0), task("b", "Todo", 1)];
        let intent = MoveIntent::new("a", "b").with_side(DropSide::Before);

        let plan = plan_move(&boards(), &tasks, &intent);

        assert_eq!(plan, ReorderPlan::NoOp(NoOpReason::Unchanged));
    }

    #[test]
    fn unresolvable_ids_are_no_ops() {
        let tasks = vec![task("a", "Todo", 0)];
        assert_eq!(
            plan_move(&boards(), &tasks, &MoveIntent::new("a", "a")),
            ReorderPlan::NoOp(NoOpReason::SameSourceAndTarget)
        );
        assert_eq!(
            plan_move(&boards(), &tasks, &MoveIntent::new("ghost", "a")),
            ReorderPlan::NoOp(NoOpReason::SourceNotFound)
        );
        assert_eq!(
            plan_move(&boards(), &tasks, &MoveIntent::new("a", "ghost")),
            ReorderPlan::NoOp(NoOpReason::TargetNotFound)
        );
        assert_eq!(
            plan_move(&boards(), &tasks, &MoveIntent::new("a", "Doing")),
            ReorderPlan::NoOp(NoOpReason::TargetNotFound)
        );
    }

    #[test]
    fn cross_board_move_appends_and_compacts_source() {
        let tasks = vec![
            task("t0", "Todo", 0),
            task("t1", "Todo", 1),
            task("t", "Todo", 2),
            task("t3", "Todo", 3),
            task("d0", "Doing", 0),
            task("d1", "Doing", 1),
            task("d2", "Doing", 2),
        ];

        let plan = plan_move(&boards(), &tasks, &MoveIntent::new("t", "d0"));

        assert_eq!(
            plan,
            ReorderPlan::Tasks(vec![write("t", 3, Some("Doing")), write("t3", 2, None)])
        );
    }

    #[test]
    fn target_on_a_missing_board_is_a_no_op() {
        let tasks = vec![task("a", "Todo", 0), task("stray", "Archive", 0)];

        let plan = plan_move(&boards(), &tasks, &MoveIntent::new("a", "stray"));

        assert_eq!(plan, ReorderPlan::NoOp(NoOpReason::TargetNotFound));
    }

    #[test]
    fn two_board_ids_reorder_boards() {
        let plan = plan_move(&boards(), &[], &MoveIntent::new("Done", "Todo"));
        assert_eq!(
            plan,
            ReorderPlan::Boards(vec![
                BoardId::new("Done"),
                BoardId::new("Todo"),
                BoardId::new("Doing"),
            ])
        );

        let after = MoveIntent::new("Todo", "Doing").with_side(DropSide::After);
        assert_eq!(
            plan_move(&boards(), &[], &after),
            ReorderPlan::Boards(vec![
                BoardId::new("Doing"),
                BoardId::new("Todo"),
                BoardId::new("Done"),
            ])
        );

        let before = MoveIntent::new("Todo", "Doing").with_side(DropSide::Before);
        assert_eq!(
            plan_move(&boards(), &[], &before),
            ReorderPlan::NoOp(NoOpReason::Unchanged)
        );
    }

    #[test]
    fn drag_without_target_produces_no_intent() {
        assert!(MoveIntent::from_drag("a", None).is_none());
        assert!(MoveIntent::from_drag("a", Some("a")).is_none());
        assert_eq!(
            MoveIntent::from_drag("a", Some("b")),
            Some(MoveIntent::new("a", "b"))
        );
    }
}
