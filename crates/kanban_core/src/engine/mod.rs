//! Pure ordering logic.
//!
//! Nothing in this module reads or writes the store; repositories and the
//! service feed it snapshots and apply what it returns.

pub mod normalize;
pub mod reorder;

pub use normalize::{compact_group, next_order, normalize, sorted_group, NormalizeReport};
pub use reorder::{plan_move, DropSide, MoveIntent, NoOpReason, ReorderPlan, TaskWrite};
