//! Order normalization for task status groups.
//!
//! # Responsibility
//! - Repair legacy or drifted task sets once per load: fill missing orders,
//!   close gaps, break duplicates, and re-link `board_id` to `status`.
//! - Provide the group compaction used by repository writes.
//!
//! # Invariants
//! - After `normalize`, every status group holds orders `0..n-1`.
//! - Groups that already hold `0..n-1` are left untouched.
//! - `normalize` is idempotent: a second run reports no changes.

use crate::model::board::BoardId;
use crate::model::task::Task;
use std::collections::HashMap;

/// Outcome of one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Status groups whose orders were reassigned, in first-seen order.
    pub repaired_groups: Vec<String>,
    /// Tasks whose `order` value changed.
    pub reordered_tasks: usize,
    /// Tasks whose `board_id` was re-linked to their `status`.
    pub relinked_tasks: usize,
}

impl NormalizeReport {
    /// Returns whether the pass changed nothing.
    pub fn is_clean(&self) -> bool {
        self.reordered_tasks == 0 && self.relinked_tasks == 0
    }
}

/// Repairs `tasks` in place and reports what changed.
///
/// Groups containing a task without an order are rebuilt by `created_date`
/// ascending (missing dates first, ties by storage position). Groups whose
/// orders are all present but not exactly `0..n-1` keep their relative order
/// and are renumbered.
pub fn normalize(tasks: &mut [Task]) -> NormalizeReport {
    let mut report = NormalizeReport::default();

    for task in tasks.iter_mut() {
        if task.board_id.as_str() != task.status {
            task.board_id = BoardId::new(task.status.clone());
            report.relinked_tasks += 1;
        }
    }

    for (status, mut members) in status_groups(tasks) {
        let missing_order = members.iter().any(|&index| tasks[index].order.is_none());
        if missing_order {
            members.sort_by_key(|&index| (tasks[index].created_date, index));
        } else if is_contiguous(tasks, &members) {
            continue;
        } else {
            members.sort_by_key(|&index| {
                (tasks[index].order_key(), tasks[index].created_date, index)
            });
        }

        let changed = assign_sequential(tasks, &members);
        if changed > 0 {
            report.reordered_tasks += changed;
            report.repaired_groups.push(status);
        }
    }

    report
}

/// Renumbers the group of `status` to `0..n-1`, keeping current relative
/// order (ties by storage position). Returns how many orders changed.
pub fn compact_group(tasks: &mut [Task], status: &str) -> usize {
    let mut members: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.in_status(status))
        .map(|(index, _)| index)
        .collect();
    members.sort_by_key(|&index| (tasks[index].order_key(), index));
    assign_sequential(tasks, &members)
}

/// Moves `tasks[index]` to `position` inside its status group and renumbers
/// the group to `0..n-1`. Positions past the end append. Returns how many
/// orders changed.
pub fn place_in_group(tasks: &mut [Task], index: usize, position: u32) -> usize {
    let status = tasks[index].status.clone();
    let mut members: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(other, task)| *other != index && task.in_status(&status))
        .map(|(other, _)| other)
        .collect();
    members.sort_by_key(|&other| (tasks[other].order_key(), other));
    let slot = (position as usize).min(members.len());
    members.insert(slot, index);
    assign_sequential(tasks, &members)
}

/// Next free order in the group of `status`: max existing order + 1, or 0.
pub fn next_order(tasks: &[Task], status: &str) -> u32 {
    tasks
        .iter()
        .filter(|task| task.in_status(status))
        .filter_map(|task| task.order)
        .max()
        .map_or(0, |max| max + 1)
}

/// Tasks of `status` sorted by order, ties by storage position.
pub fn sorted_group<'a>(tasks: &'a [Task], status: &str) -> Vec<&'a Task> {
    let mut members: Vec<(usize, &Task)> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.in_status(status))
        .collect();
    members.sort_by_key(|(index, task)| (task.order_key(), *index));
    members.into_iter().map(|(_, task)| task).collect()
}

fn status_groups(tasks: &[Task]) -> Vec<(String, Vec<usize>)> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (index, task) in tasks.iter().enumerate() {
        match positions.get(task.status.as_str()) {
            Some(&slot) => groups[slot].1.push(index),
            None => {
                positions.insert(task.status.as_str(), groups.len());
                groups.push((task.status.clone(), vec![index]));
            }
        }
    }
    groups
}

fn is_contiguous(tasks: &[Task], members: &[usize]) -> bool {
    let mut orders: Vec<u32> = members.iter().filter_map(|&index| tasks[index].order).collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(position, &order)| order as usize == position)
}

fn assign_sequential(tasks: &mut [Task], members: &[usize]) -> usize {
    let mut changed = 0;
    for (position, &index) in members.iter().enumerate() {
        let next = Some(position as u32);
        if tasks[index].order != next {
            tasks[index].order = next;
            changed += 1;
        }
    }
    changed
}
