//! Board Ordering
//!
//! Pure reordering helpers. Every function returns a new sequence and never
//! mutates its input, so a drag snapshot can never alias the live list.
//!
//! The task list order encodes both the column partition (grouping by
//! `column_id`) and the display order inside each column.

use crate::models::{Column, ColumnId, Task, TaskId};

/// Where a task dropped on a column body lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertEdge {
    /// Before the column's first task
    Start,
    /// After the column's last task
    End,
}

impl InsertEdge {
    /// `Start` when the dragged element's vertical center is above the
    /// column's midpoint, `End` otherwise. Unknown geometry means `Start`.
    pub fn from_centers(active_center_y: Option<f64>, column_mid_y: Option<f64>) -> Self {
        match (active_center_y, column_mid_y) {
            (Some(active), Some(mid)) if active >= mid => InsertEdge::End,
            _ => InsertEdge::Start,
        }
    }
}

/// Stable move: remove the element at `from`, then insert it at `to`.
/// Out-of-range `from` returns an unchanged copy; `to` is clamped.
pub fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = items.to_vec();
    if from >= out.len() {
        return out;
    }
    let item = out.remove(from);
    let to = to.min(out.len());
    out.insert(to, item);
    out
}

pub fn task_index(tasks: &[Task], id: &TaskId) -> Option<usize> {
    tasks.iter().position(|t| &t.id == id)
}

pub fn column_index(columns: &[Column], id: &ColumnId) -> Option<usize> {
    columns.iter().position(|c| &c.id == id)
}

/// Tasks of one column in display order
pub fn tasks_in_column<'a>(tasks: &'a [Task], column_id: &'a ColumnId) -> impl Iterator<Item = &'a Task> + 'a {
    tasks.iter().filter(move |t| &t.column_id == column_id)
}

/// Task dragged over another task.
///
/// Across columns the dragged task adopts the target's column and lands
/// immediately before the target. Within a column it takes the target's index.
/// Returns `None` when nothing changes.
pub fn move_task_over_task(tasks: &[Task], active: &TaskId, over: &TaskId) -> Option<Vec<Task>> {
    if active == over {
        return None;
    }
    let active_index = task_index(tasks, active)?;
    let over_index = task_index(tasks, over)?;
    let dragged = &tasks[active_index];
    let target = &tasks[over_index];

    if dragged.column_id == target.column_id {
        return Some(array_move(tasks, active_index, over_index));
    }

    let moved = dragged.in_column(&target.column_id, target.column_title.clone());
    let mut out: Vec<Task> = tasks.iter().filter(|t| &t.id != active).cloned().collect();
    // Removing the dragged task shifts the target left when it came after it
    let insert_at = if active_index < over_index { over_index - 1 } else { over_index };
    out.insert(insert_at, moved);
    Some(out)
}

/// Task dragged over a column body: reassign the column and splice the task
/// at the start or end of that column's current run of tasks. An empty column
/// receives the task at the end of the whole list.
pub fn move_task_into_column(tasks: &[Task], active: &TaskId, column: &Column, edge: InsertEdge) -> Option<Vec<Task>> {
    let active_index = task_index(tasks, active)?;
    let moved = tasks[active_index].in_column(&column.id, Some(column.title.clone()));

    let mut out = tasks.to_vec();
    out.remove(active_index);

    let mut run = out.iter().enumerate().filter(|(_, t)| t.column_id == column.id).map(|(i, _)| i);
    let first = run.next();
    let last = run.last().or(first);
    let insert_at = match (edge, first, last) {
        (InsertEdge::Start, Some(first), _) => first,
        (InsertEdge::End, _, Some(last)) => last + 1,
        _ => out.len(),
    };
    out.insert(insert_at, moved);

    (out != tasks).then_some(out)
}

/// Number of tasks per column, in column order
pub fn column_task_counts(columns: &[Column], tasks: &[Task]) -> Vec<(ColumnId, usize)> {
    columns
        .iter()
        .map(|c| (c.id.clone(), tasks_in_column(tasks, &c.id).count()))
        .collect()
}

/// Row count every column body reserves so drop targets stay reachable:
/// the busiest column's task count plus `min_rows`, never below `min_rows`.
pub fn min_column_rows(columns: &[Column], tasks: &[Task], min_rows: f64) -> f64 {
    let busiest = column_task_counts(columns, tasks).into_iter().map(|(_, n)| n).max().unwrap_or(0);
    (busiest as f64 + min_rows).max(min_rows)
}

/// Tasks whose column does not exist
pub fn orphaned_tasks<'a>(columns: &'a [Column], tasks: &'a [Task]) -> impl Iterator<Item = &'a Task> + 'a {
    tasks.iter().filter(move |t| column_index(columns, &t.column_id).is_none())
}
