//! Board State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Columns and tasks
//! are the single source of truth for rendering; the per-column partition is
//! computed by filtering on demand.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::LoadedBoard;
use crate::board::{min_column_rows, orphaned_tasks};
use crate::models::{Assignee, Column, Priority, Task, TaskId};

/// Board state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct BoardState {
    /// Columns in display order
    pub columns: Vec<Column>,
    /// Tasks; grouping by column gives the partition, list order the card order
    pub tasks: Vec<Task>,
    /// A task drag is in progress (layout recompute is frozen)
    pub dragging: bool,
    /// Rows every column body reserves, see [`layout_rows`]
    pub min_column_rows: f64,
    pub loading: bool,
    /// Banner text for a failed detail fetch
    pub detail_error: Option<String>,
}

impl BoardState {
    pub fn new(min_rows: f64) -> Self {
        Self {
            min_column_rows: min_rows,
            loading: true,
            ..Default::default()
        }
    }

    /// Built-in board for offline development
    pub fn sample() -> Self {
        let columns = vec![
            Column::new("todo", "Todo"),
            Column::new("in-progress", "In progress"),
            Column::new("done", "Done"),
        ];
        let tasks = vec![
            sample_task("task1", "done", "Project initiation and planning", "ENA 14", "15 Apr, 2025", true, &[("JD", "bg-blue-600")]),
            sample_task("task2", "done", "Gather requirements from stakeholders", "CON 20", "12 Apr, 2025", false, &[("MR", "bg-green-600"), ("AL", "bg-orange-600")]),
            sample_task("task3", "done", "Create wireframes and mockups", "CON 24", "10 Apr, 2025", false, &[("RG", "bg-teal-600")]),
            sample_task("task4", "in-progress", "Develop homepage layout", "DES 42", "22 Apr, 2025", false, &[("SB", "bg-purple-600")]),
            sample_task("task5", "in-progress", "Design color scheme and typography", "DES 65", "25 Apr, 2025", true, &[("TK", "bg-green-600")]),
            sample_task("task6", "todo", "Implement user authentication", "CON 51", "28 Apr, 2025", false, &[("DM", "bg-orange-600"), ("NK", "bg-indigo-600")]),
            sample_task("task7", "todo", "Build contact us page", "CAM 80", "30 Apr, 2025", false, &[("JD", "bg-blue-600")]),
            sample_task("task8", "todo", "Create product catalog", "CON 75", "02 May, 2025", false, &[("AL", "bg-green-600")]),
            sample_task("task9", "todo", "Develop about us page", "DES 32", "06 May, 2025", false, &[("RG", "bg-teal-600"), ("PL", "bg-amber-600")]),
            sample_task("task10", "todo", "Optimize website for mobile devices", "ENA 37", "08 May, 2025", false, &[("LH", "bg-red-600")]),
            sample_task("task11", "todo", "Integrate payment gateway", "ENA 39", "12 May, 2025", false, &[("MK", "bg-cyan-600")]),
            sample_task("task12", "todo", "Perform testing and bug fixing", "CAM 70", "15 May, 2025", false, &[("SB", "bg-purple-600"), ("TW", "bg-indigo-600")]),
            sample_task("task13", "todo", "Launch website and deploy to server", "CAM 75", "20 May, 2025", false, &[("MR", "bg-green-600"), ("AL", "bg-orange-600")]),
        ];
        let tasks: Vec<Task> = tasks
            .into_iter()
            .map(|t| {
                let title = columns.iter().find(|c| c.id == t.column_id).map(|c| c.title.clone());
                Task { column_title: title, ..t }
            })
            .collect();
        let min_rows = min_column_rows(&columns, &tasks, crate::config::DEFAULT_MIN_CARD_ROWS);
        Self {
            columns,
            tasks,
            min_column_rows: min_rows,
            ..Default::default()
        }
    }
}

fn sample_task(
    id: &str,
    column_id: &str,
    content: &str,
    key: &str,
    due_date: &str,
    high: bool,
    assignees: &[(&str, &str)],
) -> Task {
    Task {
        key: key.to_string(),
        description: Some(content.to_string()),
        due_date: Some(due_date.to_string()),
        priority: high.then_some(Priority::High),
        assignees: assignees
            .iter()
            .map(|(initials, color)| Assignee { initials: initials.to_string(), color: color.to_string() })
            .collect(),
        ..Task::new(id, column_id, content)
    }
}

/// Type alias for the store
pub type BoardStore = Store<BoardState>;

/// Get the board store from context
pub fn use_board_store() -> BoardStore {
    expect_context::<BoardStore>()
}

/// Layout metric: frozen at `current` while a drag is in progress
pub fn layout_rows(columns: &[Column], tasks: &[Task], dragging: bool, current: f64, min_rows: f64) -> f64 {
    if dragging {
        current
    } else {
        min_column_rows(columns, tasks, min_rows)
    }
}

/// Detail fields win; the stored column and position are kept
pub fn merge_detail(existing: &Task, detail: Task) -> Task {
    Task {
        column_id: existing.column_id.clone(),
        column_title: existing.column_title.clone(),
        ..detail
    }
}

// ========================
// Store Helper Functions
// ========================

pub fn store_set_tasks(store: &BoardStore, tasks: Vec<Task>) {
    store.tasks().set(tasks);
}

/// Read-then-write under one lock. `f` returns `None` for "no change", in
/// which case subscribers are not notified.
pub fn store_update_tasks(store: &BoardStore, f: impl FnOnce(&[Task]) -> Option<Vec<Task>>) -> bool {
    let mut changed = false;
    store.tasks().maybe_update(|tasks| {
        if let Some(next) = f(tasks) {
            *tasks = next;
            changed = true;
        }
        changed
    });
    changed
}

pub fn store_set_columns(store: &BoardStore, columns: Vec<Column>) {
    store.columns().set(columns);
}

/// Column counterpart of [`store_update_tasks`]
pub fn store_update_columns(store: &BoardStore, f: impl FnOnce(&[Column]) -> Option<Vec<Column>>) -> bool {
    let mut changed = false;
    store.columns().maybe_update(|columns| {
        if let Some(next) = f(columns) {
            *columns = next;
            changed = true;
        }
        changed
    });
    changed
}

pub fn store_set_dragging(store: &BoardStore, dragging: bool) {
    if store.dragging().get_untracked() != dragging {
        store.dragging().set(dragging);
    }
}

/// Recompute the minimum column height metric unless a drag is in progress
pub fn store_refresh_layout(store: &BoardStore, min_rows: f64) {
    let columns = store.columns().get();
    let tasks = store.tasks().get();
    let current = store.min_column_rows().get_untracked();
    let next = layout_rows(&columns, &tasks, store.dragging().get(), current, min_rows);
    if next != current {
        store.min_column_rows().set(next);
    }
}

/// Replace the board with a fresh load, dropping tasks whose column is unknown
pub fn store_apply_loaded(store: &BoardStore, board: LoadedBoard) {
    let LoadedBoard { columns, mut tasks } = board;
    let orphans: Vec<TaskId> = orphaned_tasks(&columns, &tasks).map(|t| t.id.clone()).collect();
    if !orphans.is_empty() {
        tracing::warn!(count = orphans.len(), "dropping tasks that reference unknown columns");
        tasks.retain(|t| !orphans.contains(&t.id));
    }
    tracing::info!(columns = columns.len(), tasks = tasks.len(), "board loaded");
    store_set_columns(store, columns);
    store_set_tasks(store, tasks);
    store.loading().set(false);
}

/// Enrich a stored task with fields from the detail payload
pub fn store_merge_task_detail(store: &BoardStore, detail: Task) {
    let id = detail.id.clone();
    store.tasks().maybe_update(|tasks| match tasks.iter_mut().find(|t| t.id == id) {
        Some(existing) => {
            *existing = merge_detail(existing, detail);
            true
        }
        None => false,
    });
}

pub fn store_set_detail_error(store: &BoardStore, message: Option<String>) {
    store.detail_error().set(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ordering::{array_move, tasks_in_column};
    use leptos::reactive::owner::Owner;

    #[test]
    fn test_sample_board_is_partitioned() {
        let state = BoardState::sample();
        assert_eq!(state.columns.len(), 3);
        assert_eq!(state.tasks.len(), 13);
        assert_eq!(orphaned_tasks(&state.columns, &state.tasks).count(), 0);
        let todo = tasks_in_column(&state.tasks, &state.columns[0].id).count();
        assert_eq!(todo, 8);
        // eight todo tasks plus one and a half spare rows
        assert_eq!(state.min_column_rows, 9.5);
        assert_eq!(state.tasks[4].column_title.as_deref(), Some("In progress"));
    }

    #[test]
    fn test_layout_rows_frozen_while_dragging() {
        let state = BoardState::sample();
        assert_eq!(layout_rows(&state.columns, &state.tasks, true, 4.0, 1.5), 4.0);
        assert_eq!(layout_rows(&state.columns, &state.tasks, false, 4.0, 1.5), 9.5);
        assert_eq!(layout_rows(&state.columns, &[], false, 4.0, 1.5), 1.5);
    }

    #[test]
    fn test_updaters_see_previous_state() {
        let owner = Owner::new();
        owner.with(|| {
            let store = Store::new(BoardState::sample());

            assert!(!store_update_columns(&store, |_| None));
            assert!(store_update_columns(&store, |columns| Some(array_move(columns, 0, 2))));
            let order: Vec<_> = store.columns().get_untracked().iter().map(|c| c.id.to_string()).collect();
            assert_eq!(order, vec!["in-progress", "done", "todo"]);

            assert!(!store_update_tasks(&store, |_| None));
            assert!(store_update_tasks(&store, |tasks| Some(tasks[1..].to_vec())));
            assert_eq!(store.tasks().get_untracked().len(), 12);
        });
    }

    #[test]
    fn test_merge_detail_keeps_column() {
        let mut existing = Task::new("t1", "done", "Old");
        existing.column_title = Some("Done".into());
        let mut detail = Task::new("t1", "todo", "New title");
        detail.priority = Some(Priority::Medium);
        detail.description = Some("**rich**".into());

        let merged = merge_detail(&existing, detail);
        assert_eq!(merged.column_id.as_str(), "done");
        assert_eq!(merged.column_title.as_deref(), Some("Done"));
        assert_eq!(merged.content, "New title");
        assert_eq!(merged.priority, Some(Priority::Medium));
    }
}
