//! Drag Session Controller
//!
//! State machine over a single drag: `Idle -> Column | Task -> Idle`.
//!
//! A task drag snapshots the whole task list at start. Hover events reorder
//! the live list optimistically; the drop decides whether the move must be
//! persisted, and a failed persistence restores the snapshot in full.

use crate::api::{ApiResult, BoardApi};
use crate::board::ordering::{array_move, column_index, move_task_into_column, move_task_over_task, task_index, InsertEdge};
use crate::models::{Column, ColumnId, DragData, DragKind, DropTarget, Task, TaskId};

#[derive(Debug, Clone, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Column {
        column_id: ColumnId,
    },
    Task {
        task_id: TaskId,
        /// Column the task was picked up from
        origin: ColumnId,
        /// Owned copy of the task list at pickup
        snapshot: Vec<Task>,
        last_over: Option<DropTarget>,
        /// Droppable currently under the pointer; hovers only act on a change
        hovered: Option<DropTarget>,
    },
}

/// A cross-column move waiting for the backend
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    pub task_id: TaskId,
    pub from: ColumnId,
    pub to: ColumnId,
    pub snapshot: Vec<Task>,
    /// Drag generation that produced this move
    pub generation: u64,
}

/// What the board must do once the pointer is released
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Nothing to commit
    Unchanged,
    /// New column order (kept client-side)
    ReorderColumns(Vec<Column>),
    /// Task changed columns; persist it
    PersistMove(PendingMove),
}

/// How a pending move resolved
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Committed,
    /// Restore this task list
    RolledBack(Vec<Task>),
    /// Failed, but a newer drag has already changed the board
    Stale,
}

#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
    generation: u64,
}

fn column_of(target: &DropTarget, columns: &[Column], tasks: &[Task]) -> Option<ColumnId> {
    match target {
        DropTarget::Column(id) => column_index(columns, id).map(|_| id.clone()),
        DropTarget::Task(id) => task_index(tasks, id).map(|i| tasks[i].column_id.clone()),
    }
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_kind(&self) -> Option<DragKind> {
        match self.state {
            DragState::Idle => None,
            DragState::Column { .. } => Some(DragKind::Column),
            DragState::Task { .. } => Some(DragKind::Task),
        }
    }

    /// Incremented on every task pickup
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn start(&mut self, data: &DragData, tasks: &[Task]) {
        self.state = match data {
            DragData::Column(column) => {
                tracing::debug!(column_id = %column.id, "column picked up");
                DragState::Column { column_id: column.id.clone() }
            }
            DragData::Task(task) => {
                // The payload may predate earlier hovers; the live list is authoritative
                let origin = task_index(tasks, &task.id)
                    .map(|i| tasks[i].column_id.clone())
                    .unwrap_or_else(|| task.column_id.clone());
                self.generation += 1;
                tracing::debug!(task_id = %task.id, origin = %origin, generation = self.generation, "task picked up");
                DragState::Task {
                    task_id: task.id.clone(),
                    origin,
                    snapshot: tasks.to_vec(),
                    last_over: None,
                    hovered: None,
                }
            }
        };
    }

    /// Hover update. Returns the reordered task list, or `None` if the
    /// hover changes nothing (column drags, the target already hovered,
    /// self-hover, unknown ids).
    pub fn over(&mut self, target: &DropTarget, edge: InsertEdge, columns: &[Column], tasks: &[Task]) -> Option<Vec<Task>> {
        let DragState::Task { task_id, last_over, hovered, .. } = &mut self.state else {
            return None;
        };
        // Task-over-task is not idempotent; pointer moves within one target must not re-splice
        if hovered.as_ref() == Some(target) {
            return None;
        }
        *hovered = Some(target.clone());
        match target {
            DropTarget::Task(over_id) if *over_id == *task_id => None,
            DropTarget::Task(over_id) => {
                let next = move_task_over_task(tasks, task_id, over_id)?;
                *last_over = Some(target.clone());
                Some(next)
            }
            DropTarget::Column(column_id) => {
                let column = &columns[column_index(columns, column_id)?];
                *last_over = Some(target.clone());
                move_task_into_column(tasks, task_id, column, edge)
            }
        }
    }

    /// The pointer left every droppable; the next hover acts even on the
    /// previously hovered target
    pub fn leave(&mut self) {
        if let DragState::Task { hovered, .. } = &mut self.state {
            *hovered = None;
        }
    }

    /// Pointer released. Always returns the session to idle.
    pub fn end(&mut self, over: Option<&DropTarget>, columns: &[Column], tasks: &[Task]) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DragOutcome::Unchanged,
            DragState::Column { column_id } => {
                // Columns only reorder against columns; a card stands for its column
                let target = over.and_then(|t| column_of(t, columns, tasks));
                tracing::debug!(column_id = %column_id, to = ?target, "column dropped");
                match (target, column_index(columns, &column_id)) {
                    (Some(target), Some(from)) if target != column_id => match column_index(columns, &target) {
                        Some(to) => DragOutcome::ReorderColumns(array_move(columns, from, to)),
                        None => DragOutcome::Unchanged,
                    },
                    _ => DragOutcome::Unchanged,
                }
            }
            DragState::Task { task_id, origin, snapshot, last_over, .. } => {
                let target = over.cloned().or(last_over);
                let to = target.and_then(|t| column_of(&t, columns, tasks));
                tracing::debug!(task_id = %task_id, from = %origin, to = ?to, "task dropped");
                let Some(to) = to.filter(|to| *to != origin) else {
                    return DragOutcome::Unchanged;
                };
                DragOutcome::PersistMove(PendingMove {
                    task_id,
                    from: origin,
                    to,
                    snapshot,
                    generation: self.generation,
                })
            }
        }
    }

    /// Escape pressed. Hover mutations already applied stay applied.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

impl PendingMove {
    pub fn settle(self, result: ApiResult<()>, current_generation: u64) -> Settlement {
        match result {
            Ok(()) => {
                tracing::info!(task_id = %self.task_id, from = %self.from, to = %self.to, "task move persisted");
                Settlement::Committed
            }
            Err(e) if self.generation == current_generation => {
                tracing::error!(task_id = %self.task_id, error = %e, "task move failed, restoring board");
                Settlement::RolledBack(self.snapshot)
            }
            Err(e) => {
                tracing::warn!(
                    task_id = %self.task_id,
                    error = %e,
                    generation = self.generation,
                    current_generation,
                    "task move failed after a newer drag, snapshot is stale"
                );
                Settlement::Stale
            }
        }
    }
}

/// Persist a cross-column move. `current_generation` is read after the
/// request resolves so drags started in the meantime are seen.
pub async fn persist_move<A, F>(api: &A, pending: PendingMove, current_generation: F) -> Settlement
where
    A: BoardApi + ?Sized,
    F: FnOnce() -> u64,
{
    let result = api.move_task(&pending.task_id, &pending.from, &pending.to).await;
    pending.settle(result, current_generation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, LoadedBoard};
    use crate::board::ordering::orphaned_tasks;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;

    struct FakeApi {
        status: Option<u16>,
        calls: RefCell<Vec<(String, String, String)>>,
    }

    impl FakeApi {
        fn ok() -> Self {
            Self { status: None, calls: RefCell::new(Vec::new()) }
        }

        fn failing(status: u16) -> Self {
            Self { status: Some(status), calls: RefCell::new(Vec::new()) }
        }
    }

    #[async_trait(?Send)]
    impl BoardApi for FakeApi {
        async fn load_board(&self, _folder_id: &str) -> ApiResult<LoadedBoard> {
            Ok(LoadedBoard::default())
        }

        async fn fetch_task(&self, task_id: &TaskId) -> ApiResult<Task> {
            Err(ApiError::Status { status: 404, url: task_id.to_string() })
        }

        async fn move_task(&self, task_id: &TaskId, from: &ColumnId, to: &ColumnId) -> ApiResult<()> {
            self.calls.borrow_mut().push((task_id.to_string(), from.to_string(), to.to_string()));
            match self.status {
                None => Ok(()),
                Some(status) => Err(ApiError::Status { status, url: "move".into() }),
            }
        }
    }

    fn columns() -> Vec<Column> {
        vec![Column::new("todo", "Todo"), Column::new("doing", "Doing"), Column::new("done", "Done")]
    }

    fn task(id: &str, column: &str) -> DragData {
        DragData::Task(Task::new(id, column, id))
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_drop_on_task_in_other_column_then_server_error_restores_board() {
        let columns = columns();
        let initial = vec![Task::new("T1", "todo", "T1"), Task::new("T2", "doing", "T2")];
        let mut session = DragSession::new();

        session.start(&task("T1", "todo"), &initial);
        let target = DropTarget::Task("T2".into());
        let tasks = session.over(&target, InsertEdge::Start, &columns, &initial).unwrap();
        assert_eq!(ids(&tasks), vec!["T1", "T2"]);
        assert_eq!(tasks[0].column_id.as_str(), "doing");

        let DragOutcome::PersistMove(pending) = session.end(Some(&target), &columns, &tasks) else {
            panic!("expected a move to persist");
        };
        assert_eq!((pending.from.as_str(), pending.to.as_str()), ("todo", "doing"));
        assert_eq!(session.active_kind(), None);

        let api = FakeApi::failing(500);
        let generation = session.generation();
        let settlement = block_on(persist_move(&api, pending, || generation));
        assert_eq!(settlement, Settlement::RolledBack(initial.clone()));
        assert_eq!(*api.calls.borrow(), vec![("T1".to_string(), "todo".to_string(), "doing".to_string())]);
    }

    #[test]
    fn test_resting_on_a_target_applies_the_hover_once() {
        let columns = columns();
        let initial = vec![Task::new("T1", "todo", "T1"), Task::new("T2", "doing", "T2")];
        let mut session = DragSession::new();
        session.start(&task("T1", "todo"), &initial);

        let target = DropTarget::Task("T2".into());
        let mut live = initial.clone();
        let mut applied = 0;
        for _ in 0..4 {
            if let Some(next) = session.over(&target, InsertEdge::Start, &columns, &live) {
                live = next;
                applied += 1;
            }
        }
        assert_eq!(applied, 1);
        assert_eq!(ids(&live), vec!["T1", "T2"]);
        assert_eq!(live[0].column_id.as_str(), "doing");

        // leaving every droppable and coming back is a fresh hover
        session.leave();
        let live = session.over(&target, InsertEdge::Start, &columns, &live).unwrap();
        assert_eq!(ids(&live), vec!["T2", "T1"]);
    }

    #[test]
    fn test_drop_is_logged_with_resolved_column() {
        use rolling_logger::{LogBuffer, RollingLayer};
        use tracing_subscriber::layer::SubscriberExt;

        let columns = columns();
        let initial = vec![Task::new("a", "todo", "a")];
        let buffer = LogBuffer::new(16);
        let subscriber = tracing_subscriber::registry().with(RollingLayer::new(buffer.clone()).without_console());
        tracing::subscriber::with_default(subscriber, || {
            let mut session = DragSession::new();
            session.start(&task("a", "todo"), &initial);
            assert_eq!(session.end(None, &columns, &initial), DragOutcome::Unchanged);
        });

        let dropped: Vec<_> = buffer
            .snapshot()
            .into_iter()
            .filter(|r| r.message.starts_with("task dropped"))
            .collect();
        assert_eq!(dropped.len(), 1);
        assert!(dropped[0].message.contains("task_id=a"));
        assert!(dropped[0].message.contains("to=None"));
    }

    #[test]
    fn test_successful_move_commits() {
        let columns = columns();
        let initial = vec![Task::new("T1", "todo", "T1")];
        let mut session = DragSession::new();
        session.start(&task("T1", "todo"), &initial);
        let target = DropTarget::Column("done".into());
        let tasks = session.over(&target, InsertEdge::End, &columns, &initial).unwrap();
        let DragOutcome::PersistMove(pending) = session.end(Some(&target), &columns, &tasks) else {
            panic!("expected a move to persist");
        };
        let api = FakeApi::ok();
        assert_eq!(block_on(persist_move(&api, pending, || 1)), Settlement::Committed);
    }

    #[test]
    fn test_rollback_discards_every_hover_not_just_the_last() {
        let columns = columns();
        let initial = vec![
            Task::new("a", "todo", "a"),
            Task::new("b", "todo", "b"),
            Task::new("c", "doing", "c"),
        ];
        let mut session = DragSession::new();
        session.start(&task("a", "todo"), &initial);

        let mut live = initial.clone();
        for target in [
            DropTarget::Task("b".into()),
            DropTarget::Column("done".into()),
            DropTarget::Task("c".into()),
        ] {
            if let Some(next) = session.over(&target, InsertEdge::Start, &columns, &live) {
                live = next;
            }
        }
        assert_eq!(live.iter().find(|t| t.id.as_str() == "a").unwrap().column_id.as_str(), "doing");

        let DragOutcome::PersistMove(pending) = session.end(None, &columns, &live) else {
            panic!("last hovered target should resolve the drop");
        };
        let settlement = pending.settle(Err(ApiError::Transport("offline".into())), 1);
        assert_eq!(settlement, Settlement::RolledBack(initial));
    }

    #[test]
    fn test_snapshot_is_not_aliased_with_live_list() {
        let columns = columns();
        let mut live = vec![Task::new("a", "todo", "a"), Task::new("b", "doing", "b")];
        let mut session = DragSession::new();
        session.start(&task("a", "todo"), &live);

        live[0].content = "edited while dragging".into();
        live = session.over(&DropTarget::Task("b".into()), InsertEdge::Start, &columns, &live).unwrap();

        let DragOutcome::PersistMove(pending) = session.end(None, &columns, &live) else {
            panic!("expected a move to persist");
        };
        assert_eq!(pending.snapshot[0].content, "a");
        assert_eq!(pending.snapshot[0].column_id.as_str(), "todo");
    }

    #[test]
    fn test_same_column_reorder_is_not_persisted() {
        let columns = columns();
        let initial = vec![Task::new("a", "todo", "a"), Task::new("b", "todo", "b")];
        let mut session = DragSession::new();
        session.start(&task("a", "todo"), &initial);
        let target = DropTarget::Task("b".into());
        let live = session.over(&target, InsertEdge::Start, &columns, &initial).unwrap();
        assert_eq!(ids(&live), vec!["b", "a"]);
        assert_eq!(session.end(Some(&target), &columns, &live), DragOutcome::Unchanged);
    }

    #[test]
    fn test_over_guards() {
        let columns = columns();
        let tasks = vec![Task::new("a", "todo", "a")];
        let mut session = DragSession::new();

        // idle sessions ignore hovers
        assert!(session.over(&DropTarget::Column("done".into()), InsertEdge::Start, &columns, &tasks).is_none());

        session.start(&task("a", "todo"), &tasks);
        assert!(session.over(&DropTarget::Task("a".into()), InsertEdge::Start, &columns, &tasks).is_none());
        assert!(session.over(&DropTarget::Task("ghost".into()), InsertEdge::Start, &columns, &tasks).is_none());
        assert!(session.over(&DropTarget::Column("ghost".into()), InsertEdge::Start, &columns, &tasks).is_none());
        assert_eq!(session.end(None, &columns, &tasks), DragOutcome::Unchanged);
        assert_eq!(session.active_kind(), None);
    }

    #[test]
    fn test_column_drag_reorders_on_end_only() {
        let columns = columns();
        let tasks = vec![Task::new("a", "done", "a")];
        let mut session = DragSession::new();
        session.start(&DragData::Column(columns[0].clone()), &tasks);
        assert_eq!(session.active_kind(), Some(DragKind::Column));
        assert!(session.over(&DropTarget::Column("done".into()), InsertEdge::Start, &columns, &tasks).is_none());

        let DragOutcome::ReorderColumns(next) = session.end(Some(&DropTarget::Column("done".into())), &columns, &tasks) else {
            panic!("expected a column reorder");
        };
        let order: Vec<_> = next.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["doing", "done", "todo"]);

        // dropping a column on a card targets the card's column
        session.start(&DragData::Column(columns[2].clone()), &tasks);
        assert_eq!(session.end(Some(&DropTarget::Task("a".into())), &columns, &tasks), DragOutcome::Unchanged);
        session.start(&DragData::Column(columns[2].clone()), &tasks);
        assert_eq!(session.end(None, &columns, &tasks), DragOutcome::Unchanged);
    }

    #[test]
    fn test_cancel_keeps_hover_mutations() {
        let columns = columns();
        let initial = vec![Task::new("a", "todo", "a")];
        let mut session = DragSession::new();
        session.start(&task("a", "todo"), &initial);
        let live = session.over(&DropTarget::Column("done".into()), InsertEdge::Start, &columns, &initial).unwrap();
        session.cancel();
        assert_eq!(session.active_kind(), None);
        assert_eq!(live[0].column_id.as_str(), "done");
        assert_eq!(session.end(None, &columns, &live), DragOutcome::Unchanged);
    }

    #[test]
    fn test_failure_after_newer_drag_is_stale() {
        let columns = columns();
        let initial = vec![Task::new("a", "todo", "a"), Task::new("b", "todo", "b")];
        let mut session = DragSession::new();

        session.start(&task("a", "todo"), &initial);
        let live = session.over(&DropTarget::Column("done".into()), InsertEdge::Start, &columns, &initial).unwrap();
        let DragOutcome::PersistMove(first) = session.end(None, &columns, &live) else {
            panic!("expected a move to persist");
        };

        session.start(&task("b", "todo"), &live);
        assert_eq!(session.generation(), first.generation + 1);

        let settlement = first.settle(Err(ApiError::Status { status: 502, url: "move".into() }), session.generation());
        assert_eq!(settlement, Settlement::Stale);
    }

    #[test]
    fn test_partition_invariant_holds_across_drags() {
        let columns = columns();
        let mut live = vec![
            Task::new("a", "todo", "a"),
            Task::new("b", "todo", "b"),
            Task::new("c", "doing", "c"),
            Task::new("d", "done", "d"),
        ];
        let mut session = DragSession::new();
        let hovers = [
            ("a", DropTarget::Task("c".into())),
            ("a", DropTarget::Column("done".into())),
            ("d", DropTarget::Task("b".into())),
            ("c", DropTarget::Column("todo".into())),
            ("b", DropTarget::Column("ghost".into())),
        ];
        for (active, target) in hovers {
            let data = DragData::Task(live.iter().find(|t| t.id.as_str() == active).unwrap().clone());
            session.start(&data, &live);
            for edge in [InsertEdge::Start, InsertEdge::End] {
                if let Some(next) = session.over(&target, edge, &columns, &live) {
                    live = next;
                }
            }
            session.end(Some(&target), &columns, &live);
            assert_eq!(orphaned_tasks(&columns, &live).count(), 0);
            assert_eq!(live.len(), 4);
        }
    }
}
