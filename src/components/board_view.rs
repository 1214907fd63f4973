//! Board View Component
//!
//! Columns side by side with drag-and-drop for columns and cards.
//! Drag lifecycle events from leptos-dragdrop are fed to the [`DragSession`];
//! hover results are written to the store optimistically and a cross-column
//! drop is persisted in the background.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::*;

use crate::board::{persist_move, resolve_collision, DragOutcome, DragSession, InsertEdge, Settlement};
use crate::components::{BoardColumn, TaskCard, TaskDetail};
use crate::config::use_config;
use crate::context::AppContext;
use crate::models::{DragData, DropTarget};
use crate::store::{
    store_refresh_layout, store_set_dragging, store_set_tasks, store_update_columns, store_update_tasks,
    use_board_store, BoardStateStoreFields, BoardStore,
};

/// Bridges pointer events to the board's drag session
struct BoardDragHandler {
    store: BoardStore,
    session: StoredValue<DragSession>,
    ctx: AppContext,
}

impl BoardDragHandler {
    /// Start/end of the column's task run is decided by the dragged
    /// element's vertical center against the column's midpoint
    fn insert_edge(frame: &PointerFrame, key: &DroppableKey) -> InsertEdge {
        let active_y = frame
            .active_rect
            .map(|r| r.center().y)
            .or(frame.pointer.map(|p| p.y));
        let column_mid = frame.rect(key).map(|r| r.center().y);
        InsertEdge::from_centers(active_y, column_mid)
    }
}

impl DragHandler<DragData> for BoardDragHandler {
    fn on_start(&self, active: &DragData) {
        let tasks = self.store.tasks().get_untracked();
        self.session.write_value().start(active, &tasks);
        if let DragData::Task(_) = active {
            store_set_dragging(&self.store, true);
        }
    }

    fn on_move(&self, active: &DragData, frame: &PointerFrame) -> Option<DroppableKey> {
        let kind = self.session.with_value(|s| s.active_kind());
        let Some((key, target)) = resolve_collision(kind, frame).and_then(|key| {
            let target = DropTarget::from_key(&key)?;
            Some((key, target))
        }) else {
            self.session.write_value().leave();
            return None;
        };

        if let DragData::Task(_) = active {
            let edge = match target {
                DropTarget::Column(_) => Self::insert_edge(frame, &key),
                DropTarget::Task(_) => InsertEdge::Start,
            };
            let columns = self.store.columns().get_untracked();
            let session = self.session;
            store_update_tasks(&self.store, |tasks| {
                session.write_value().over(&target, edge, &columns, tasks)
            });
        }
        Some(key)
    }

    fn on_end(&self, _active: &DragData, over: Option<DroppableKey>) {
        let target = over.as_ref().and_then(DropTarget::from_key);
        let tasks = self.store.tasks().get_untracked();
        let session = self.session;
        // Column order is read and committed under the same store write
        let mut outcome = DragOutcome::Unchanged;
        store_update_columns(&self.store, |columns| {
            outcome = session.write_value().end(target.as_ref(), columns, &tasks);
            match &outcome {
                DragOutcome::ReorderColumns(next) => Some(next.clone()),
                _ => None,
            }
        });
        store_set_dragging(&self.store, false);

        match outcome {
            DragOutcome::Unchanged => {}
            DragOutcome::ReorderColumns(next) => {
                tracing::debug!(columns = next.len(), "columns reordered");
            }
            DragOutcome::PersistMove(pending) => {
                let api = self.ctx.api();
                let store = self.store;
                let session = self.session;
                let ctx = self.ctx;
                spawn_local(async move {
                    let settlement = persist_move(api.as_ref(), pending, || session.with_value(|s| s.generation())).await;
                    match settlement {
                        Settlement::Committed => {}
                        Settlement::RolledBack(snapshot) => store_set_tasks(&store, snapshot),
                        // A newer drag owns the board now; resync from the service
                        Settlement::Stale => ctx.reload(),
                    }
                });
            }
        }
    }

    fn on_cancel(&self, _active: &DragData) {
        tracing::debug!("drag cancelled");
        self.session.write_value().cancel();
        store_set_dragging(&self.store, false);
    }
}

/// Board with DnD support
#[component]
pub fn BoardView() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_board_store();
    let config = use_config();

    let dnd = create_dnd_signals::<DragData>();
    let session = StoredValue::new(DragSession::new());
    bind_global_listeners(dnd, BoardDragHandler { store, session, ctx });

    // Layout metric follows columns/tasks, frozen while a task is dragged
    let min_rows = config.min_card_rows;
    Effect::new(move |_| store_refresh_layout(&store, min_rows));

    let docked_open = move || ctx.selected_task.get().is_some() && !ctx.panel_maximized.get();

    view! {
        <div class="board">
            <Show when=docked_open>
                <div class="board-backdrop" on:click=move |_| ctx.close_panel()></div>
            </Show>

            <div class="board-columns">
                <For
                    each=move || store.columns().get()
                    key=|column| column.id.clone()
                    children=move |column| view! { <BoardColumn column=column dnd=dnd /> }
                />
            </div>

            <DragOverlay dnd=dnd />

            <Show when=move || ctx.selected_task.get().is_some()>
                <TaskDetail />
            </Show>
        </div>
    }
}

/// Card following the pointer while a task is dragged
#[component]
fn DragOverlay(dnd: DndSignals<DragData>) -> impl IntoView {
    let position = move || {
        let pointer = dnd.pointer.get()?;
        let rect = dnd.pressed_rect.get()?.translated(dnd.origin.get(), pointer);
        Some(format!(
            "position: fixed; left: {}px; top: {}px; width: {}px; pointer-events: none;",
            rect.left, rect.top, rect.width
        ))
    };

    move || match dnd.active.get() {
        Some(DragData::Task(task)) => view! {
            <div class="drag-overlay" style=position>
                <TaskCard task_id=task.id dnd=dnd overlay=true />
            </div>
        }
        .into_any(),
        _ => ().into_any(),
    }
}
