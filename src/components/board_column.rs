//! Board Column Component
//!
//! One lane: a header that drags the whole column and a body listing the
//! column's cards. The column root is the droppable for both column reorders
//! and drops onto empty space.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mousedown, DndSignals};

use crate::components::TaskCard;
use crate::config::use_config;
use crate::models::{Column, DragData, DragKind};
use crate::store::{use_board_store, BoardStateStoreFields};

#[component]
pub fn BoardColumn(column: Column, dnd: DndSignals<DragData>) -> impl IntoView {
    let store = use_board_store();
    let config = use_config();

    let id = column.id.clone();
    let title = column.title.clone();
    let on_mousedown = make_on_mousedown(dnd, DragData::Column(column));

    let task_ids = {
        let id = id.clone();
        move || {
            store
                .tasks()
                .read()
                .iter()
                .filter(|t| t.column_id == id)
                .map(|t| t.id.clone())
                .collect::<Vec<_>>()
        }
    };
    let count = {
        let task_ids = task_ids.clone();
        move || task_ids().len()
    };

    let body_style = move || format!("min-height: {}px;", config.min_body_height_px(store.min_column_rows().get()));

    let is_dragging = {
        let id = id.clone();
        move || matches!(dnd.active.get(), Some(DragData::Column(ref c)) if c.id == id)
    };
    let column_class = move || {
        let mut c = String::from("board-column");
        if is_dragging() {
            c.push_str(" dragging");
        }
        c
    };

    view! {
        <section
            class=column_class
            data-dnd-kind=DragKind::Column.as_str()
            data-dnd-id=id.to_string()
        >
            <header class="board-column-header" on:mousedown=on_mousedown>
                <span class="board-column-title">{title}</span>
                <span class="board-column-count">{count}</span>
            </header>
            <div class="board-column-body" style=body_style>
                <For
                    each=task_ids
                    key=|task_id| task_id.clone()
                    children=move |task_id| view! { <TaskCard task_id=task_id dnd=dnd /> }
                />
            </div>
        </section>
    }
}
