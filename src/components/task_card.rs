//! Task Card Component

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mousedown, DndSignals};

use crate::context::AppContext;
use crate::markdown::description_preview;
use crate::models::{DragData, DragKind, TaskId};
use crate::store::{use_board_store, BoardStateStoreFields};

const PREVIEW_CHARS: usize = 90;

/// A draggable card. `overlay` renders the copy that follows the pointer,
/// which is not a drop target itself.
#[component]
pub fn TaskCard(task_id: TaskId, dnd: DndSignals<DragData>, #[prop(optional)] overlay: bool) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_board_store();

    let task = {
        let id = task_id.clone();
        Memo::new(move |_| store.tasks().read().iter().find(|t| t.id == id).cloned())
    };

    let on_mousedown = move |ev: web_sys::MouseEvent| {
        if overlay {
            return;
        }
        if let Some(task) = task.get_untracked() {
            make_on_mousedown(dnd, DragData::Task(task))(ev);
        }
    };

    let on_click = {
        let id = task_id.clone();
        move |_| {
            // The click trailing a drag must not open the panel
            if overlay || dnd.drag_just_ended.get_untracked() {
                return;
            }
            ctx.select_task(id.clone());
        }
    };

    let card_class = {
        let id = task_id.clone();
        move || {
            let mut c = String::from("task-card");
            if overlay {
                c.push_str(" overlay");
            } else if matches!(dnd.active.get(), Some(DragData::Task(ref t)) if t.id == id) {
                c.push_str(" dragging");
            }
            if ctx.selected_task.get().as_ref() == Some(&id) {
                c.push_str(" selected");
            }
            c
        }
    };

    let (dnd_kind, dnd_id) = if overlay {
        (None, None)
    } else {
        (Some(DragKind::Task.as_str()), Some(task_id.to_string()))
    };

    move || {
        let Some(task) = task.get() else {
            return ().into_any();
        };
        let preview = task
            .description
            .as_deref()
            .map(|d| description_preview(d, PREVIEW_CHARS))
            .filter(|p| !p.is_empty() && *p != task.content);
        let priority = task.priority.map(|p| view! { <span class=format!("priority-badge {}", p.css_class())>{p.label()}</span> });
        let due = task.due_date.clone().map(|d| view! { <span class="task-due">{d}</span> });
        let assignees = task
            .assignees
            .iter()
            .map(|a| view! { <span class=format!("avatar {}", a.color)>{a.initials.clone()}</span> })
            .collect_view();

        view! {
            <article
                class=card_class.clone()
                data-dnd-kind=dnd_kind
                data-dnd-id=dnd_id.clone()
                on:mousedown=on_mousedown
                on:click=on_click.clone()
            >
                <div class="task-card-top">
                    <span class="task-key">{task.key.clone()}</span>
                    {priority}
                </div>
                <p class="task-content">{task.content.clone()}</p>
                {preview.map(|p| view! { <p class="task-preview">{p}</p> })}
                <div class="task-card-bottom">
                    {due}
                    <div class="task-assignees">{assignees}</div>
                </div>
            </article>
        }
        .into_any()
    }
}
